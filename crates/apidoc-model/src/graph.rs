//! Declaration graph for one documentation run.
//!
//! # Architecture
//!
//! Packages and types are stored in flat vectors and addressed by
//! [`PackageId`] / [`TypeId`] indices. Every relation the page renderers
//! need (owning package, supertype and subtype edges, interface
//! implementors, nested types, package parent/children) is computed once
//! in [`GraphBuilder::build`] and kept in index-parallel vectors:
//!
//! - O(1) name lookups via `type_index` / `package_index` `HashMap`s
//! - O(1) supertype, subtype and implementor queries
//! - O(d) ancestor chains where d is the inheritance depth
//!
//! The graph is never mutated after construction and is `Send + Sync`, so
//! page generation can read it from many threads at once.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::decl::{
    Enclosing, ExternalAnnotation, PackageDecl, Snapshot, TypeDecl, TypeKind, TypeRef,
};

/// Implicit root of the class hierarchy.
pub const DEFAULT_ROOT_TYPE: &str = "java.lang.Object";

/// Index of a package in a [`DeclarationGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(usize);

/// Index of a type in a [`DeclarationGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

/// Graph construction error.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Supertype cycle detected at {type_name}")]
    SupertypeCycle { type_name: String },
    #[error("Duplicate package declaration: {0}")]
    DuplicatePackage(String),
    #[error("Duplicate type declaration: {0}")]
    DuplicateType(String),
    #[error("Type {type_name} references undeclared package {package}")]
    MissingPackage { type_name: String, package: String },
    #[error("Type {type_name} references undeclared enclosing type {enclosing}")]
    MissingEnclosingType { type_name: String, enclosing: String },
}

/// Accumulates descriptors before freezing them into a [`DeclarationGraph`].
#[derive(Debug)]
pub struct GraphBuilder {
    packages: Vec<PackageDecl>,
    types: Vec<TypeDecl>,
    external_annotations: Vec<ExternalAnnotation>,
    root_type: String,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self {
            packages: Vec::new(),
            types: Vec::new(),
            external_annotations: Vec::new(),
            root_type: DEFAULT_ROOT_TYPE.to_owned(),
        }
    }
}

impl GraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the implicit root type used for bound elision.
    #[must_use]
    pub fn root_type(mut self, name: impl Into<String>) -> Self {
        self.root_type = name.into();
        self
    }

    pub fn add_package(&mut self, package: PackageDecl) -> &mut Self {
        self.packages.push(package);
        self
    }

    pub fn add_type(&mut self, ty: TypeDecl) -> &mut Self {
        self.types.push(ty);
        self
    }

    pub fn add_external_annotation(&mut self, annotation: ExternalAnnotation) -> &mut Self {
        self.external_annotations.push(annotation);
        self
    }

    /// Freeze the descriptors and derive every index.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate names, dangling enclosing references,
    /// or a cycle in the superclass relation.
    pub fn build(self) -> Result<DeclarationGraph, GraphError> {
        let Self {
            mut packages,
            mut types,
            external_annotations,
            root_type,
        } = self;

        packages.sort_by(|a, b| a.name.cmp(&b.name));
        types.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));

        let mut package_index = HashMap::with_capacity(packages.len());
        for (i, package) in packages.iter().enumerate() {
            if package_index.insert(package.name.clone(), PackageId(i)).is_some() {
                return Err(GraphError::DuplicatePackage(package.name.clone()));
            }
        }

        let mut type_index = HashMap::with_capacity(types.len());
        for (i, ty) in types.iter().enumerate() {
            if type_index.insert(ty.qualified_name.clone(), TypeId(i)).is_some() {
                return Err(GraphError::DuplicateType(ty.qualified_name.clone()));
            }
        }

        let mut enclosing_type = vec![None; types.len()];
        for (i, ty) in types.iter().enumerate() {
            if let Enclosing::Type(outer) = &ty.enclosing {
                let outer_id = type_index.get(outer).copied().ok_or_else(|| {
                    GraphError::MissingEnclosingType {
                        type_name: ty.qualified_name.clone(),
                        enclosing: outer.clone(),
                    }
                })?;
                enclosing_type[i] = Some(outer_id);
            }
        }

        check_supertype_cycles(&types, &type_index)?;

        let mut package_of = Vec::with_capacity(types.len());
        for i in 0..types.len() {
            let package = owning_package_name(&types, &enclosing_type, i);
            let id = package_index.get(package).copied().ok_or_else(|| {
                GraphError::MissingPackage {
                    type_name: types[i].qualified_name.clone(),
                    package: package.to_owned(),
                }
            })?;
            package_of.push(id);
        }

        let mut graph = DeclarationGraph {
            package_types: vec![Vec::new(); packages.len()],
            package_parent: vec![None; packages.len()],
            package_children: vec![Vec::new(); packages.len()],
            super_type: vec![None; types.len()],
            subtypes: vec![BTreeSet::new(); types.len()],
            implementors: vec![BTreeSet::new(); types.len()],
            nested: vec![Vec::new(); types.len()],
            documented_annotations: HashSet::new(),
            packages,
            types,
            package_index,
            type_index,
            package_of,
            enclosing_type,
            root_type,
        };
        graph.derive_type_edges();
        graph.derive_package_tree();
        graph.documented_annotations = graph
            .types
            .iter()
            .filter(|t| t.kind == TypeKind::Annotation && t.documented)
            .map(|t| t.qualified_name.clone())
            .chain(
                external_annotations
                    .into_iter()
                    .filter(|a| a.documented)
                    .map(|a| a.name),
            )
            .collect();

        tracing::debug!(
            packages = graph.packages.len(),
            types = graph.types.len(),
            "Built declaration graph"
        );
        Ok(graph)
    }
}

/// Immutable snapshot of all documentable packages and types for a run.
#[derive(Debug)]
pub struct DeclarationGraph {
    packages: Vec<PackageDecl>,
    types: Vec<TypeDecl>,
    package_index: HashMap<String, PackageId>,
    type_index: HashMap<String, TypeId>,
    package_of: Vec<PackageId>,
    enclosing_type: Vec<Option<TypeId>>,
    package_types: Vec<Vec<TypeId>>,
    package_parent: Vec<Option<PackageId>>,
    package_children: Vec<Vec<PackageId>>,
    super_type: Vec<Option<TypeId>>,
    subtypes: Vec<BTreeSet<TypeId>>,
    implementors: Vec<BTreeSet<TypeId>>,
    nested: Vec<Vec<TypeId>>,
    documented_annotations: HashSet<String>,
    root_type: String,
}

impl DeclarationGraph {
    #[must_use]
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    /// Build a graph from a deserialized snapshot.
    pub fn from_snapshot(snapshot: Snapshot, root_type: &str) -> Result<Self, GraphError> {
        let mut builder = GraphBuilder::new().root_type(root_type);
        for package in snapshot.packages {
            builder.add_package(package);
        }
        for ty in snapshot.types {
            builder.add_type(ty);
        }
        for annotation in snapshot.annotation_types {
            builder.add_external_annotation(annotation);
        }
        builder.build()
    }

    pub fn root_type(&self) -> &str {
        &self.root_type
    }

    pub fn package(&self, id: PackageId) -> &PackageDecl {
        &self.packages[id.0]
    }

    pub fn type_decl(&self, id: TypeId) -> &TypeDecl {
        &self.types[id.0]
    }

    pub fn package_by_name(&self, name: &str) -> Option<PackageId> {
        self.package_index.get(name).copied()
    }

    pub fn type_by_name(&self, name: &str) -> Option<TypeId> {
        self.type_index.get(name).copied()
    }

    /// Known packages in name order.
    pub fn packages(&self) -> impl Iterator<Item = PackageId> + '_ {
        (0..self.packages.len())
            .map(PackageId)
            .filter(|&id| self.contains_package(id))
    }

    /// Known types in qualified-name order.
    pub fn types(&self) -> impl Iterator<Item = TypeId> + '_ {
        (0..self.types.len())
            .map(TypeId)
            .filter(|&id| self.contains(id))
    }

    /// Whether the type is in the known set.
    pub fn contains(&self, id: TypeId) -> bool {
        self.types[id.0].included
    }

    /// Whether the package is in the known set.
    pub fn contains_package(&self, id: PackageId) -> bool {
        self.packages[id.0].included
    }

    /// Whether a qualified type name resolves to a known type.
    pub fn contains_name(&self, name: &str) -> bool {
        self.type_by_name(name).is_some_and(|id| self.contains(id))
    }

    pub fn package_of(&self, id: TypeId) -> PackageId {
        self.package_of[id.0]
    }

    pub fn enclosing_type(&self, id: TypeId) -> Option<TypeId> {
        self.enclosing_type[id.0]
    }

    /// Known superclass, when the declared one is itself known.
    pub fn direct_super_type(&self, id: TypeId) -> Option<TypeId> {
        self.super_type[id.0]
    }

    /// Known types whose direct superclass is `id`.
    pub fn direct_subtypes(&self, id: TypeId) -> &BTreeSet<TypeId> {
        &self.subtypes[id.0]
    }

    /// Known types listing `id` among their declared interfaces.
    pub fn direct_implementors(&self, id: TypeId) -> &BTreeSet<TypeId> {
        &self.implementors[id.0]
    }

    /// Known types declared directly inside `id`.
    pub fn nested_types(&self, id: TypeId) -> &[TypeId] {
        &self.nested[id.0]
    }

    /// Known types owned by the package, nested types included.
    pub fn types_in_package(&self, id: PackageId) -> &[TypeId] {
        &self.package_types[id.0]
    }

    pub fn parent_package(&self, id: PackageId) -> Option<PackageId> {
        self.package_parent[id.0]
    }

    pub fn child_packages(&self, id: PackageId) -> &[PackageId] {
        &self.package_children[id.0]
    }

    /// Whether occurrences of the annotation type appear in rendered output.
    pub fn is_documented_annotation(&self, name: &str) -> bool {
        self.documented_annotations.contains(name)
    }

    /// Whether a type with this name can be shown to readers.
    ///
    /// Types absent from the snapshot are assumed to be publicly reachable.
    pub fn is_visible(&self, name: &str) -> bool {
        match self.type_by_name(name) {
            Some(id) => {
                let ty = &self.types[id.0];
                !ty.hidden && (ty.included || ty.modifiers.is_public())
            }
            None => true,
        }
    }

    /// Whether the referenced type, or any type enclosing it, carries type arguments.
    pub fn is_generic(&self, ty: &TypeRef) -> bool {
        match ty {
            TypeRef::Declared {
                args, enclosing, ..
            } => !args.is_empty() || enclosing.as_deref().is_some_and(|e| self.is_generic(e)),
            _ => false,
        }
    }

    /// Visible superclass chain, most general first.
    ///
    /// Each step takes the closest superclass that is visible, skipping
    /// hidden or non-public undocumented ones. A superclass outside the
    /// snapshot ends the chain after being recorded.
    pub fn ancestor_chain(&self, id: TypeId) -> Result<Vec<TypeRef>, GraphError> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(id);
        while let Some(ty) = current {
            let Some(visible) = self.first_visible_superclass(ty, &mut seen)? else {
                break;
            };
            current = visible.declared_name().and_then(|n| self.type_by_name(n));
            chain.push(visible);
        }
        chain.reverse();
        Ok(chain)
    }

    fn first_visible_superclass(
        &self,
        id: TypeId,
        seen: &mut HashSet<TypeId>,
    ) -> Result<Option<TypeRef>, GraphError> {
        let mut candidate = self.types[id.0].superclass.clone();
        while let Some(sup) = candidate {
            let Some(name) = sup.declared_name() else {
                return Ok(None);
            };
            let Some(sup_id) = self.type_by_name(name) else {
                return Ok(Some(sup));
            };
            if !seen.insert(sup_id) {
                return Err(GraphError::SupertypeCycle {
                    type_name: name.to_owned(),
                });
            }
            if self.is_visible(name) {
                return Ok(Some(sup));
            }
            candidate = self.types[sup_id.0].superclass.clone();
        }
        Ok(None)
    }

    fn derive_type_edges(&mut self) {
        for i in 0..self.types.len() {
            let id = TypeId(i);
            if !self.contains(id) {
                continue;
            }
            let package = self.package_of[i];
            self.package_types[package.0].push(id);

            if let Some(outer) = self.enclosing_type[i] {
                self.nested[outer.0].push(id);
            }

            let super_id = self.types[i]
                .superclass
                .as_ref()
                .and_then(TypeRef::declared_name)
                .and_then(|name| self.type_by_name(name))
                .filter(|&sup| self.contains(sup));
            if let Some(sup) = super_id {
                self.super_type[i] = Some(sup);
                self.subtypes[sup.0].insert(id);
            }

            let interfaces: Vec<TypeId> = self.types[i]
                .interfaces
                .iter()
                .filter_map(TypeRef::declared_name)
                .filter_map(|name| self.type_by_name(name))
                .filter(|&iface| self.contains(iface))
                .collect();
            for iface in interfaces {
                self.implementors[iface.0].insert(id);
            }
        }
    }

    fn derive_package_tree(&mut self) {
        for i in 0..self.packages.len() {
            let id = PackageId(i);
            if !self.contains_package(id) {
                continue;
            }
            let parent = self.packages[i]
                .name
                .rsplit_once('.')
                .and_then(|(prefix, _)| self.package_by_name(prefix))
                .filter(|&p| self.contains_package(p));
            if let Some(parent) = parent {
                self.package_parent[i] = Some(parent);
                self.package_children[parent.0].push(id);
            }
        }
    }
}

/// Name of the package that ultimately owns type `i`.
fn owning_package_name<'a>(
    types: &'a [TypeDecl],
    enclosing_type: &[Option<TypeId>],
    mut i: usize,
) -> &'a str {
    // Bounded walk: malformed input may nest types inside each other.
    let mut steps = 0;
    while let Some(outer) = enclosing_type[i] {
        i = outer.0;
        steps += 1;
        if steps > types.len() {
            break;
        }
    }
    match &types[i].enclosing {
        Enclosing::Package(name) => name,
        Enclosing::Type(_) => "",
    }
}

/// Reject superclass cycles among snapshot types.
fn check_supertype_cycles(
    types: &[TypeDecl],
    type_index: &HashMap<String, TypeId>,
) -> Result<(), GraphError> {
    let superclass_of = |i: usize| {
        types[i]
            .superclass
            .as_ref()
            .and_then(TypeRef::declared_name)
            .and_then(|name| type_index.get(name))
            .map(|id| id.0)
    };

    // 0 = unvisited, 1 = on the current walk, 2 = proven acyclic
    let mut state = vec![0u8; types.len()];
    for start in 0..types.len() {
        let mut path = Vec::new();
        let mut current = Some(start);
        while let Some(i) = current {
            match state[i] {
                2 => break,
                1 => {
                    return Err(GraphError::SupertypeCycle {
                        type_name: types[i].qualified_name.clone(),
                    });
                }
                _ => {
                    state[i] = 1;
                    path.push(i);
                    current = superclass_of(i);
                }
            }
        }
        for i in path {
            state[i] = 2;
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    // Pages are rendered from many threads against one graph
    static_assertions::assert_impl_all!(super::DeclarationGraph: Send, Sync);

    use super::*;
    use crate::decl::{Modifier, Modifiers};

    pub(crate) fn package(name: &str) -> PackageDecl {
        PackageDecl {
            name: name.to_owned(),
            included: true,
            annotations: Vec::new(),
            doc: Vec::new(),
        }
    }

    pub(crate) fn class(qualified: &str, superclass: Option<&str>) -> TypeDecl {
        let (package, simple) = qualified.rsplit_once('.').unwrap_or(("", qualified));
        TypeDecl {
            qualified_name: qualified.to_owned(),
            simple_name: simple.to_owned(),
            kind: TypeKind::Class,
            enclosing: Enclosing::Package(package.to_owned()),
            superclass: superclass.map(TypeRef::declared),
            interfaces: Vec::new(),
            type_params: Vec::new(),
            annotations: Vec::new(),
            members: Vec::new(),
            modifiers: Modifiers(vec![Modifier::Public]),
            deprecated: None,
            doc: Vec::new(),
            included: true,
            hidden: false,
            documented: false,
            functional: false,
        }
    }

    pub(crate) fn nested(outer: &str, simple: &str) -> TypeDecl {
        let mut ty = class(&format!("{outer}.{simple}"), None);
        ty.enclosing = Enclosing::Type(outer.to_owned());
        ty
    }

    fn build(packages: &[&str], types: Vec<TypeDecl>) -> Result<DeclarationGraph, GraphError> {
        let mut builder = DeclarationGraph::builder();
        for name in packages {
            builder.add_package(package(name));
        }
        for ty in types {
            builder.add_type(ty);
        }
        builder.build()
    }

    #[test]
    fn test_subtypes_are_inverse_of_supertype() {
        let graph = build(
            &["a"],
            vec![
                class("a.Base", Some("java.lang.Object")),
                class("a.Left", Some("a.Base")),
                class("a.Right", Some("a.Base")),
                class("a.Leaf", Some("a.Left")),
            ],
        )
        .unwrap();

        for ty in graph.types() {
            for other in graph.types() {
                assert_eq!(
                    graph.direct_subtypes(other).contains(&ty),
                    graph.direct_super_type(ty) == Some(other)
                );
            }
        }
        let base = graph.type_by_name("a.Base").unwrap();
        assert_eq!(graph.direct_subtypes(base).len(), 2);
        assert_eq!(graph.direct_super_type(base), None);
    }

    #[test]
    fn test_unknown_types_have_no_edges() {
        let mut hidden = class("a.Excluded", Some("a.Base"));
        hidden.included = false;
        let graph = build(&["a"], vec![class("a.Base", None), hidden]).unwrap();

        let base = graph.type_by_name("a.Base").unwrap();
        let excluded = graph.type_by_name("a.Excluded").unwrap();
        assert!(!graph.contains(excluded));
        assert!(graph.direct_subtypes(base).is_empty());
        assert_eq!(graph.direct_super_type(excluded), None);
        assert_eq!(graph.types().count(), 1);
    }

    #[test]
    fn test_supertype_cycle_is_rejected() {
        let result = build(
            &["a"],
            vec![class("a.A", Some("a.B")), class("a.B", Some("a.A"))],
        );

        assert!(matches!(result, Err(GraphError::SupertypeCycle { .. })));
    }

    #[test]
    fn test_missing_package_is_rejected() {
        let result = build(&["a"], vec![class("b.C", None)]);

        let err = result.unwrap_err();
        assert!(matches!(err, GraphError::MissingPackage { .. }));
        assert!(err.to_string().contains("b.C"));
    }

    #[test]
    fn test_duplicate_type_is_rejected() {
        let result = build(&["a"], vec![class("a.C", None), class("a.C", None)]);

        assert!(matches!(result, Err(GraphError::DuplicateType(_))));
    }

    #[test]
    fn test_package_tree() {
        let graph = build(&["a", "a.b", "a.b.c", "a.b.d", "a.x.y"], Vec::new()).unwrap();

        let ab = graph.package_by_name("a.b").unwrap();
        let abc = graph.package_by_name("a.b.c").unwrap();
        let axy = graph.package_by_name("a.x.y").unwrap();
        let children: Vec<&str> = graph
            .child_packages(ab)
            .iter()
            .map(|&p| graph.package(p).name.as_str())
            .collect();

        assert_eq!(children, vec!["a.b.c", "a.b.d"]);
        assert_eq!(graph.parent_package(abc), Some(ab));
        assert_eq!(graph.parent_package(axy), None);
    }

    #[test]
    fn test_types_in_package_include_nested() {
        let graph = build(
            &["a", "b"],
            vec![
                class("a.Outer", None),
                nested("a.Outer", "Inner"),
                class("b.Other", None),
            ],
        )
        .unwrap();

        let a = graph.package_by_name("a").unwrap();
        let outer = graph.type_by_name("a.Outer").unwrap();
        let inner = graph.type_by_name("a.Outer.Inner").unwrap();
        assert_eq!(graph.types_in_package(a), &[outer, inner]);
        assert_eq!(graph.nested_types(outer), &[inner]);
        assert_eq!(graph.enclosing_type(inner), Some(outer));
        assert_eq!(graph.package_of(inner), a);
    }

    #[test]
    fn test_implementors() {
        let mut iface = class("a.Shape", None);
        iface.kind = TypeKind::Interface;
        let mut circle = class("a.Circle", None);
        circle.interfaces.push(TypeRef::declared("a.Shape"));
        let graph = build(&["a"], vec![iface, circle]).unwrap();

        let shape = graph.type_by_name("a.Shape").unwrap();
        let circle = graph.type_by_name("a.Circle").unwrap();
        assert!(graph.direct_implementors(shape).contains(&circle));
    }

    #[test]
    fn test_ancestor_chain_skips_invisible() {
        let mut internal = class("a.Internal", Some("a.Base"));
        internal.included = false;
        internal.modifiers = Modifiers::default();
        let graph = build(
            &["a"],
            vec![
                class("a.Base", Some("java.lang.Object")),
                internal,
                class("a.Leaf", Some("a.Internal")),
            ],
        )
        .unwrap();

        let leaf = graph.type_by_name("a.Leaf").unwrap();
        let chain: Vec<String> = graph
            .ancestor_chain(leaf)
            .unwrap()
            .iter()
            .filter_map(|t| t.declared_name().map(str::to_owned))
            .collect();

        assert_eq!(chain, vec!["java.lang.Object", "a.Base"]);
    }

    #[test]
    fn test_documented_annotations() {
        let mut local = class("a.Marker", None);
        local.kind = TypeKind::Annotation;
        local.documented = true;
        let mut builder = DeclarationGraph::builder();
        builder
            .add_package(package("a"))
            .add_type(local)
            .add_external_annotation(ExternalAnnotation {
                name: "x.Doc".to_owned(),
                documented: true,
            })
            .add_external_annotation(ExternalAnnotation {
                name: "x.Plain".to_owned(),
                documented: false,
            });
        let graph = builder.build().unwrap();

        assert!(graph.is_documented_annotation("a.Marker"));
        assert!(graph.is_documented_annotation("x.Doc"));
        assert!(!graph.is_documented_annotation("x.Plain"));
    }

    #[test]
    fn test_is_generic_through_enclosing() {
        let graph = build(&["a"], Vec::new()).unwrap();
        let outer = TypeRef::Declared {
            name: "a.Outer".to_owned(),
            args: vec![TypeRef::declared("a.T")],
            enclosing: None,
            annotations: Vec::new(),
        };
        let inner = TypeRef::Declared {
            name: "a.Outer.Inner".to_owned(),
            args: Vec::new(),
            enclosing: Some(Box::new(outer)),
            annotations: Vec::new(),
        };

        assert!(graph.is_generic(&inner));
        assert!(!graph.is_generic(&TypeRef::declared("a.Outer")));
    }
}
