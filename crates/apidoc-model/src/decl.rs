//! Declaration descriptors.
//!
//! These are the raw records handed over by the source-analysis front end,
//! one per package and one per type. They are deserialized from a JSON
//! snapshot and then frozen into a [`DeclarationGraph`](crate::DeclarationGraph).

use serde::{Deserialize, Serialize};

/// A complete declaration snapshot for one run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub packages: Vec<PackageDecl>,
    pub types: Vec<TypeDecl>,
    /// Facts about annotation types declared outside the snapshot.
    pub annotation_types: Vec<ExternalAnnotation>,
}

impl Snapshot {
    /// Parse a snapshot from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Package descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDecl {
    /// Qualified dotted name (e.g., `a.b.c`).
    pub name: String,
    /// Whether the package belongs to the documented set.
    #[serde(default = "default_true")]
    pub included: bool,
    #[serde(default)]
    pub annotations: Vec<AnnotationUse>,
    #[serde(default)]
    pub doc: Vec<DocNode>,
}

/// Type descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Qualified name using dots for both package and nesting (e.g., `a.b.Outer.Inner`).
    pub qualified_name: String,
    pub simple_name: String,
    pub kind: TypeKind,
    pub enclosing: Enclosing,
    #[serde(default)]
    pub superclass: Option<TypeRef>,
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
    #[serde(default)]
    pub annotations: Vec<AnnotationUse>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub deprecated: Option<Deprecation>,
    #[serde(default)]
    pub doc: Vec<DocNode>,
    #[serde(default = "default_true")]
    pub included: bool,
    /// Carries a hide marker in its documentation.
    #[serde(default)]
    pub hidden: bool,
    /// Annotation types only: occurrences are shown in rendered output.
    #[serde(default)]
    pub documented: bool,
    /// Interfaces only: marked as a functional interface.
    #[serde(default)]
    pub functional: bool,
}

impl TypeDecl {
    /// The package or type this declaration is nested in.
    pub fn enclosing_type(&self) -> Option<&str> {
        match &self.enclosing {
            Enclosing::Type(name) => Some(name),
            Enclosing::Package(_) => None,
        }
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface | TypeKind::Annotation)
    }
}

/// Exactly one enclosing declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Enclosing {
    Package(String),
    Type(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

impl TypeKind {
    /// Heading label used on type pages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Class => "Class",
            Self::Interface => "Interface",
            Self::Enum => "Enum",
            Self::Record => "Record Class",
            Self::Annotation => "Annotation Interface",
        }
    }

    /// Keyword used in declaration signatures.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Record => "record",
            Self::Annotation => "@interface",
        }
    }
}

/// Deprecation marker.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deprecation {
    pub for_removal: bool,
    pub doc: Vec<DocNode>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Abstract,
    Final,
    Default,
    Sealed,
    Synchronized,
    Native,
    Transient,
    Volatile,
}

impl Modifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
            Self::Static => "static",
            Self::Abstract => "abstract",
            Self::Final => "final",
            Self::Default => "default",
            Self::Sealed => "sealed",
            Self::Synchronized => "synchronized",
            Self::Native => "native",
            Self::Transient => "transient",
            Self::Volatile => "volatile",
        }
    }
}

/// Ordered modifier list as written in source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Modifiers(pub Vec<Modifier>);

impl Modifiers {
    pub fn has(&self, modifier: Modifier) -> bool {
        self.0.contains(&modifier)
    }

    pub fn is_public(&self) -> bool {
        self.has(Modifier::Public)
    }

    pub fn is_static(&self) -> bool {
        self.has(Modifier::Static)
    }

    /// Space-separated keywords, empty when there are none.
    pub fn keywords(&self) -> String {
        self.0
            .iter()
            .map(|m| m.keyword())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Declared type parameter with its ordered bound list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParam {
    pub name: String,
    #[serde(default)]
    pub bounds: Vec<TypeRef>,
    #[serde(default)]
    pub annotations: Vec<AnnotationUse>,
}

impl TypeParam {
    /// Reference form used when rendering the declaring type's own name.
    pub fn to_type_ref(&self) -> TypeRef {
        TypeRef::Variable {
            name: self.name.clone(),
            bounds: self.bounds.clone(),
            annotations: self.annotations.clone(),
        }
    }
}

/// A use of a type, as it appears in signatures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    Declared {
        /// Qualified name of the referenced type.
        name: String,
        #[serde(default)]
        args: Vec<TypeRef>,
        /// Parameterized enclosing type, when the reference is to a nested type.
        #[serde(default)]
        enclosing: Option<Box<TypeRef>>,
        #[serde(default)]
        annotations: Vec<AnnotationUse>,
    },
    Variable {
        name: String,
        #[serde(default)]
        bounds: Vec<TypeRef>,
        #[serde(default)]
        annotations: Vec<AnnotationUse>,
    },
    Wildcard {
        #[serde(default)]
        extends: Option<Box<TypeRef>>,
        #[serde(default, rename = "super")]
        super_bound: Option<Box<TypeRef>>,
        #[serde(default)]
        annotations: Vec<AnnotationUse>,
    },
    Primitive {
        name: String,
        #[serde(default)]
        annotations: Vec<AnnotationUse>,
    },
    Array {
        component: Box<TypeRef>,
        #[serde(default)]
        annotations: Vec<AnnotationUse>,
    },
    Void,
}

impl TypeRef {
    /// Unannotated reference to a declared type without arguments.
    pub fn declared(name: impl Into<String>) -> Self {
        Self::Declared {
            name: name.into(),
            args: Vec::new(),
            enclosing: None,
            annotations: Vec::new(),
        }
    }

    /// Qualified name of the declaration this reference points at, if any.
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            Self::Declared { name, .. } => Some(name),
            Self::Array { component, .. } => component.declared_name(),
            _ => None,
        }
    }

    pub fn annotations(&self) -> &[AnnotationUse] {
        match self {
            Self::Declared { annotations, .. }
            | Self::Variable { annotations, .. }
            | Self::Wildcard { annotations, .. }
            | Self::Primitive { annotations, .. }
            | Self::Array { annotations, .. } => annotations,
            Self::Void => &[],
        }
    }

    pub fn is_annotated(&self) -> bool {
        !self.annotations().is_empty()
    }
}

/// One annotation occurrence on a declaration or type use.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationUse {
    /// Qualified name of the annotation type.
    pub type_name: String,
    /// Explicit element values in source order.
    #[serde(default)]
    pub elements: Vec<AnnotationElement>,
    /// Implicitly synthesized by the compiler.
    #[serde(default)]
    pub mandated: bool,
}

impl AnnotationUse {
    pub fn simple_name(&self) -> &str {
        simple_name_of(&self.type_name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationElement {
    pub name: String,
    pub value: AnnotationValue,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnnotationValue {
    /// Constant in source form (e.g., `42`, `"text"`).
    Literal(String),
    /// Class literal.
    Type(TypeRef),
    EnumConstant { type_name: String, constant: String },
    Annotation(Box<AnnotationUse>),
    Array(Vec<AnnotationValue>),
}

/// Annotation type declared outside the snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalAnnotation {
    pub name: String,
    #[serde(default)]
    pub documented: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Field,
    Method,
    Constructor,
    EnumConstant,
    AnnotationElement,
    Property,
}

/// Parameter of a method or constructor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
    #[serde(default)]
    pub annotations: Vec<AnnotationUse>,
    #[serde(default)]
    pub varargs: bool,
}

/// A declared member. One record for every kind; unused fields stay empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub kind: MemberKind,
    pub name: String,
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Field type or method return type.
    #[serde(default)]
    pub ty: Option<TypeRef>,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
    #[serde(default)]
    pub throws: Vec<TypeRef>,
    /// Annotation elements: absent means the element is required.
    #[serde(default)]
    pub default_value: Option<AnnotationValue>,
    /// Compile-time constant value in source form.
    #[serde(default)]
    pub constant_value: Option<String>,
    #[serde(default)]
    pub annotations: Vec<AnnotationUse>,
    #[serde(default)]
    pub deprecated: Option<Deprecation>,
    #[serde(default)]
    pub doc: Vec<DocNode>,
}

/// Inline documentation markup, the closed set of node kinds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocNode {
    Text { text: String },
    StartElement { name: String },
    EndElement { name: String },
    /// Named character reference without the `&`/`;` delimiters.
    Entity { name: String },
    Comment { text: String },
    Code { text: String },
    Literal { text: String },
    Link {
        /// Qualified type or package name.
        target: String,
        #[serde(default)]
        member: Option<String>,
        #[serde(default)]
        label: Vec<DocNode>,
        #[serde(default)]
        plain: bool,
    },
    BlockTag {
        name: String,
        #[serde(default)]
        param: Option<String>,
        #[serde(default)]
        body: Vec<DocNode>,
    },
}

impl DocNode {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Last dot-separated segment of a qualified name.
pub fn simple_name_of(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_snapshot() {
        let json = r#"{
            "packages": [{"name": "a.b"}],
            "types": [{
                "qualified_name": "a.b.C",
                "simple_name": "C",
                "kind": "class",
                "enclosing": {"package": "a.b"},
                "superclass": {"kind": "declared", "name": "java.lang.Object"},
                "modifiers": ["public", "final"]
            }]
        }"#;
        let snapshot = Snapshot::from_json(json).unwrap();

        assert_eq!(snapshot.packages[0].name, "a.b");
        assert!(snapshot.packages[0].included);
        let ty = &snapshot.types[0];
        assert_eq!(ty.kind, TypeKind::Class);
        assert_eq!(ty.enclosing, Enclosing::Package("a.b".to_owned()));
        assert_eq!(
            ty.superclass.as_ref().and_then(TypeRef::declared_name),
            Some("java.lang.Object")
        );
        assert_eq!(ty.modifiers.keywords(), "public final");
        assert!(ty.included);
        assert!(!ty.hidden);
    }

    #[test]
    fn test_parse_annotation_values() {
        let json = r#"{
            "type_name": "a.Tag",
            "elements": [
                {"name": "value", "value": {"kind": "array", "value": [
                    {"kind": "literal", "value": "\"x\""},
                    {"kind": "enum_constant", "value": {"type_name": "a.E", "constant": "ONE"}}
                ]}}
            ]
        }"#;
        let annotation: AnnotationUse = serde_json::from_str(json).unwrap();

        assert_eq!(annotation.simple_name(), "Tag");
        assert!(!annotation.mandated);
        let AnnotationValue::Array(values) = &annotation.elements[0].value else {
            panic!("expected array value");
        };
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_parse_wildcard_super() {
        let json = r#"{"kind": "wildcard", "super": {"kind": "declared", "name": "a.B"}}"#;
        let ty: TypeRef = serde_json::from_str(json).unwrap();

        assert!(matches!(ty, TypeRef::Wildcard { super_bound: Some(_), extends: None, .. }));
    }

    #[test]
    fn test_simple_name_of() {
        assert_eq!(simple_name_of("a.b.Outer.Inner"), "Inner");
        assert_eq!(simple_name_of("Plain"), "Plain");
    }
}
