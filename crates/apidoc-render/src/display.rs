//! Display names for type references.

use std::fmt;

use apidoc_model::{AnnotationUse, DeclarationGraph, TypeRef, simple_name_of};

use crate::annotation::AnnotationRenderer;

/// How a type reference is spelled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    /// Qualified name without type arguments (`java.util.List`).
    Qualified,
    /// Simple name without type arguments (`List`).
    Simple,
    /// Documentation form prefixed with the package name (`java.util.List<E>`).
    PackageQualified,
    /// Simple name with annotations, type arguments, bounds and parameterized
    /// enclosing types (`Outer<T>.Inner<U>`).
    #[default]
    Documentation,
}

/// Renders [`TypeRef`]s as text in one [`DisplayMode`].
///
/// The builder is an immutable value: [`with_mode`](Self::with_mode) returns
/// a new builder, so one instance can be shared freely across threads.
///
/// Type argument brackets are written as `\<` and `\>` so they survive
/// Markdown inline rendering. Use [`plain`](Self::plain) for code blocks.
#[derive(Clone, Copy)]
pub struct DisplayNameBuilder<'a> {
    graph: &'a DeclarationGraph,
    mode: DisplayMode,
    escape_brackets: bool,
}

impl<'a> DisplayNameBuilder<'a> {
    pub fn new(graph: &'a DeclarationGraph) -> Self {
        Self {
            graph,
            mode: DisplayMode::default(),
            escape_brackets: true,
        }
    }

    #[must_use]
    pub fn with_mode(self, mode: DisplayMode) -> Self {
        Self { mode, ..self }
    }

    /// Builder writing bare `<` and `>` around type arguments.
    #[must_use]
    pub fn plain(self) -> Self {
        Self {
            escape_brackets: false,
            ..self
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn build(&self, ty: &TypeRef) -> String {
        let mut out = String::new();
        match self.mode {
            DisplayMode::Qualified => self.push_erased(ty, &mut out, true),
            DisplayMode::Simple => self.push_erased(ty, &mut out, false),
            DisplayMode::PackageQualified => {
                if let Some(package) = ty.declared_name().and_then(|n| self.package_prefix(n)) {
                    out.push_str(package);
                    out.push('.');
                }
                self.push_documentation(ty, &mut out);
            }
            DisplayMode::Documentation => self.push_documentation(ty, &mut out),
        }
        out
    }

    /// Package part of a qualified type name.
    ///
    /// Falls back to the leading lowercase segments for types outside the
    /// snapshot.
    fn package_prefix<'n>(&self, name: &'n str) -> Option<&'n str> {
        if let Some(id) = self.graph.type_by_name(name) {
            let package = &self.graph.package(self.graph.package_of(id)).name;
            return name
                .strip_prefix(package.as_str())
                .filter(|rest| rest.starts_with('.'))
                .map(|_| &name[..package.len()]);
        }
        let mut end = 0;
        for segment in name.split('.') {
            if segment.starts_with(|c: char| c.is_ascii_uppercase()) {
                break;
            }
            end += segment.len() + 1;
        }
        (end > 1 && end <= name.len()).then(|| &name[..end - 1])
    }

    fn push_erased(&self, ty: &TypeRef, out: &mut String, qualified: bool) {
        match ty {
            TypeRef::Declared { name, .. } => {
                out.push_str(if qualified { name } else { simple_name_of(name) });
            }
            TypeRef::Variable { name, .. } | TypeRef::Primitive { name, .. } => out.push_str(name),
            TypeRef::Wildcard { .. } => out.push('?'),
            TypeRef::Array { component, .. } => {
                self.push_erased(component, out, qualified);
                out.push_str("[]");
            }
            TypeRef::Void => out.push_str("void"),
        }
    }

    fn push_documentation(&self, ty: &TypeRef, out: &mut String) {
        match ty {
            TypeRef::Declared {
                name,
                args,
                enclosing,
                annotations,
            } => {
                if let Some(outer) = enclosing.as_deref().filter(|e| self.graph.is_generic(e)) {
                    self.push_documentation(outer, out);
                    out.push('.');
                }
                self.push_annotations(annotations, out);
                out.push_str(simple_name_of(name));
                self.push_arguments(args, out);
            }
            TypeRef::Variable {
                name,
                bounds,
                annotations,
            } => {
                self.push_annotations(annotations, out);
                out.push_str(name);
                if !self.is_implicit_root_bound(bounds) {
                    for (i, bound) in bounds.iter().enumerate() {
                        out.push_str(if i == 0 { " extends " } else { " & " });
                        self.push_documentation(bound, out);
                    }
                }
            }
            TypeRef::Wildcard {
                extends,
                super_bound,
                annotations,
            } => {
                self.push_annotations(annotations, out);
                out.push('?');
                if let Some(bound) = extends {
                    out.push_str(" extends ");
                    self.push_documentation(bound, out);
                }
                if let Some(bound) = super_bound {
                    out.push_str(" super ");
                    self.push_documentation(bound, out);
                }
            }
            TypeRef::Primitive { name, annotations } => {
                self.push_annotations(annotations, out);
                out.push_str(name);
            }
            TypeRef::Array {
                component,
                annotations,
            } => {
                self.push_documentation(component, out);
                let mut annotated = String::new();
                self.push_annotations(annotations, &mut annotated);
                if !annotated.is_empty() {
                    out.push(' ');
                    out.push_str(&annotated);
                }
                out.push_str("[]");
            }
            TypeRef::Void => out.push_str("void"),
        }
    }

    /// A lone unannotated bound on the root type is implied and not shown.
    fn is_implicit_root_bound(&self, bounds: &[TypeRef]) -> bool {
        match bounds {
            [TypeRef::Declared {
                name, annotations, ..
            }] => name == self.graph.root_type() && annotations.is_empty(),
            _ => false,
        }
    }

    fn push_arguments(&self, args: &[TypeRef], out: &mut String) {
        if args.is_empty() {
            return;
        }
        let (open, close) = if self.escape_brackets {
            ("\\<", "\\>")
        } else {
            ("<", ">")
        };
        let inner = self.with_mode(DisplayMode::Documentation);
        out.push_str(open);
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            inner.push_documentation(arg, out);
        }
        out.push_str(close);
    }

    fn push_annotations(&self, annotations: &[AnnotationUse], out: &mut String) {
        if annotations.is_empty() {
            return;
        }
        let text = AnnotationRenderer::new(self.graph).render(annotations);
        if !text.is_empty() {
            out.push_str(&text);
            out.push(' ');
        }
    }
}

impl PartialEq for DisplayNameBuilder<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph)
            && self.mode == other.mode
            && self.escape_brackets == other.escape_brackets
    }
}

impl Eq for DisplayNameBuilder<'_> {}

impl fmt::Debug for DisplayNameBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayNameBuilder")
            .field("mode", &self.mode)
            .field("escape_brackets", &self.escape_brackets)
            .finish_non_exhaustive()
    }
}
