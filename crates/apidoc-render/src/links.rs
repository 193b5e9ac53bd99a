//! Markdown links between generated pages.

use apidoc_model::{
    DeclarationGraph, PackageId, PackageLinkProvider, PageNaming, PageRef, TypeId,
    TypeLinkProvider, TypeParam, TypeRef, simple_name_of,
};

use crate::display::{DisplayMode, DisplayNameBuilder};

/// Builds `[text](path)` links from one source page.
///
/// Falls back to bare text when the target is the source page itself or
/// lies outside the known set.
#[derive(Clone, Copy, Debug)]
pub struct LinkBuilder<'a> {
    naming: PageNaming<'a>,
    source: PageRef,
    display: DisplayNameBuilder<'a>,
}

impl<'a> LinkBuilder<'a> {
    pub fn new(naming: PageNaming<'a>, source: PageRef) -> Self {
        Self {
            naming,
            source,
            display: DisplayNameBuilder::new(naming.graph()),
        }
    }

    /// Same links, with link text in another display mode.
    #[must_use]
    pub fn with_mode(self, mode: DisplayMode) -> Self {
        Self {
            display: self.display.with_mode(mode),
            ..self
        }
    }

    pub fn source(&self) -> PageRef {
        self.source
    }

    pub fn graph(&self) -> &'a DeclarationGraph {
        self.naming.graph()
    }

    pub fn naming(&self) -> PageNaming<'a> {
        self.naming
    }

    pub fn display(&self) -> DisplayNameBuilder<'a> {
        self.display
    }

    /// Display name of `ty`, linked to the page of the type it names.
    pub fn type_ref(&self, ty: &TypeRef) -> String {
        let text = self.display.build(ty);
        let target = ty
            .declared_name()
            .and_then(|name| self.graph().type_by_name(name));
        match target {
            Some(id) => wrap(text, self.type_path(id)),
            None => text,
        }
    }

    /// Link to a type page, showing the type with its declared parameters.
    pub fn type_id(&self, id: TypeId) -> String {
        self.type_ref(&declared_type(self.graph(), id))
    }

    /// Arbitrary text linked to the page of the named type.
    pub fn named(&self, qualified_name: &str, text: String) -> String {
        match self.graph().type_by_name(qualified_name) {
            Some(id) => wrap(text, self.type_path(id)),
            None => text,
        }
    }

    /// Link to a package index page.
    pub fn package(&self, id: PackageId, qualified: bool) -> String {
        let name = &self.graph().package(id).name;
        let text = if qualified {
            name.clone()
        } else {
            simple_name_of(name).to_owned()
        };
        let path = if self.source == PageRef::Package(id) {
            None
        } else {
            PackageLinkProvider::new(self.naming).relative_link(self.source, id)
        };
        wrap(text, path)
    }

    /// Link to an anchor on a type page.
    pub fn member(&self, owner: TypeId, anchor: &str, text: &str) -> String {
        let path = if self.source == PageRef::Type(owner) {
            Some(String::new())
        } else {
            TypeLinkProvider::new(self.naming).relative_link(self.source, owner)
        };
        match path {
            Some(path) => format!("[{text}]({path}#{anchor})"),
            None => text.to_owned(),
        }
    }

    fn type_path(&self, id: TypeId) -> Option<String> {
        if self.source == PageRef::Type(id) {
            return None;
        }
        TypeLinkProvider::new(self.naming).relative_link(self.source, id)
    }
}

fn wrap(text: String, path: Option<String>) -> String {
    match path {
        Some(path) => format!("[{text}]({path})"),
        None => text,
    }
}

/// Reference to a type as written in its own declaration, parameters included.
pub fn declared_type(graph: &DeclarationGraph, id: TypeId) -> TypeRef {
    let decl = graph.type_decl(id);
    TypeRef::Declared {
        name: decl.qualified_name.clone(),
        args: decl.type_params.iter().map(TypeParam::to_type_ref).collect(),
        enclosing: None,
        annotations: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tests::sample_graph;

    #[test]
    fn test_type_links() {
        let graph = sample_graph();
        let naming = PageNaming::new(&graph, "md");
        let source = PageRef::Package(graph.package_by_name("a.b.c").unwrap());
        let links = LinkBuilder::new(naming, source);

        assert_eq!(
            links.type_ref(&TypeRef::declared("a.b.d.E")),
            "[E](../d/E.md)"
        );
        assert_eq!(
            links.with_mode(DisplayMode::Qualified).type_ref(&TypeRef::declared("a.b.d.E")),
            "[a.b.d.E](../d/E.md)"
        );
        assert_eq!(links.type_ref(&TypeRef::declared("java.lang.String")), "String");
    }

    #[test]
    fn test_self_link_is_bare_text() {
        let graph = sample_graph();
        let naming = PageNaming::new(&graph, "md");
        let e = graph.type_by_name("a.b.d.E").unwrap();
        let links = LinkBuilder::new(naming, PageRef::Type(e));

        assert_eq!(links.type_id(e), "E\\<T\\>");
        assert_eq!(links.member(e, "run()", "run"), "[run](#run())");
    }

    #[test]
    fn test_package_links() {
        let graph = sample_graph();
        let naming = PageNaming::new(&graph, "md");
        let e = graph.type_by_name("a.b.d.E").unwrap();
        let abc = graph.package_by_name("a.b.c").unwrap();
        let links = LinkBuilder::new(naming, PageRef::Type(e));

        assert_eq!(links.package(abc, true), "[a.b.c](../c/index.md)");
        assert_eq!(links.package(abc, false), "[c](../c/index.md)");
        assert_eq!(
            LinkBuilder::new(naming, PageRef::Package(abc)).package(abc, true),
            "a.b.c"
        );
    }

    #[test]
    fn test_member_link_across_pages() {
        let graph = sample_graph();
        let naming = PageNaming::new(&graph, "md");
        let e = graph.type_by_name("a.b.d.E").unwrap();
        let source = PageRef::Package(graph.package_by_name("a.b.c").unwrap());

        assert_eq!(
            LinkBuilder::new(naming, source).member(e, "SIZE", "E.SIZE"),
            "[E.SIZE](../d/E.md#SIZE)"
        );
    }
}
