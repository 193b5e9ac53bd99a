//! Relative links between generated pages.
//!
//! Every package gets an index page at `a/b/c/index.<ext>` and every type a
//! page at `a/b/c/Outer$Inner.<ext>`. Both providers resolve links with the
//! same walk over package name segments; they differ only in the file name
//! they append for the target.

use crate::graph::{DeclarationGraph, PackageId, TypeId};

/// Separator between outer and inner simple names in type file names.
pub const NESTED_SEPARATOR: char = '$';

/// File name of a package index page, without extension.
const PACKAGE_INDEX_STEM: &str = "index";

/// File name of the constant values page, without extension.
const CONSTANT_VALUES_STEM: &str = "constant-values";

/// Identity of a generated page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageRef {
    Package(PackageId),
    Type(TypeId),
    /// Run-wide constant values page at the destination root.
    ConstantValues,
}

impl From<PackageId> for PageRef {
    fn from(id: PackageId) -> Self {
        Self::Package(id)
    }
}

impl From<TypeId> for PageRef {
    fn from(id: TypeId) -> Self {
        Self::Type(id)
    }
}

/// File naming shared by the link providers and the output writer.
#[derive(Clone, Copy, Debug)]
pub struct PageNaming<'a> {
    graph: &'a DeclarationGraph,
    extension: &'a str,
}

impl<'a> PageNaming<'a> {
    #[must_use]
    pub fn new(graph: &'a DeclarationGraph, extension: &'a str) -> Self {
        Self { graph, extension }
    }

    pub fn graph(&self) -> &'a DeclarationGraph {
        self.graph
    }

    /// Package name segments of the directory holding the page.
    pub fn segments(&self, page: PageRef) -> Vec<&'a str> {
        let package = match page {
            PageRef::Package(id) => id,
            PageRef::Type(id) => self.graph.package_of(id),
            PageRef::ConstantValues => return Vec::new(),
        };
        self.graph
            .package(package)
            .name
            .split('.')
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// File name of the page inside its package directory.
    pub fn file_name(&self, page: PageRef) -> String {
        match page {
            PageRef::Package(_) => format!("{PACKAGE_INDEX_STEM}.{}", self.extension),
            PageRef::Type(id) => format!("{}.{}", self.type_file_stem(id), self.extension),
            PageRef::ConstantValues => format!("{CONSTANT_VALUES_STEM}.{}", self.extension),
        }
    }

    /// Output path relative to the destination root, `/`-separated.
    pub fn page_path(&self, page: PageRef) -> String {
        let mut path = String::new();
        for segment in self.segments(page) {
            path.push_str(segment);
            path.push('/');
        }
        path.push_str(&self.file_name(page));
        path
    }

    fn type_file_stem(&self, id: TypeId) -> String {
        let ty = self.graph.type_decl(id);
        match self.graph.enclosing_type(id) {
            Some(outer) => format!(
                "{}{NESTED_SEPARATOR}{}",
                self.type_file_stem(outer),
                ty.simple_name
            ),
            None => ty.simple_name.clone(),
        }
    }

    fn is_known(&self, page: PageRef) -> bool {
        match page {
            PageRef::Package(id) => self.graph.contains_package(id),
            PageRef::Type(id) => self.graph.contains(id),
            PageRef::ConstantValues => true,
        }
    }

    /// Relative path from `source` to `target`, or `None` when either is unknown.
    fn relative_link(&self, source: PageRef, target: PageRef) -> Option<String> {
        if source == target {
            return Some(self.file_name(target));
        }
        if !self.is_known(source) || !self.is_known(target) {
            return None;
        }

        let from = self.segments(source);
        let to = self.segments(target);
        let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

        let mut path = "../".repeat(from.len() - common);
        for segment in &to[common..] {
            path.push_str(segment);
            path.push('/');
        }
        path.push_str(&self.file_name(target));
        Some(path)
    }
}

/// Resolves links from any page to type pages.
#[derive(Clone, Copy, Debug)]
pub struct TypeLinkProvider<'a> {
    naming: PageNaming<'a>,
}

impl<'a> TypeLinkProvider<'a> {
    #[must_use]
    pub fn new(naming: PageNaming<'a>) -> Self {
        Self { naming }
    }

    /// Relative path to the type's page.
    ///
    /// Linking a page to itself yields its bare file name. `None` means the
    /// caller should fall back to plain text.
    pub fn relative_link(&self, source: PageRef, target: TypeId) -> Option<String> {
        self.naming.relative_link(source, PageRef::Type(target))
    }

    /// Like [`relative_link`](Self::relative_link), looking the target up by qualified name.
    pub fn relative_link_by_name(&self, source: PageRef, target: &str) -> Option<String> {
        let id = self.naming.graph().type_by_name(target)?;
        self.relative_link(source, id)
    }
}

/// Resolves links from any page to package index pages.
#[derive(Clone, Copy, Debug)]
pub struct PackageLinkProvider<'a> {
    naming: PageNaming<'a>,
}

impl<'a> PackageLinkProvider<'a> {
    #[must_use]
    pub fn new(naming: PageNaming<'a>) -> Self {
        Self { naming }
    }

    pub fn relative_link(&self, source: PageRef, target: PackageId) -> Option<String> {
        self.naming.relative_link(source, PageRef::Package(target))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::graph::tests::{class, nested, package};

    fn graph() -> DeclarationGraph {
        let mut excluded = class("a.b.d.Secret", None);
        excluded.included = false;
        let mut builder = DeclarationGraph::builder();
        for name in ["a", "a.b", "a.b.c", "a.b.d", "x"] {
            builder.add_package(package(name));
        }
        builder
            .add_type(class("a.b.c.C", None))
            .add_type(class("a.b.d.E", None))
            .add_type(nested("a.b.d.E", "Inner"))
            .add_type(class("x.Y", None))
            .add_type(excluded);
        builder.build().unwrap()
    }

    fn pages(graph: &DeclarationGraph) -> (PageRef, PageRef, PageRef) {
        let abc = PageRef::Package(graph.package_by_name("a.b.c").unwrap());
        let e = PageRef::Type(graph.type_by_name("a.b.d.E").unwrap());
        let inner = PageRef::Type(graph.type_by_name("a.b.d.E.Inner").unwrap());
        (abc, e, inner)
    }

    #[test]
    fn test_package_index_to_sibling_package_type() {
        let graph = graph();
        let naming = PageNaming::new(&graph, "md");
        let types = TypeLinkProvider::new(naming);
        let packages = PackageLinkProvider::new(naming);
        let (abc, e, _) = pages(&graph);
        let PageRef::Type(e_id) = e else { unreachable!() };
        let PageRef::Package(abc_id) = abc else { unreachable!() };

        assert_eq!(types.relative_link(abc, e_id), Some("../d/E.md".to_owned()));
        assert_eq!(
            packages.relative_link(e, abc_id),
            Some("../c/index.md".to_owned())
        );
    }

    #[test]
    fn test_self_link_is_bare_file_name() {
        let graph = graph();
        let naming = PageNaming::new(&graph, "md");
        let (abc, e, inner) = pages(&graph);
        let PageRef::Package(abc_id) = abc else { unreachable!() };

        assert_eq!(naming.relative_link(e, e), Some("E.md".to_owned()));
        assert_eq!(naming.relative_link(inner, inner), Some("E$Inner.md".to_owned()));
        assert_eq!(
            PackageLinkProvider::new(naming).relative_link(abc, abc_id),
            Some("index.md".to_owned())
        );
    }

    #[test]
    fn test_nested_type_file_name() {
        let graph = graph();
        let naming = PageNaming::new(&graph, "md");
        let (_, e, inner) = pages(&graph);

        assert_eq!(naming.relative_link(e, inner), Some("E$Inner.md".to_owned()));
        assert_eq!(naming.page_path(inner), "a/b/d/E$Inner.md");
    }

    #[test]
    fn test_unknown_endpoint_is_unlinkable() {
        let graph = graph();
        let naming = PageNaming::new(&graph, "md");
        let types = TypeLinkProvider::new(naming);
        let (abc, e, _) = pages(&graph);
        let secret = graph.type_by_name("a.b.d.Secret").unwrap();

        assert_eq!(types.relative_link(abc, secret), None);
        assert_eq!(naming.relative_link(PageRef::Type(secret), e), None);
        assert_eq!(types.relative_link_by_name(abc, "java.lang.String"), None);
    }

    #[test]
    fn test_up_count_matches_unshared_depth() {
        let graph = graph();
        let naming = PageNaming::new(&graph, "html");
        let (_, e, _) = pages(&graph);
        let y = PageRef::Type(graph.type_by_name("x.Y").unwrap());

        let forward = naming.relative_link(e, y).unwrap();
        assert_eq!(forward, "../../../x/Y.html");
        assert_eq!(forward.matches("../").count(), 3);
        assert_eq!(naming.relative_link(y, e), Some("../a/b/d/E.html".to_owned()));
    }

    #[test]
    fn test_page_paths() {
        let graph = graph();
        let naming = PageNaming::new(&graph, "md");
        let (abc, e, _) = pages(&graph);

        assert_eq!(naming.page_path(abc), "a/b/c/index.md");
        assert_eq!(naming.page_path(e), "a/b/d/E.md");
    }

    #[test]
    fn test_constant_values_page_sits_at_root() {
        let graph = graph();
        let naming = PageNaming::new(&graph, "md");
        let (abc, e, _) = pages(&graph);
        let PageRef::Type(e_id) = e else { unreachable!() };

        assert_eq!(naming.page_path(PageRef::ConstantValues), "constant-values.md");
        assert_eq!(
            TypeLinkProvider::new(naming).relative_link(PageRef::ConstantValues, e_id),
            Some("a/b/d/E.md".to_owned())
        );
        assert_eq!(
            naming.relative_link(abc, PageRef::ConstantValues),
            Some("../../../constant-values.md".to_owned())
        );
    }
}
