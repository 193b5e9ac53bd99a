//! Parallel page generation.
//!
//! The graph is read-only by the time pages are rendered, so every page is
//! rendered independently on the rayon thread pool. A page that fails does
//! not stop the others; failures are collected next to the successes.

use apidoc_content::render;
use apidoc_model::{DeclarationGraph, PageNaming, PageRef};
use rayon::prelude::*;

use crate::RenderOptions;
use crate::page::{
    PageContext, PageError, PageErrorKind, constants_page, has_constants, package_page, type_page,
};

/// Page identity of the constant values page in errors.
const CONSTANT_VALUES_PAGE: &str = "constant-values";

/// A rendered page ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub page: PageRef,
    /// Output path relative to the destination root, `/`-separated.
    pub path: String,
    pub text: String,
}

/// Outcome of rendering every page of a run.
#[derive(Debug)]
pub struct GenerateResult {
    pub pages: Vec<RenderedPage>,
    pub errors: Vec<PageError>,
}

/// Renders the pages of one declaration graph.
#[derive(Debug)]
pub struct Generator<'a> {
    graph: &'a DeclarationGraph,
    options: &'a RenderOptions,
}

impl<'a> Generator<'a> {
    pub fn new(graph: &'a DeclarationGraph, options: &'a RenderOptions) -> Self {
        Self { graph, options }
    }

    fn naming(&self) -> PageNaming<'a> {
        PageNaming::new(self.graph, &self.options.extension)
    }

    /// Every page of the run: packages, then types, then the constant values
    /// page when enabled and non-empty.
    pub fn pages(&self) -> Vec<PageRef> {
        let mut pages: Vec<PageRef> = self
            .graph
            .packages()
            .map(PageRef::Package)
            .chain(self.graph.types().map(PageRef::Type))
            .collect();
        if self.options.constants_page && has_constants(self.graph) {
            pages.push(PageRef::ConstantValues);
        }
        pages
    }

    /// Render a single page.
    pub fn render(&self, page: PageRef) -> Result<RenderedPage, PageError> {
        let naming = self.naming();
        let ctx = PageContext::new(naming, self.options, page);
        let content = match page {
            PageRef::Package(id) => package_page(&ctx, id).map(Some),
            PageRef::Type(id) => type_page(&ctx, id).map(Some),
            PageRef::ConstantValues => constants_page(&ctx),
        };
        let content = content.map_err(|kind| self.page_error(page, kind))?;

        let text = content
            .map(|content| render(&content, &self.options.newline))
            .unwrap_or_default();
        Ok(RenderedPage {
            page,
            path: naming.page_path(page),
            text,
        })
    }

    /// Render every page in parallel, collecting both successes and failures.
    pub fn generate(&self) -> GenerateResult {
        let pages = self.pages();
        tracing::debug!(pages = pages.len(), "Rendering pages");

        let results: Vec<Result<RenderedPage, PageError>> =
            pages.par_iter().map(|&page| self.render(page)).collect();

        partition_results(results)
    }

    fn page_error(&self, page: PageRef, kind: PageErrorKind) -> PageError {
        let page = match page {
            PageRef::Package(id) => self.graph.package(id).name.clone(),
            PageRef::Type(id) => self.graph.type_decl(id).qualified_name.clone(),
            PageRef::ConstantValues => CONSTANT_VALUES_PAGE.to_owned(),
        };
        PageError { page, kind }
    }
}

/// Partition results into successes and failures.
fn partition_results(results: Vec<Result<RenderedPage, PageError>>) -> GenerateResult {
    let mut pages = Vec::with_capacity(results.len());
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(page) => pages.push(page),
            Err(error) => errors.push(error),
        }
    }

    GenerateResult { pages, errors }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::markup::MarkupError;
    use crate::tests::graph_from_json;

    const JSON: &str = r#"{
        "packages": [{"name": "a.b"}, {"name": "a.b.c"}],
        "types": [
            {"qualified_name": "a.b.c.Good", "simple_name": "Good", "kind": "class",
             "enclosing": {"package": "a.b.c"},
             "members": [{"kind": "field", "name": "LIMIT", "modifiers": ["static", "final"],
                          "ty": {"kind": "primitive", "name": "int"}, "constant_value": "3"}]},
            {"qualified_name": "a.b.c.Bad", "simple_name": "Bad", "kind": "class",
             "enclosing": {"package": "a.b.c"},
             "doc": [
                {"kind": "text", "text": "Broken. "},
                {"kind": "start_element", "name": "b"},
                {"kind": "end_element", "name": "i"}
             ]}
        ]
    }"#;

    #[test]
    fn test_pages_cover_packages_types_and_constants() {
        let graph = graph_from_json(JSON);
        let options = RenderOptions::default();
        let generator = Generator::new(&graph, &options);
        let naming = PageNaming::new(&graph, "md");

        let paths: Vec<String> = generator
            .pages()
            .into_iter()
            .map(|page| naming.page_path(page))
            .collect();

        assert_eq!(
            paths,
            vec![
                "a/b/index.md",
                "a/b/c/index.md",
                "a/b/c/Bad.md",
                "a/b/c/Good.md",
                "constant-values.md",
            ]
        );
    }

    #[test]
    fn test_constants_page_can_be_disabled() {
        let graph = graph_from_json(JSON);
        let options = RenderOptions {
            constants_page: false,
            ..RenderOptions::default()
        };

        assert!(
            !Generator::new(&graph, &options)
                .pages()
                .contains(&PageRef::ConstantValues)
        );
    }

    #[test]
    fn test_failed_page_does_not_stop_others() {
        let graph = graph_from_json(JSON);
        let options = RenderOptions::default();

        let result = Generator::new(&graph, &options).generate();

        assert_eq!(result.pages.len(), 4);
        assert_eq!(result.errors.len(), 1);
        let error = &result.errors[0];
        assert_eq!(error.page, "a.b.c.Bad");
        assert!(matches!(
            &error.kind,
            PageErrorKind::Markup(MarkupError::Mismatch { open, close })
                if open == "b" && close == "i"
        ));
        assert_eq!(
            error.to_string(),
            "page a.b.c.Bad: </i> does not close the open <b> element"
        );
    }

    #[test]
    fn test_line_separator_applies_to_every_line() {
        let graph = graph_from_json(JSON);
        let options = RenderOptions {
            newline: "\r\n".to_owned(),
            ..RenderOptions::default()
        };
        let generator = Generator::new(&graph, &options);
        let id = graph.type_by_name("a.b.c.Good").unwrap();

        let page = generator.render(PageRef::Type(id)).unwrap();

        assert_eq!(page.path, "a/b/c/Good.md");
        assert!(page.text.starts_with("---\r\ntitle: Good\r\n"));
        assert!(!page.text.replace("\r\n", "").contains('\n'));
    }
}
