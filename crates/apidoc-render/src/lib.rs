//! Page rendering for apidoc.
//!
//! Turns a frozen [`DeclarationGraph`](apidoc_model::DeclarationGraph) into
//! Markdown pages: one index page per package, one page per type and a
//! run-wide constant values page.
//!
//! # Architecture
//!
//! Rendering is layered bottom-up:
//!
//! - [`DisplayNameBuilder`] and [`AnnotationRenderer`] produce the text of
//!   type references and annotation occurrences.
//! - [`LinkBuilder`] wraps that text in relative links to other pages.
//! - [`MarkupRenderer`] normalizes and renders doc comment markup.
//! - The page modules assemble an [`apidoc_content::Content`] tree per page,
//!   with members laid out by one [`MemberStrategy`] per member kind.
//! - [`Generator`] renders every page in parallel with rayon.
//!
//! Nothing here touches the file system; the caller writes the returned
//! [`RenderedPage`]s.

mod annotation;
mod display;
mod generator;
mod links;
mod markup;
mod member;
mod page;

use apidoc_content::TableStyle;

pub use annotation::AnnotationRenderer;
pub use display::{DisplayMode, DisplayNameBuilder};
pub use generator::{GenerateResult, Generator, RenderedPage};
pub use links::{LinkBuilder, declared_type};
pub use markup::{BlockTag, MarkupError, MarkupRenderer, block_tags, first_sentence, normalize};
pub use member::{Column, MemberFacts, MemberStrategy, MemberTab, STRATEGIES, reference_anchor};
pub use page::{PageError, PageErrorKind};

/// Settings shared by every page of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Page file extension, without the dot.
    pub extension: String,
    /// Line separator written in place of `\n`.
    pub newline: String,
    pub table_style: TableStyle,
    /// Leave doc comment descriptions out of the pages.
    pub no_comment: bool,
    /// Show the superclass chain at the top of class pages.
    pub show_hierarchy: bool,
    /// Generate the constant values page.
    pub constants_page: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            extension: "md".to_owned(),
            newline: "\n".to_owned(),
            table_style: TableStyle::Html,
            no_comment: false,
            show_hierarchy: true,
            constants_page: true,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use apidoc_model::{DeclarationGraph, ExternalAnnotation, Snapshot, TypeRef};

    /// Graph with one package and the given external annotation facts.
    pub(crate) fn graph_with(annotations: &[ExternalAnnotation]) -> DeclarationGraph {
        let snapshot = Snapshot {
            packages: Vec::new(),
            types: Vec::new(),
            annotation_types: annotations.to_vec(),
        };
        DeclarationGraph::from_snapshot(snapshot, "java.lang.Object").unwrap()
    }

    pub(crate) fn variable(name: &str, bounds: Vec<TypeRef>) -> TypeRef {
        TypeRef::Variable {
            name: name.to_owned(),
            bounds,
            annotations: Vec::new(),
        }
    }

    /// Packages `a`, `a.b`, `a.b.c` and `a.b.d`, with the generic class
    /// `a.b.d.E<T>` and the documented annotation type `a.b.d.Marker`.
    pub(crate) fn sample_graph() -> DeclarationGraph {
        graph_from_json(SAMPLE)
    }

    pub(crate) fn graph_from_json(json: &str) -> DeclarationGraph {
        let snapshot = Snapshot::from_json(json).unwrap();
        DeclarationGraph::from_snapshot(snapshot, "java.lang.Object").unwrap()
    }

    const SAMPLE: &str = r#"{
        "packages": [
            {"name": "a"},
            {"name": "a.b"},
            {"name": "a.b.c"},
            {"name": "a.b.d"}
        ],
        "types": [
            {
                "qualified_name": "a.b.d.E",
                "simple_name": "E",
                "kind": "class",
                "enclosing": {"package": "a.b.d"},
                "type_params": [{"name": "T"}],
                "modifiers": ["public"]
            },
            {
                "qualified_name": "a.b.d.Marker",
                "simple_name": "Marker",
                "kind": "annotation",
                "enclosing": {"package": "a.b.d"},
                "modifiers": ["public"],
                "documented": true
            }
        ]
    }"#;
}
