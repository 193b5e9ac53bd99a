//! Page assembly.
//!
//! Each page function builds a [`Content`] tree for one page. Blocks are
//! separated by blank lines through [`push_block`], which leaves empty
//! blocks out entirely so optional parts never produce stray spacing.

mod constants;
mod package;
mod types;

use apidoc_content::{
    Container, ContainerKind, Content, ContentError, Node, Sequence, Text, Wrapper,
};
use apidoc_model::{
    DeclarationGraph, Deprecation, DocNode, GraphError, Modifier, Modifiers, PageNaming, PageRef,
};

use crate::RenderOptions;
use crate::annotation::AnnotationRenderer;
use crate::links::LinkBuilder;
use crate::markup::{MarkupError, MarkupRenderer, body};

pub(crate) use constants::{constants_page, has_constants};
pub(crate) use package::package_page;
pub(crate) use types::type_page;

/// A page that could not be rendered.
#[derive(Debug, thiserror::Error)]
#[error("page {page}: {kind}")]
pub struct PageError {
    /// Qualified name of the package or type, or the page stem.
    pub page: String,
    pub kind: PageErrorKind,
}

#[derive(Debug, thiserror::Error)]
pub enum PageErrorKind {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Markup(#[from] MarkupError),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

const DEPRECATED: &str = "**Deprecated.**";
const DEPRECATED_FOR_REMOVAL: &str =
    "**Deprecated, for removal: This API element is subject to removal in a future version.**";

/// Renderers bound to one page.
pub(crate) struct PageContext<'a> {
    pub graph: &'a DeclarationGraph,
    pub options: &'a RenderOptions,
    pub links: LinkBuilder<'a>,
    pub markup: MarkupRenderer<'a>,
}

impl<'a> PageContext<'a> {
    pub fn new(naming: PageNaming<'a>, options: &'a RenderOptions, page: PageRef) -> Self {
        let links = LinkBuilder::new(naming, page);
        Self {
            graph: naming.graph(),
            options,
            links,
            markup: MarkupRenderer::new(links),
        }
    }

    /// Annotations as shown inside code blocks, one per line.
    pub fn code_annotations(&self) -> AnnotationRenderer<'a> {
        AnnotationRenderer::new(self.graph).with_line_break(true)
    }

    /// Full comment body, or nothing when comments are suppressed.
    pub fn description(&self, doc: &[DocNode]) -> Result<String, MarkupError> {
        if self.options.no_comment {
            return Ok(String::new());
        }
        self.markup.render(&body(doc))
    }

    /// First sentence of the comment, for summary tables.
    pub fn summary(&self, doc: &[DocNode]) -> Result<String, MarkupError> {
        if self.options.no_comment {
            return Ok(String::new());
        }
        self.markup.summary(doc)
    }

    /// Deprecation notice, `danger` when removal is planned.
    pub fn deprecation(
        &self,
        deprecated: Option<&Deprecation>,
    ) -> Result<Option<Container>, MarkupError> {
        let Some(deprecated) = deprecated else {
            return Ok(None);
        };
        let (kind, phrase) = if deprecated.for_removal {
            (ContainerKind::Danger, DEPRECATED_FOR_REMOVAL)
        } else {
            (ContainerKind::Warning, DEPRECATED)
        };
        let reason = self.markup.render(&deprecated.doc)?;
        let text = if reason.is_empty() {
            phrase.to_owned()
        } else {
            format!("{phrase} {reason}")
        };
        Ok(Some(Container::new(kind, Text::raw(text))))
    }
}

/// Append a block followed by a blank line, skipping empty blocks.
pub(crate) fn push_block(seq: &mut Sequence, block: impl Into<Content>) {
    let block = block.into();
    if !block.is_empty() {
        seq.push(block);
        seq.push(Text::raw("\n"));
    }
}

/// [`push_block`] for content appended through a wrapper.
pub(crate) fn add_block(wrapper: &mut Wrapper, block: impl Into<Content>) {
    let block = block.into();
    if !block.is_empty() {
        wrapper.add(block);
        wrapper.add(Text::raw("\n"));
    }
}

pub(crate) fn frontmatter(fields: &[(&str, &str)]) -> Text {
    let mut text = String::from("---\n");
    for (key, value) in fields {
        text.push_str(key);
        text.push_str(": ");
        text.push_str(value);
        text.push('\n');
    }
    text.push_str("---\n");
    Text::raw(text)
}

pub(crate) fn code_block(code: &str) -> Text {
    Text::raw(format!("```java\n{}\n```", code.trim_end()))
}

/// `**Label:**<br>` followed by the entries, or nothing when there are none.
pub(crate) fn labelled(label: &str, entries: &[String], separator: &str) -> Text {
    if entries.is_empty() {
        return Text::default();
    }
    Text::raw(format!("**{label}:**<br>\n{}", entries.join(separator)))
}

/// Modifier keywords shown in summaries, where `public` goes without saying.
pub(crate) fn shown_modifiers(modifiers: &Modifiers) -> String {
    modifiers
        .0
        .iter()
        .filter(|m| **m != Modifier::Public)
        .map(|m| m.keyword())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Join the non-empty parts with single spaces.
pub(crate) fn join_words<'s>(parts: impl IntoIterator<Item = &'s str>) -> String {
    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use apidoc_content::render;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_push_block_separates_with_blank_line() {
        let mut seq = Sequence::new();
        push_block(&mut seq, Text::raw("# Title"));
        push_block(&mut seq, Text::default());
        push_block(&mut seq, Text::raw("Body"));

        assert_eq!(render(&seq, "\n"), "# Title\n\nBody\n\n");
    }

    #[test]
    fn test_frontmatter() {
        assert_eq!(
            render(&frontmatter(&[("title", "E"), ("aside", "false")]), "\n"),
            "---\ntitle: E\naside: false\n---\n"
        );
    }

    #[test]
    fn test_labelled_skips_empty_lists() {
        assert!(labelled("Enclosing Class", &[], ", ").is_empty());
        assert_eq!(
            labelled("Since", &["1.0".to_owned()], ", ").as_str(),
            "**Since:**<br>\n1.0"
        );
    }

    #[test]
    fn test_shown_modifiers_drop_public() {
        let modifiers = Modifiers(vec![Modifier::Public, Modifier::Static, Modifier::Final]);

        assert_eq!(shown_modifiers(&modifiers), "static final");
        assert_eq!(join_words(["", "static", "int"]), "static int");
    }
}
