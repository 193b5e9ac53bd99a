//! Inline documentation markup.
//!
//! Doc comments arrive as a flat list of [`DocNode`]s. Before rendering, the
//! element structure is normalized: a dangling `<p>` is closed when the next
//! block element starts, elements still open at the end are closed, and a
//! close tag that does not match the innermost open element is an error.

use std::fmt::Write;

use apidoc_content::escape_html;
use apidoc_model::{DocNode, PageRef, simple_name_of};

use crate::links::LinkBuilder;
use crate::member::reference_anchor;

/// Elements that start a new block and implicitly end a paragraph.
const BLOCK_ELEMENTS: &[&str] = &[
    "p",
    "ul",
    "ol",
    "dl",
    "pre",
    "table",
    "div",
    "blockquote",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "hr",
];

/// Elements without content or closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "wbr"];

/// Markup structure error.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    /// A close tag does not match the innermost open element.
    #[error("</{close}> does not close the open <{open}> element")]
    Mismatch { open: String, close: String },
    /// A close tag with no open element at all.
    #[error("</{close}> has no matching open element")]
    UnexpectedClose { close: String },
}

fn is_block(name: &str) -> bool {
    BLOCK_ELEMENTS.iter().any(|b| b.eq_ignore_ascii_case(name))
}

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

fn end_element(name: String) -> DocNode {
    DocNode::EndElement { name }
}

/// Balance the element structure of `nodes`.
///
/// Element names are lowercased. Void elements are never pushed, and stray
/// close tags for them are dropped.
pub fn normalize(nodes: &[DocNode]) -> Result<Vec<DocNode>, MarkupError> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut open: Vec<String> = Vec::new();

    for node in nodes {
        match node {
            DocNode::StartElement { name } => {
                let name = name.to_ascii_lowercase();
                if is_block(&name) && open.last().is_some_and(|top| top == "p") {
                    open.pop();
                    out.push(end_element("p".to_owned()));
                }
                if !is_void(&name) {
                    open.push(name.clone());
                }
                out.push(DocNode::StartElement { name });
            }
            DocNode::EndElement { name } => {
                let name = name.to_ascii_lowercase();
                if is_void(&name) {
                    continue;
                }
                // A paragraph left open inside the closing element ends with it.
                if name != "p"
                    && open.last().is_some_and(|top| top == "p")
                    && open.len() >= 2
                    && open[open.len() - 2] == name
                {
                    open.pop();
                    out.push(end_element("p".to_owned()));
                }
                match open.last() {
                    Some(top) if *top == name => {
                        open.pop();
                        out.push(end_element(name));
                    }
                    Some(top) => {
                        return Err(MarkupError::Mismatch {
                            open: top.clone(),
                            close: name,
                        });
                    }
                    None => return Err(MarkupError::UnexpectedClose { close: name }),
                }
            }
            other => out.push(other.clone()),
        }
    }

    while let Some(name) = open.pop() {
        out.push(end_element(name));
    }
    Ok(out)
}

/// Leading sentence of a comment body, used in summary tables.
///
/// Stops after the first `.` followed by whitespace, before a block element
/// that follows some content, or at the first block tag. Paragraph tags are
/// dropped since the result is shown inline.
pub fn first_sentence(nodes: &[DocNode]) -> Vec<DocNode> {
    let mut out = Vec::new();
    for node in nodes {
        match node {
            DocNode::Text { text } => {
                if let Some(end) = sentence_end(text) {
                    out.push(DocNode::text(&text[..end]));
                    break;
                }
                out.push(node.clone());
            }
            DocNode::StartElement { name } | DocNode::EndElement { name }
                if name.eq_ignore_ascii_case("p") =>
            {
                if matches!(node, DocNode::StartElement { .. }) && has_content(&out) {
                    break;
                }
            }
            DocNode::StartElement { name } if is_block(name) && has_content(&out) => break,
            DocNode::BlockTag { .. } => break,
            _ => out.push(node.clone()),
        }
    }
    out
}

fn sentence_end(text: &str) -> Option<usize> {
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '.' && chars.peek().is_some_and(|(_, next)| next.is_whitespace()) {
            return Some(i + 1);
        }
    }
    None
}

fn has_content(nodes: &[DocNode]) -> bool {
    nodes.iter().any(|node| match node {
        DocNode::Text { text } => !text.trim().is_empty(),
        DocNode::StartElement { .. } | DocNode::EndElement { .. } | DocNode::Comment { .. } => {
            false
        }
        _ => true,
    })
}

/// Comment body without its block tags.
pub fn body(nodes: &[DocNode]) -> Vec<DocNode> {
    nodes
        .iter()
        .filter(|node| !matches!(node, DocNode::BlockTag { .. }))
        .cloned()
        .collect()
}

/// A block tag of a comment.
#[derive(Clone, Copy, Debug)]
pub struct BlockTag<'n> {
    pub name: &'n str,
    pub param: Option<&'n str>,
    pub body: &'n [DocNode],
}

/// Block tags of a comment, in source order.
pub fn block_tags(nodes: &[DocNode]) -> impl Iterator<Item = BlockTag<'_>> {
    nodes.iter().filter_map(|node| match node {
        DocNode::BlockTag { name, param, body } => Some(BlockTag {
            name,
            param: param.as_deref(),
            body,
        }),
        _ => None,
    })
}

/// Renders markup as inline Markdown/HTML text.
#[derive(Clone, Copy, Debug)]
pub struct MarkupRenderer<'a> {
    links: LinkBuilder<'a>,
}

impl<'a> MarkupRenderer<'a> {
    pub fn new(links: LinkBuilder<'a>) -> Self {
        Self { links }
    }

    /// Normalize and render `nodes`, trimming surrounding whitespace.
    pub fn render(&self, nodes: &[DocNode]) -> Result<String, MarkupError> {
        let nodes = normalize(nodes)?;
        let mut out = String::new();
        for node in &nodes {
            self.write_node(node, &mut out);
        }
        Ok(out.trim().to_owned())
    }

    /// Rendered first sentence of a comment body.
    pub fn summary(&self, nodes: &[DocNode]) -> Result<String, MarkupError> {
        self.render(&first_sentence(nodes))
    }

    fn write_node(&self, node: &DocNode, out: &mut String) {
        match node {
            DocNode::Text { text } => out.push_str(text),
            DocNode::StartElement { name } => {
                let _ = write!(out, "<{name}>");
            }
            DocNode::EndElement { name } => {
                let _ = write!(out, "</{name}>");
            }
            DocNode::Entity { name } => {
                let _ = write!(out, "&{name};");
            }
            DocNode::Code { text } => push_code(text, out),
            DocNode::Literal { text } => out.push_str(&escape_html(text)),
            DocNode::Link {
                target,
                member,
                label,
                plain,
            } => self.write_link(target, member.as_deref(), label, *plain, out),
            DocNode::Comment { .. } | DocNode::BlockTag { .. } => {}
        }
    }

    fn write_link(
        &self,
        target: &str,
        member: Option<&str>,
        label: &[DocNode],
        plain: bool,
        out: &mut String,
    ) {
        let graph = self.links.graph();
        let owner = if target.is_empty() {
            match self.links.source() {
                PageRef::Type(id) => Some(id),
                _ => None,
            }
        } else {
            graph.type_by_name(target)
        };

        let text = if label.is_empty() {
            let default = match (target.is_empty(), member) {
                (true, Some(member)) => member.to_owned(),
                (false, Some(member)) => format!("{}.{member}", simple_name_of(target)),
                (_, None) => simple_name_of(target).to_owned(),
            };
            if plain {
                default
            } else {
                code(&default)
            }
        } else {
            let mut text = String::new();
            for node in label {
                self.write_node(node, &mut text);
            }
            text.trim().to_owned()
        };

        let link = match (owner, member) {
            (Some(owner), Some(member)) => {
                let anchor = reference_anchor(graph.type_decl(owner), member);
                self.links.member(owner, &anchor, &text)
            }
            (Some(_), None) => self.links.named(target, text),
            (None, _) => match graph.package_by_name(target) {
                Some(package) => self.package_link(package, text),
                None => text,
            },
        };
        out.push_str(&link);
    }

    fn package_link(&self, package: apidoc_model::PackageId, text: String) -> String {
        let linked = self.links.package(package, true);
        let name = &self.links.graph().package(package).name;
        // Swap the qualified name for the requested label, keeping the target.
        match linked.strip_prefix(&format!("[{name}]")) {
            Some(rest) => format!("[{text}]{rest}"),
            None => text,
        }
    }
}

fn code(text: &str) -> String {
    let mut out = String::new();
    push_code(text, &mut out);
    out
}

/// Inline code span, using a longer fence when the text holds backticks.
fn push_code(text: &str, out: &mut String) {
    if text.contains('`') {
        let _ = write!(out, "`` {text} ``");
    } else {
        let _ = write!(out, "`{text}`");
    }
}
