//! Depth-fenced admonition blocks.
//!
//! A container does not know how deeply it is nested. Instead it renders its
//! body first, looks for depth markers left behind by containers inside it,
//! and picks a fence one level longer than the deepest one found. It then
//! leaves its own marker in front of the opening fence so an enclosing
//! container can do the same.
//!
//! ```text
//! <!-- apidoc-container depth: 2 -->
//! ::::::: info Details
//! <!-- apidoc-container depth: 1 -->
//! ::::: tip
//! Inner text
//! :::::
//! :::::::
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::{Content, Node};

static DEPTH_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!-- apidoc-container depth: (\d+) -->").unwrap());

/// Admonition kind written after the opening fence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Info,
    Tip,
    Warning,
    Danger,
    Details,
}

impl ContainerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Tip => "tip",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Details => "details",
        }
    }
}

/// A fenced block with a kind and optional header.
pub struct Container {
    kind: ContainerKind,
    header: Option<Box<Content>>,
    body: Box<Content>,
}

impl Container {
    pub fn new(kind: ContainerKind, body: impl Into<Content>) -> Self {
        Self {
            kind,
            header: None,
            body: Box::new(body.into()),
        }
    }

    #[must_use]
    pub fn with_header(mut self, header: impl Into<Content>) -> Self {
        self.header = Some(Box::new(header.into()));
        self
    }

    pub(crate) fn body_mut(&mut self) -> &mut Content {
        &mut self.body
    }
}

/// Nesting depth for a container whose rendered body is `body`.
fn depth_of(body: &str) -> usize {
    DEPTH_MARKER
        .captures_iter(body)
        .filter_map(|caps| caps[1].parse::<usize>().ok())
        .max()
        .map_or(1, |deepest| deepest + 1)
}

impl Node for Container {
    fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    fn write(
        &self,
        out: &mut dyn fmt::Write,
        newline: &str,
        at_line_start: bool,
    ) -> Result<bool, fmt::Error> {
        if self.body.is_empty() {
            return Ok(at_line_start);
        }

        let mut body = String::new();
        let body_ends_line = self.body.write(&mut body, newline, true)?;
        let depth = depth_of(&body);
        let fence = format!(":::{}", "::".repeat(depth));

        if !at_line_start {
            out.write_str(newline)?;
        }
        write!(out, "<!-- apidoc-container depth: {depth} -->{newline}")?;
        write!(out, "{fence} {}", self.kind.as_str())?;
        match &self.header {
            Some(header) if !header.is_empty() => {
                out.write_str(" ")?;
                if !header.write(out, newline, false)? {
                    out.write_str(newline)?;
                }
            }
            _ => out.write_str(newline)?,
        }

        out.write_str(&body)?;
        if !body_ends_line {
            out.write_str(newline)?;
        }
        write!(out, "{fence}{newline}")?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{Sequence, Text, render};

    fn fences(text: &str) -> Vec<usize> {
        text.lines()
            .filter(|line| line.starts_with(":::"))
            .map(|line| line.chars().take_while(|&c| c == ':').count())
            .collect()
    }

    #[test]
    fn test_single_container() {
        let container = Container::new(ContainerKind::Warning, Text::new("Careful."));

        assert_eq!(
            render(&container, "\n"),
            "<!-- apidoc-container depth: 1 -->\n::::: warning\nCareful.\n:::::\n"
        );
    }

    #[test]
    fn test_header_follows_kind() {
        let container = Container::new(ContainerKind::Info, Text::new("Body"))
            .with_header(Text::new("Method Details"));

        assert_eq!(
            render(&container, "\n"),
            "<!-- apidoc-container depth: 1 -->\n::::: info Method Details\nBody\n:::::\n"
        );
    }

    #[test]
    fn test_nested_depths_grow_outwards() {
        let inner = Container::new(ContainerKind::Tip, Text::new("deep"));
        let middle = Container::new(ContainerKind::Details, inner);
        let outer = Container::new(ContainerKind::Info, middle);

        let text = render(&outer, "\n");

        // Opening fences outermost first, then closing fences innermost first.
        assert_eq!(fences(&text), vec![9, 7, 5, 5, 7, 9]);
        assert!(text.starts_with("<!-- apidoc-container depth: 3 -->\n"));
    }

    #[test]
    fn test_depth_follows_deepest_child() {
        let shallow = Container::new(ContainerKind::Tip, Text::new("a"));
        let deep = Container::new(
            ContainerKind::Tip,
            Container::new(ContainerKind::Tip, Text::new("b")),
        );
        let outer = Container::new(
            ContainerKind::Info,
            Sequence::new().with(shallow).with(deep),
        );

        let text = render(&outer, "\n");

        assert_eq!(fences(&text)[0], 9);
    }

    #[test]
    fn test_empty_body_writes_nothing() {
        let container = Container::new(ContainerKind::Danger, Sequence::new());
        let mut out = String::new();

        assert!(container.is_empty());
        assert!(!container.write(&mut out, "\n", false).unwrap());
        assert_eq!(out, "");
    }

    #[test]
    fn test_crlf_line_separator() {
        let container = Container::new(ContainerKind::Tip, Text::new("x"));

        assert_eq!(
            render(&container, "\r\n"),
            "<!-- apidoc-container depth: 1 -->\r\n::::: tip\r\nx\r\n:::::\r\n"
        );
    }
}
