//! Content tree for generated documentation pages.
//!
//! Pages are assembled from small nodes (text runs, sequences, fenced
//! containers, anchored sections, tables and tab groups) and written out in
//! one pass. Every node follows the same contract:
//!
//! ```text
//! write(sink, newline, at_line_start) -> ends_at_line_start
//! ```
//!
//! The returned flag tells the caller whether the cursor sits at the start of
//! a line, so block-level nodes can open on a fresh line without ever
//! emitting a doubled separator.
//!
//! # Example
//!
//! ```
//! use apidoc_content::{Container, ContainerKind, Content, Text, render};
//!
//! let note = Container::new(ContainerKind::Tip, Text::new("Use <T> wisely."));
//! let text = render(&Content::from(note), "\n");
//!
//! assert!(text.contains("::::: tip\nUse &lt;T&gt; wisely.\n:::::\n"));
//! ```

mod container;
mod section;
mod sequence;
mod table;
mod tabs;
mod text;

use std::fmt;

pub use container::{Container, ContainerKind};
pub use section::Section;
pub use sequence::{Sequence, Wrapper};
pub use table::{Table, TableStyle};
pub use tabs::{TabGroup, TabbedBlock};
pub use text::{Text, escape_html};

/// Content construction error.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// A row was added before the column headers were set.
    #[error("Table rows added before headers were set")]
    HeadersNotSet,
    /// A row's cell count differs from the header count.
    #[error("Table row has {found} cells but the table has {expected} columns")]
    RowArity { expected: usize, found: usize },
    /// A wrapper frame contains nowhere to append children.
    #[error("Wrapper frame has no accumulation target")]
    NoSlot,
}

/// A writable content node.
pub trait Node {
    /// Whether writing this node would produce no output.
    fn is_empty(&self) -> bool;

    /// Write the node, translating `\n` into `newline`.
    ///
    /// Returns whether the output now ends at the start of a line.
    fn write(&self, out: &mut dyn fmt::Write, newline: &str, at_line_start: bool)
    -> Result<bool, fmt::Error>;
}

/// Any content node.
pub enum Content {
    Text(Text),
    Sequence(Sequence),
    Container(Container),
    Wrapper(Wrapper),
    Section(Section),
    Table(Table),
    Tabs(TabGroup),
    /// Nodes with caller-defined parameters, such as [`TabbedBlock`].
    Custom(Box<dyn Node>),
}

impl Content {
    /// Innermost sequence that children appended through a [`Wrapper`] land in.
    pub(crate) fn slot_mut(&mut self) -> Option<&mut Sequence> {
        match self {
            Self::Sequence(seq) => Some(seq),
            Self::Container(container) => container.body_mut().slot_mut(),
            Self::Section(section) => section.body_mut().slot_mut(),
            Self::Wrapper(wrapper) => wrapper.frame_mut().slot_mut(),
            Self::Tabs(group) => group.last_tab_mut(),
            Self::Text(_) | Self::Table(_) | Self::Custom(_) => None,
        }
    }

    fn as_node(&self) -> &dyn Node {
        match self {
            Self::Text(node) => node,
            Self::Sequence(node) => node,
            Self::Container(node) => node,
            Self::Wrapper(node) => node,
            Self::Section(node) => node,
            Self::Table(node) => node,
            Self::Tabs(node) => node,
            Self::Custom(node) => node.as_ref(),
        }
    }
}

impl Node for Content {
    fn is_empty(&self) -> bool {
        self.as_node().is_empty()
    }

    fn write(
        &self,
        out: &mut dyn fmt::Write,
        newline: &str,
        at_line_start: bool,
    ) -> Result<bool, fmt::Error> {
        self.as_node().write(out, newline, at_line_start)
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self, "\n"))
    }
}

macro_rules! content_from {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Content {
                fn from(node: $ty) -> Self {
                    Self::$variant(node)
                }
            }
        )*
    };
}

content_from! {
    Text => Text,
    Sequence => Sequence,
    Container => Container,
    Wrapper => Wrapper,
    Section => Section,
    Table => Table,
    Tabs => TabGroup,
}

impl<T: 'static> From<TabbedBlock<T>> for Content {
    fn from(block: TabbedBlock<T>) -> Self {
        Self::Custom(Box::new(block))
    }
}

/// Render a node into a fresh string, starting at a line boundary.
pub fn render(node: &dyn Node, newline: &str) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = node.write(&mut out, newline, true);
    out
}
