//! Ordered child lists and wrappers.

use std::fmt;

use crate::{Content, ContentError, Node};

/// Ordered block-level children.
///
/// A child that ends mid-line is followed by a line break, so every child
/// starts on a fresh line.
#[derive(Default)]
pub struct Sequence {
    children: Vec<Content>,
}

impl Sequence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, child: impl Into<Content>) -> &mut Self {
        self.children.push(child.into());
        self
    }

    #[must_use]
    pub fn with(mut self, child: impl Into<Content>) -> Self {
        self.children.push(child.into());
        self
    }
}

impl<C: Into<Content>> FromIterator<C> for Sequence {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Self {
            children: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl Node for Sequence {
    fn is_empty(&self) -> bool {
        self.children.iter().all(Content::is_empty)
    }

    fn write(
        &self,
        out: &mut dyn fmt::Write,
        newline: &str,
        mut at_line_start: bool,
    ) -> Result<bool, fmt::Error> {
        for child in self.children.iter().filter(|c| !c.is_empty()) {
            at_line_start = child.write(out, newline, at_line_start)?;
            if !at_line_start {
                out.write_str(newline)?;
                at_line_start = true;
            }
        }
        Ok(at_line_start)
    }
}

/// Content whose written form differs from where children are appended.
///
/// The frame (for example an anchored section around a tab group) is what
/// gets written; [`add`](Self::add) appends into the innermost sequence of
/// that frame.
pub struct Wrapper {
    frame: Box<Content>,
}

impl Wrapper {
    /// Wrap a frame that contains an accumulation target.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::NoSlot`] when the frame holds no sequence to
    /// append into.
    pub fn new(frame: impl Into<Content>) -> Result<Self, ContentError> {
        let mut frame = Box::new(frame.into());
        if frame.slot_mut().is_none() {
            return Err(ContentError::NoSlot);
        }
        Ok(Self { frame })
    }

    pub fn add(&mut self, child: impl Into<Content>) -> &mut Self {
        if let Some(slot) = self.frame.slot_mut() {
            slot.push(child);
        }
        self
    }

    pub(crate) fn frame_mut(&mut self) -> &mut Content {
        &mut self.frame
    }
}

impl Node for Wrapper {
    fn is_empty(&self) -> bool {
        self.frame.is_empty()
    }

    fn write(
        &self,
        out: &mut dyn fmt::Write,
        newline: &str,
        at_line_start: bool,
    ) -> Result<bool, fmt::Error> {
        self.frame.write(out, newline, at_line_start)
    }
}
