//! Anchored sections.

use std::fmt;

use crate::{Content, Node, escape_html};

/// Content wrapped in `<section id="...">` so it can be linked to.
///
/// Always opens and closes on its own line, whatever the cursor state of
/// its neighbours.
pub struct Section {
    anchor: String,
    body: Box<Content>,
}

impl Section {
    pub fn new(anchor: impl Into<String>, body: impl Into<Content>) -> Self {
        Self {
            anchor: anchor.into(),
            body: Box::new(body.into()),
        }
    }

    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    pub(crate) fn body_mut(&mut self) -> &mut Content {
        &mut self.body
    }
}

impl Node for Section {
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
        if !at_line_start {
            out.write_str(newline)?;
        }
        write!(
            out,
            "<section id=\"{}\">{newline}{newline}",
            escape_html(&self.anchor)
        )?;
        if !self.body.write(out, newline, true)? {
            out.write_str(newline)?;
        }
        write!(out, "{newline}</section>{newline}{newline}")?;
        Ok(true)
    }
}
