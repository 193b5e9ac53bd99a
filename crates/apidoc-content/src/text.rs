//! Literal text runs.

use std::borrow::Cow;
use std::fmt;

use crate::Node;

/// Literal text with `\n` as the internal line break.
///
/// Escaped runs replace `<`, `>` and `&` with character references when
/// written; raw runs are emitted as-is and are used for markup the renderer
/// produced itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Text {
    text: String,
    escape: bool,
}

impl Text {
    /// Text that is escaped on output.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            escape: true,
        }
    }

    /// Pre-formatted markup written verbatim.
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            escape: false,
        }
    }

    pub fn push_str(&mut self, text: &str) -> &mut Self {
        self.text.push_str(text);
        self
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Node for Text {
    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn write(
        &self,
        out: &mut dyn fmt::Write,
        newline: &str,
        at_line_start: bool,
    ) -> Result<bool, fmt::Error> {
        if self.text.is_empty() {
            return Ok(at_line_start);
        }
        let text = if self.escape {
            escape_html(&self.text)
        } else {
            Cow::Borrowed(self.text.as_str())
        };
        if newline == "\n" {
            out.write_str(&text)?;
        } else {
            out.write_str(&text.replace('\n', newline))?;
        }
        Ok(text.ends_with('\n'))
    }
}

/// Escape the three reserved markup characters.
///
/// Borrows the input unchanged when none of them occur.
pub fn escape_html(s: &str) -> Cow<'_, str> {
    let Some(first) = s.find(['<', '>', '&']) else {
        return Cow::Borrowed(s);
    };
    let mut result = String::with_capacity(s.len() + 8);
    result.push_str(&s[..first]);
    for c in s[first..].chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}
