//! Fixed-width tables.

use std::fmt;

use crate::{Content, ContentError, Node, escape_html, render};

/// Output syntax for tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TableStyle {
    /// `<table>` markup; survives inside containers and tab groups.
    #[default]
    Html,
    /// Pipe tables.
    Markdown,
}

/// A table with a fixed set of column headers.
///
/// Each cell is rendered to text on output. Line breaks inside a cell become
/// `<br>` so every row stays on one line.
pub struct Table {
    style: TableStyle,
    headers: Option<Vec<String>>,
    caption: Option<String>,
    rows: Vec<Vec<Content>>,
}

impl Table {
    pub fn new(style: TableStyle) -> Self {
        Self {
            style,
            headers: None,
            caption: None,
            rows: Vec::new(),
        }
    }

    /// Set the column headers, fixing the column count.
    #[must_use]
    pub fn with_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = Some(headers.into_iter().map(Into::into).collect());
        self
    }

    /// Label written above the table.
    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Append a row.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::HeadersNotSet`] before headers are set and
    /// [`ContentError::RowArity`] when the cell count differs from the
    /// header count.
    pub fn add_row<I, C>(&mut self, cells: I) -> Result<&mut Self, ContentError>
    where
        I: IntoIterator<Item = C>,
        C: Into<Content>,
    {
        let row: Vec<Content> = cells.into_iter().map(Into::into).collect();
        check_arity(self.headers.as_deref(), row.len())?;
        self.rows.push(row);
        Ok(self)
    }
}

pub(crate) fn check_arity(headers: Option<&[String]>, found: usize) -> Result<(), ContentError> {
    let headers = headers.ok_or(ContentError::HeadersNotSet)?;
    if headers.len() != found {
        return Err(ContentError::RowArity {
            expected: headers.len(),
            found,
        });
    }
    Ok(())
}

impl Node for Table {
    fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn write(
        &self,
        out: &mut dyn fmt::Write,
        newline: &str,
        at_line_start: bool,
    ) -> Result<bool, fmt::Error> {
        let Some(headers) = &self.headers else {
            return Ok(at_line_start);
        };
        if self.rows.is_empty() {
            return Ok(at_line_start);
        }
        if !at_line_start {
            out.write_str(newline)?;
        }
        if let Some(caption) = &self.caption {
            write!(out, "**{}**{newline}{newline}", escape_html(caption))?;
        }
        let rows: Vec<&[Content]> = self.rows.iter().map(Vec::as_slice).collect();
        write_table(out, newline, self.style, headers, &rows)?;
        Ok(true)
    }
}

/// Write a header row plus body rows in the given style.
pub(crate) fn write_table(
    out: &mut dyn fmt::Write,
    newline: &str,
    style: TableStyle,
    headers: &[String],
    rows: &[&[Content]],
) -> fmt::Result {
    match style {
        TableStyle::Html => {
            write!(out, "<table>{newline}  <thead>{newline}    <tr>")?;
            for header in headers {
                write!(out, "<th>{}</th>", escape_html(header))?;
            }
            write!(out, "</tr>{newline}  </thead>{newline}  <tbody>{newline}")?;
            for row in rows {
                out.write_str("  <tr>")?;
                for cell in *row {
                    write!(out, "<td>{}</td>", cell_text(cell, style))?;
                }
                write!(out, "</tr>{newline}")?;
            }
            write!(out, "  </tbody>{newline}</table>{newline}")
        }
        TableStyle::Markdown => {
            out.write_str("|")?;
            for header in headers {
                write!(out, "{}|", header.replace('|', "\\|"))?;
            }
            write!(out, "{newline}|{}{newline}", "---|".repeat(headers.len()))?;
            for row in rows {
                out.write_str("|")?;
                for cell in *row {
                    write!(out, "{}|", cell_text(cell, style))?;
                }
                out.write_str(newline)?;
            }
            Ok(())
        }
    }
}

/// Single-line text of one cell.
fn cell_text(cell: &Content, style: TableStyle) -> String {
    let text = render(cell, "\n");
    let text = text.trim_end_matches('\n').replace('\n', "<br>");
    match style {
        TableStyle::Html => text,
        TableStyle::Markdown => text.replace('|', "\\|"),
    }
}
