//! Tab switchers.
//!
//! Two flavours share the `:::tabs` syntax:
//!
//! - [`TabGroup`] holds one free-form content sequence per named tab.
//! - [`TabbedBlock`] holds table rows tagged with an item and decides at
//!   write time which tabs to show, based on predicates over those items.

use std::fmt;

use crate::table::{check_arity, write_table};
use crate::{Content, ContentError, Node, Sequence, TableStyle, escape_html};

/// Named tabs of arbitrary content.
#[derive(Default)]
pub struct TabGroup {
    key: Option<String>,
    tabs: Vec<(String, Sequence)>,
}

impl TabGroup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Key shared by tab groups whose selection should stay in sync.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Append content to the named tab, creating the tab if needed.
    pub fn add_tab(&mut self, name: impl Into<String>, content: impl Into<Content>) -> &mut Self {
        let name = name.into();
        match self.tabs.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, seq)) => {
                seq.push(content);
            }
            None => self.tabs.push((name, Sequence::new().with(content))),
        }
        self
    }

    /// Sequence of the most recently created tab.
    pub(crate) fn last_tab_mut(&mut self) -> Option<&mut Sequence> {
        self.tabs.last_mut().map(|(_, seq)| seq)
    }
}

impl Node for TabGroup {
    fn is_empty(&self) -> bool {
        self.tabs.iter().all(|(_, seq)| seq.is_empty())
    }

    fn write(
        &self,
        out: &mut dyn fmt::Write,
        newline: &str,
        at_line_start: bool,
    ) -> Result<bool, fmt::Error> {
        if self.is_empty() {
            return Ok(at_line_start);
        }
        open_tabs(out, newline, at_line_start, self.key.as_deref())?;
        for (name, seq) in self.tabs.iter().filter(|(_, seq)| !seq.is_empty()) {
            write!(out, "== {name}{newline}")?;
            if !seq.write(out, newline, true)? {
                out.write_str(newline)?;
            }
        }
        write!(out, ":::{newline}")?;
        Ok(true)
    }
}

fn open_tabs(
    out: &mut dyn fmt::Write,
    newline: &str,
    at_line_start: bool,
    key: Option<&str>,
) -> fmt::Result {
    if !at_line_start {
        out.write_str(newline)?;
    }
    out.write_str(":::tabs")?;
    if let Some(key) = key {
        write!(out, " key:{key}")?;
    }
    out.write_str(newline)
}

struct Tab<T> {
    label: String,
    predicate: Box<dyn Fn(&T) -> bool>,
}

/// A table whose rows are split across predicate-selected tabs.
///
/// When more than one tab matches at least one row, each matching tab is
/// written as its own table inside a tab switcher, in declaration order.
/// Otherwise a single table is written: the rows of the one matching tab,
/// or every row under the default label.
pub struct TabbedBlock<T> {
    style: TableStyle,
    default_label: String,
    headers: Option<Vec<String>>,
    tabs: Vec<Tab<T>>,
    key: Option<String>,
    force_tabs: bool,
    rows: Vec<(T, Vec<Content>)>,
}

impl<T> TabbedBlock<T> {
    pub fn new(style: TableStyle, default_label: impl Into<String>) -> Self {
        Self {
            style,
            default_label: default_label.into(),
            headers: None,
            tabs: Vec::new(),
            key: None,
            force_tabs: false,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = Some(headers.into_iter().map(Into::into).collect());
        self
    }

    /// Declare a tab showing the rows whose item satisfies `predicate`.
    #[must_use]
    pub fn with_tab(
        mut self,
        label: impl Into<String>,
        predicate: impl Fn(&T) -> bool + 'static,
    ) -> Self {
        self.tabs.push(Tab {
            label: label.into(),
            predicate: Box::new(predicate),
        });
        self
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Always write a tab switcher, led by a default tab holding every row.
    #[must_use]
    pub fn force_tabs(mut self) -> Self {
        self.force_tabs = true;
        self
    }

    /// Append a row tagged with `item`.
    ///
    /// # Errors
    ///
    /// Same arity rules as [`Table::add_row`](crate::Table::add_row).
    pub fn add_row<I, C>(&mut self, item: T, cells: I) -> Result<&mut Self, ContentError>
    where
        I: IntoIterator<Item = C>,
        C: Into<Content>,
    {
        let row: Vec<Content> = cells.into_iter().map(Into::into).collect();
        check_arity(self.headers.as_deref(), row.len())?;
        self.rows.push((item, row));
        Ok(self)
    }

    /// Rows matched by each declared tab, dropping tabs that matched nothing.
    fn partition(&self) -> Vec<(&str, Vec<&[Content]>)> {
        self.tabs
            .iter()
            .map(|tab| {
                let rows: Vec<&[Content]> = self
                    .rows
                    .iter()
                    .filter(|(item, _)| (tab.predicate)(item))
                    .map(|(_, cells)| cells.as_slice())
                    .collect();
                (tab.label.as_str(), rows)
            })
            .filter(|(_, rows)| !rows.is_empty())
            .collect()
    }

    fn all_rows(&self) -> Vec<&[Content]> {
        self.rows.iter().map(|(_, cells)| cells.as_slice()).collect()
    }
}

impl<T> Node for TabbedBlock<T> {
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

        let mut matched = self.partition();
        if matched.len() > 1 || self.force_tabs {
            if self.force_tabs {
                matched.insert(0, (self.default_label.as_str(), self.all_rows()));
            }
            open_tabs(out, newline, at_line_start, self.key.as_deref())?;
            for (label, rows) in &matched {
                write!(out, "== {label}{newline}")?;
                write_table(out, newline, self.style, headers, rows)?;
            }
            write!(out, ":::{newline}")?;
            return Ok(true);
        }

        let (label, rows) = matched
            .pop()
            .unwrap_or_else(|| (self.default_label.as_str(), self.all_rows()));
        if !at_line_start {
            out.write_str(newline)?;
        }
        write!(out, "**{}**{newline}{newline}", escape_html(label))?;
        write_table(out, newline, self.style, headers, &rows)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{Text, render};

    #[derive(Clone, Copy)]
    struct Method {
        is_static: bool,
        is_abstract: bool,
    }

    const STATIC: Method = Method {
        is_static: true,
        is_abstract: false,
    };
    const INSTANCE: Method = Method {
        is_static: false,
        is_abstract: false,
    };

    fn method_block() -> TabbedBlock<Method> {
        TabbedBlock::new(TableStyle::Markdown, "All Methods")
            .with_headers(["Method"])
            .with_tab("Static Methods", |m: &Method| m.is_static)
            .with_tab("Instance Methods", |m: &Method| !m.is_static)
            .with_tab("Abstract Methods", |m: &Method| m.is_abstract)
            .with_key("methods")
    }

    #[test]
    fn test_only_matching_tabs_are_written() {
        let mut block = method_block();
        block.add_row(INSTANCE, [Text::new("run()")]).unwrap();
        block.add_row(STATIC, [Text::new("of()")]).unwrap();
        block.add_row(INSTANCE, [Text::new("stop()")]).unwrap();

        assert_eq!(
            render(&block, "\n"),
            ":::tabs key:methods\n\
             == Static Methods\n|Method|\n|---|\n|of()|\n\
             == Instance Methods\n|Method|\n|---|\n|run()|\n|stop()|\n\
             :::\n"
        );
    }

    #[test]
    fn test_single_matching_tab_is_plain_table() {
        let mut block = method_block();
        block.add_row(STATIC, [Text::new("of()")]).unwrap();

        assert_eq!(
            render(&block, "\n"),
            "**Static Methods**\n\n|Method|\n|---|\n|of()|\n"
        );
    }

    #[test]
    fn test_no_tabs_uses_default_label() {
        let mut block: TabbedBlock<()> =
            TabbedBlock::new(TableStyle::Markdown, "Fields").with_headers(["Field"]);
        block.add_row((), [Text::new("size")]).unwrap();

        assert_eq!(render(&block, "\n"), "**Fields**\n\n|Field|\n|---|\n|size|\n");
    }

    #[test]
    fn test_forced_tabs_lead_with_default() {
        let mut block = method_block().force_tabs();
        block.add_row(STATIC, [Text::new("of()")]).unwrap();

        let text = render(&block, "\n");
        let labels: Vec<&str> = text.lines().filter(|l| l.starts_with("== ")).collect();

        assert_eq!(labels, vec!["== All Methods", "== Static Methods"]);
    }

    #[test]
    fn test_tabbed_row_arity() {
        let mut block = method_block();
        let err = block
            .add_row(STATIC, [Text::new("of()"), Text::new("extra")])
            .err().unwrap();

        assert!(matches!(
            err,
            ContentError::RowArity {
                expected: 1,
                found: 2
            }
        ));
        assert!(block.is_empty());
    }

    #[test]
    fn test_tab_group_merges_same_name() {
        let mut group = TabGroup::new();
        group.add_tab("Java", Text::new("a"));
        group.add_tab("Kotlin", Text::new("b"));
        group.add_tab("Java", Text::new("c"));

        assert_eq!(
            render(&group, "\n"),
            ":::tabs\n== Java\na\nc\n== Kotlin\nb\n:::\n"
        );
    }

    #[test]
    fn test_tab_group_skips_empty_tabs() {
        let mut group = TabGroup::new().with_key("lang");
        group.add_tab("Empty", Sequence::new());
        assert!(group.is_empty());

        group.add_tab("Full", Text::new("x"));
        let mut out = String::from("before");
        let at_line_start = group.write(&mut out, "\n", false).unwrap();

        assert_eq!(out, "before\n:::tabs key:lang\n== Full\nx\n:::\n");
        assert!(at_line_start);
    }
}
