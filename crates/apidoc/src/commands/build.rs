//! `apidoc build` command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use apidoc_config::{CliSettings, Config, LineSeparator, TableStyle};
use apidoc_model::{DeclarationGraph, Snapshot};
use apidoc_render::{Generator, RenderOptions, RenderedPage};
use clap::{Args, ValueEnum};

use crate::error::CliError;
use crate::output::Report;

/// Table syntax accepted on the command line.
#[derive(Clone, Copy, ValueEnum)]
enum TableStyleArg {
    Html,
    Markdown,
}

impl From<TableStyleArg> for TableStyle {
    fn from(arg: TableStyleArg) -> Self {
        match arg {
            TableStyleArg::Html => Self::Html,
            TableStyleArg::Markdown => Self::Markdown,
        }
    }
}

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Declaration snapshot (JSON) to render.
    snapshot: PathBuf,

    /// Output directory for the generated pages (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Page file extension (overrides config).
    #[arg(long)]
    extension: Option<String>,

    /// Table syntax (overrides config).
    #[arg(long, value_enum)]
    table_style: Option<TableStyleArg>,

    /// Write CRLF line separators (overrides config).
    #[arg(long)]
    crlf: bool,

    /// Leave doc comment descriptions out of the pages.
    #[arg(long)]
    no_comment: bool,

    /// Keep existing files in the output directory.
    #[arg(long)]
    no_clean: bool,

    /// Path to configuration file (default: auto-discover apidoc.toml).
    #[arg(short, long, env = "APIDOC_CONFIG")]
    config: Option<PathBuf>,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let report = Report::new();

        let cli_settings = CliSettings {
            output_dir: self.output_dir.clone(),
            extension: self.extension.clone(),
            table_style: self.table_style.map(TableStyle::from),
            line_separator: self.crlf.then_some(LineSeparator::Crlf),
            clean: self.no_clean.then_some(false),
            no_comment: self.no_comment.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        report.start(&self.snapshot, &config.output.dir);

        let graph = load_graph(&self.snapshot, &config.model.root_type)?;
        let options = render_options(&config);
        let mut result = Generator::new(&graph, &options).generate();

        result.pages.sort_by(|a, b| a.path.cmp(&b.path));
        write_pages(&config.output.dir, &result.pages, config.output.clean)?;
        tracing::info!(
            pages = result.pages.len(),
            dir = %config.output.dir.display(),
            "Wrote pages"
        );

        result.errors.sort_by(|a, b| a.page.cmp(&b.page));
        for error in &result.errors {
            tracing::warn!(page = %error.page, error = %error.kind, "Failed to render page");
            report.page_failed(error);
        }
        report.finished(result.pages.len(), result.errors.len(), &config.output.dir);

        if result.errors.is_empty() {
            return Ok(());
        }
        Err(CliError::PagesFailed(result.errors.len()))
    }
}

/// Read a snapshot file and build the declaration graph from it.
fn load_graph(path: &Path, root_type: &str) -> Result<DeclarationGraph, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::ReadSnapshot {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot = Snapshot::from_json(&text)?;
    let graph = DeclarationGraph::from_snapshot(snapshot, root_type)?;
    tracing::info!(
        packages = graph.packages().count(),
        types = graph.types().count(),
        "Loaded declaration graph"
    );
    Ok(graph)
}

fn render_options(config: &Config) -> RenderOptions {
    RenderOptions {
        extension: config.output.extension.clone(),
        newline: config.output.line_separator.as_str().to_owned(),
        table_style: match config.output.table_style {
            TableStyle::Html => apidoc_content::TableStyle::Html,
            TableStyle::Markdown => apidoc_content::TableStyle::Markdown,
        },
        no_comment: config.render.no_comment,
        show_hierarchy: config.render.show_hierarchy,
        constants_page: config.render.constants_page,
    }
}

/// Write rendered pages below `dest`, creating directories as needed.
fn write_pages(dest: &Path, pages: &[RenderedPage], clean: bool) -> std::io::Result<()> {
    if clean && dest.exists() {
        fs::remove_dir_all(dest)?;
    }
    fs::create_dir_all(dest)?;

    for page in pages {
        let path = page
            .path
            .split('/')
            .fold(dest.to_path_buf(), |path, segment| path.join(segment));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &page.text)?;
        tracing::debug!(path = %path.display(), "Wrote page");
    }
    Ok(())
}
