//! apidoc CLI - API documentation generator.
//!
//! Provides commands for:
//! - `build`: Render a declaration snapshot into Markdown pages

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::BuildArgs;
use output::Report;

/// apidoc - API documentation generator.
#[derive(Parser)]
#[command(name = "apidoc", version, about)]
struct Cli {
    /// Enable info-level logging (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a declaration snapshot into documentation pages.
    Build(BuildArgs),
}

fn main() {
    let cli = Cli::parse();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
    };

    if let Err(err) = result {
        Report::new().fatal(&err);
        std::process::exit(1);
    }
}
