//! CLI error types.

use std::path::PathBuf;

use apidoc_config::ConfigError;
use apidoc_model::GraphError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read snapshot {path}: {source}")]
    ReadSnapshot {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("{0}")]
    Graph(#[from] GraphError),

    #[error("{0} page(s) failed to render")]
    PagesFailed(usize),
}
