//! CLI error types.

use dossier_config::ConfigError;
use dossier_model::GraphError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{}: {source}", path.display())]
    Read {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Graph(#[from] GraphError),

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("{failed} of {total} outputs failed")]
    Render { failed: usize, total: usize },
}
