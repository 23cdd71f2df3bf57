//! Output backend errors.

use std::path::PathBuf;

use dossier_model::EntityId;
use dossier_router::RouterError;

/// Error raised by an output backend or the backend registry.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// No backend registered under the requested name.
    #[error("Unknown output backend '{name}', available: {}", available.join(", "))]
    UnknownBackend {
        /// Requested name.
        name: String,
        /// Registered names, sorted.
        available: Vec<String>,
    },

    /// Custom stylesheet could not be read during setup.
    #[error("Failed to read stylesheet {}: {source}", path.display())]
    Stylesheet {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `render` was called before `setup` completed.
    #[error("Output backend '{0}' used before setup")]
    NotReady(&'static str),

    /// A document refers to an entity missing from the graph.
    #[error("Entity {0} is not part of the project")]
    MissingEntity(EntityId),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Router(#[from] RouterError),
}
