//! Per-target run outcome.

use std::fmt;
use std::path::PathBuf;

use dossier_output::OutputError;
use dossier_router::RouterError;

use crate::writer::WriteError;

/// Error that aborted a target or failed a single document.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("{0}")]
    Output(#[from] OutputError),

    #[error("{0}")]
    Router(#[from] RouterError),

    #[error("{0}")]
    Write(#[from] WriteError),
}

/// Lifecycle of one output target run.
///
/// `Idle → BackendReady → Routed → DirectoryPrepared → Rendering → Finalized`,
/// then back to `Idle` once the backend and router are released.
/// `DirectoryPrepared` is skipped for single-document outputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Idle,
    BackendReady,
    Routed,
    DirectoryPrepared,
    Rendering,
    Finalized,
}

impl RunState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::BackendReady => "backend-ready",
            Self::Routed => "routed",
            Self::DirectoryPrepared => "directory-prepared",
            Self::Rendering => "rendering",
            Self::Finalized => "finalized",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document that could not be rendered or written.
#[derive(Debug)]
pub struct DocumentFailure {
    /// Document path relative to the output root.
    pub path: String,
    pub error: RenderError,
}

/// Outcome of one output target.
#[derive(Debug)]
pub struct RenderReport {
    /// Backend name as configured.
    pub backend: String,
    pub output_path: PathBuf,
    /// Last state reached before resources were released.
    pub state: RunState,
    /// Files written, in render order.
    pub documents_written: Vec<PathBuf>,
    pub failures: Vec<DocumentFailure>,
    /// Number of pre- and post-render jobs that failed.
    pub job_failures: usize,
    /// Error that aborted the target, if any.
    pub error: Option<RenderError>,
}

impl RenderReport {
    pub(crate) fn new(backend: &str, output_path: PathBuf) -> Self {
        Self {
            backend: backend.to_owned(),
            output_path,
            state: RunState::Idle,
            documents_written: Vec::new(),
            failures: Vec::new(),
            job_failures: 0,
            error: None,
        }
    }

    /// Whether the target completed with every document and job succeeding.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.failures.is_empty() && self.job_failures == 0
    }
}
