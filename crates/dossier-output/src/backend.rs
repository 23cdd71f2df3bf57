//! Output backend contract.

use std::path::Path;

use dossier_model::EntityKind;
use dossier_router::{Router, RouterError, RouterOptions};

use crate::context::{BoxFuture, PageContext, RunContext};
use crate::error::OutputError;

/// A format documents are rendered to.
///
/// A backend instance serves one run for one output target: the renderer
/// calls [`setup`](Self::setup), [`build_router`](Self::build_router), then
/// [`render`](Self::render) once per document and finally
/// [`teardown`](Self::teardown).
pub trait OutputBackend: Send {
    /// Registry name of the backend.
    fn name(&self) -> &'static str;

    /// Acquire resources for the run. May queue jobs on the context.
    fn setup<'a>(&'a mut self, context: &'a RunContext) -> BoxFuture<'a, Result<(), OutputError>>;

    /// Release resources acquired in [`setup`](Self::setup).
    fn teardown<'a>(&'a mut self, context: &'a RunContext)
    -> BoxFuture<'a, Result<(), OutputError>>;

    /// Create the router used for this run.
    ///
    /// `router` is the configured strategy name; backends with a fixed
    /// layout may ignore it.
    fn build_router(
        &self,
        router: &str,
        base_path: &Path,
        options: &RouterOptions,
    ) -> Result<Box<dyn Router>, RouterError>;

    /// Render one document to its final contents.
    fn render(&mut self, page: &mut PageContext<'_>) -> Result<String, OutputError>;

    /// Per-kind presentation classes, when the backend has any.
    fn styles(&self) -> Option<&dyn EntityStyles> {
        None
    }
}

/// Presentation classes for entity kinds.
pub trait EntityStyles: Send + Sync {
    /// CSS class list for entities of `kind`.
    fn class_for(&self, kind: EntityKind) -> Option<String>;
}
