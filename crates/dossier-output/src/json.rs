//! JSON dump backend.
//!
//! Writes the whole project as one pretty-printed nested tree to the target
//! path itself.

use std::path::Path;

use dossier_router::{Router, RouterError, RouterOptions, SingleFileRouter};

use crate::backend::OutputBackend;
use crate::context::{BoxFuture, PageContext, RunContext};
use crate::error::OutputError;

/// Serializes the project graph to a single JSON file.
#[derive(Debug, Default)]
pub struct JsonBackend;

impl OutputBackend for JsonBackend {
    fn name(&self) -> &'static str {
        "json"
    }

    fn setup<'a>(&'a mut self, _context: &'a RunContext) -> BoxFuture<'a, Result<(), OutputError>> {
        Box::pin(async { Ok(()) })
    }

    fn teardown<'a>(
        &'a mut self,
        _context: &'a RunContext,
    ) -> BoxFuture<'a, Result<(), OutputError>> {
        Box::pin(async { Ok(()) })
    }

    fn build_router(
        &self,
        _router: &str,
        base_path: &Path,
        options: &RouterOptions,
    ) -> Result<Box<dyn Router>, RouterError> {
        Ok(Box::new(SingleFileRouter::new(base_path, options)))
    }

    fn render(&mut self, page: &mut PageContext<'_>) -> Result<String, OutputError> {
        Ok(serde_json::to_string_pretty(&page.graph.to_tree())?)
    }
}
