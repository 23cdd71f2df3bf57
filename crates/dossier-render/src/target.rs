//! Output target description.

use std::path::PathBuf;

use dossier_router::{DEFAULT_ROUTER, ReadmeMode};

/// Run options shared by the phases of one target.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// Empty the output directory before writing.
    pub clean_output_dir: bool,
    /// Append `?cache=<run start>` to asset URLs.
    pub cache_bust: bool,
    pub readme: ReadmeMode,
    /// Routing strategy name.
    pub router: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            clean_output_dir: true,
            cache_bust: false,
            readme: ReadmeMode::Present,
            router: DEFAULT_ROUTER.to_owned(),
        }
    }
}

/// One backend writing to one path.
#[derive(Clone, Debug)]
pub struct OutputTarget {
    /// Backend name, looked up in the output registry.
    pub backend: String,
    /// Output directory, or file for single-document backends.
    pub path: PathBuf,
    pub options: RenderOptions,
}

impl OutputTarget {
    /// Target with default options.
    #[must_use]
    pub fn new(backend: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            backend: backend.into(),
            path: path.into(),
            options: RenderOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }
}
