//! Named output backends.

use std::collections::BTreeMap;
use std::fmt;

use crate::backend::OutputBackend;
use crate::context::OutputOptions;
use crate::error::OutputError;
use crate::html::HtmlBackend;
use crate::json::JsonBackend;

type Factory = fn(&OutputOptions) -> Box<dyn OutputBackend>;

/// Backend names mapped to constructors.
///
/// Only [`with_defaults`](Self::with_defaults) and explicit
/// [`register`](Self::register) calls add entries.
#[derive(Clone, Default)]
pub struct OutputRegistry {
    factories: BTreeMap<String, Factory>,
}

impl OutputRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `html` and `json` backends.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("html", html);
        registry.register("json", json);
        registry
    }

    /// Register a backend constructor under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, factory: Factory) {
        self.factories.insert(name.into(), factory);
    }

    /// Construct a fresh backend.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::UnknownBackend`] if nothing is registered
    /// under `name`.
    pub fn create(
        &self,
        name: &str,
        options: &OutputOptions,
    ) -> Result<Box<dyn OutputBackend>, OutputError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| OutputError::UnknownBackend {
                name: name.to_owned(),
                available: self.names().map(str::to_owned).collect(),
            })?;
        Ok(factory(options))
    }

    /// Registered backend names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Whether a backend is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

fn html(options: &OutputOptions) -> Box<dyn OutputBackend> {
    Box::new(HtmlBackend::new(options.clone()))
}

fn json(_options: &OutputOptions) -> Box<dyn OutputBackend> {
    Box::new(JsonBackend)
}

impl fmt::Debug for OutputRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputRegistry")
            .field("names", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
