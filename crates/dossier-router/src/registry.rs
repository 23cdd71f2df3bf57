//! Named router strategies.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::router::{
    KindDirRouter, KindRouter, Router, RouterOptions, StrategyRouter, StructureDirRouter,
    StructureRouter,
};
use crate::strategy::PathScheme;

/// Name of the strategy used when none is configured.
pub const DEFAULT_ROUTER: &str = "kind";

/// Error creating a router.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("Unknown router '{name}', available: {}", available.join(", "))]
    UnknownRouter { name: String, available: Vec<String> },
}

type Factory = fn(&Path, &RouterOptions) -> Box<dyn Router>;

/// Strategy names mapped to router constructors.
///
/// Only [`with_defaults`](Self::with_defaults) and explicit
/// [`register`](Self::register) calls add entries.
#[derive(Clone, Default)]
pub struct RouterRegistry {
    factories: BTreeMap<String, Factory>,
}

impl RouterRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in strategies: `kind`, `kind-dir`,
    /// `structure` and `structure-dir`.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_scheme::<KindRouter>();
        registry.register_scheme::<KindDirRouter>();
        registry.register_scheme::<StructureRouter>();
        registry.register_scheme::<StructureDirRouter>();
        registry
    }

    /// Register a router constructor under `name`, replacing any previous one.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: fn(&Path, &RouterOptions) -> Box<dyn Router>,
    ) {
        self.factories.insert(name.into(), factory);
    }

    fn register_scheme<R: SchemeRouter>(&mut self) {
        self.register(R::NAME, R::boxed);
    }

    /// Create a fresh router for one run.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::UnknownRouter`] if no strategy is registered
    /// under `name`.
    pub fn create(
        &self,
        name: &str,
        base_path: impl Into<PathBuf>,
        options: &RouterOptions,
    ) -> Result<Box<dyn Router>, RouterError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| RouterError::UnknownRouter {
                name: name.to_owned(),
                available: self.names().map(str::to_owned).collect(),
            })?;
        Ok(factory(&base_path.into(), options))
    }

    /// Registered strategy names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Whether a strategy is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

impl std::fmt::Debug for RouterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterRegistry")
            .field("names", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

trait SchemeRouter {
    const NAME: &'static str;
    fn boxed(base_path: &Path, options: &RouterOptions) -> Box<dyn Router>;
}

impl<S: PathScheme> SchemeRouter for StrategyRouter<S> {
    const NAME: &'static str = S::NAME;

    fn boxed(base_path: &Path, options: &RouterOptions) -> Box<dyn Router> {
        Box::new(Self::new(base_path, options.clone()))
    }
}
