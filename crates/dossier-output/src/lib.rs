//! Output backends for Dossier.
//!
//! An [`OutputBackend`] turns routed documents into file contents. Backends
//! are created by name from an [`OutputRegistry`]; the built-in ones are
//! [`HtmlBackend`] (a static site with navigation and assets) and
//! [`JsonBackend`] (the whole project as one JSON file).
//!
//! Backends do not write files themselves. The renderer drives them through
//! setup, routing, per-page rendering and teardown, and writes what they
//! return. Side outputs such as stylesheets are produced by jobs queued on
//! the [`RunContext`].

mod backend;
mod context;
mod error;
mod html;
mod job;
mod json;
mod markup;
mod registry;

pub use backend::{EntityStyles, OutputBackend};
pub use context::{
    BoxFuture, HookContext, OutputOptions, PageContext, PageEvent, RenderEvent, RunContext,
};
pub use error::OutputError;
pub use html::{HtmlBackend, KindStyles, NAVIGATION_PATH, STYLESHEET_PATH};
pub use job::{Job, JobError, JobQueue};
pub use json::JsonBackend;
pub use markup::{CommonMarkRenderer, HeadingIds, MarkupRenderer, escape_html, slugify};
pub use registry::OutputRegistry;
