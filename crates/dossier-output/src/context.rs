//! Payloads shared between the renderer, its listeners and the backends.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use dossier_hooks::{HookQueue, HookRegistry};
use dossier_model::ProjectGraph;
use dossier_router::{Document, NavigationElement, Router};

use crate::job::JobQueue;

/// Boxed `Send` future, used for async backend lifecycle methods and jobs.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Options handed to backend constructors.
#[derive(Clone, Debug, Default)]
pub struct OutputOptions {
    /// Stylesheet replacing the built-in one.
    pub custom_css: Option<PathBuf>,
}

/// Run-wide event, emitted as `beginRender` and `endRender`.
///
/// Jobs receive the same event behind an [`Arc`].
#[derive(Clone, Debug)]
pub struct RenderEvent {
    /// Output root of the target.
    pub output_path: PathBuf,
    /// Project being rendered.
    pub graph: Arc<ProjectGraph>,
    /// Documents in render order.
    pub documents: Vec<Document>,
    /// Navigation tree of the routed project, without CSS classes.
    pub navigation: Vec<NavigationElement>,
}

/// Per-page event, emitted as `beginPage` and `endPage`.
#[derive(Debug)]
pub struct PageEvent {
    /// Document being rendered. Headings collected during rendering are
    /// appended to it.
    pub document: Document,
    /// File the document is written to.
    pub filename: PathBuf,
    /// Rendered page, set before `endPage`. Listeners may rewrite it.
    pub contents: Option<String>,
    /// Insertion-point hooks that apply to this page only.
    ///
    /// `beginPage` listeners queue registrations here; they are merged into
    /// the insertion-point registry for the page and rolled back afterwards.
    pub hooks: HookQueue<HookContext, String>,
}

impl PageEvent {
    /// Create an event for a document about to be rendered.
    #[must_use]
    pub fn new(document: Document, filename: PathBuf) -> Self {
        Self {
            document,
            filename,
            contents: None,
            hooks: HookQueue::new(),
        }
    }
}

/// Payload of insertion-point hooks (`head.end`, `body.begin`, ...).
#[derive(Clone, Debug)]
pub struct HookContext {
    /// Document being rendered.
    pub document: Document,
    /// Project name.
    pub project: String,
    /// Relative URL from the page to the output root, e.g. `../`.
    pub root: String,
}

/// Run-wide context handed to backend setup and teardown.
#[derive(Clone, Debug)]
pub struct RunContext {
    output_path: PathBuf,
    pre_render: JobQueue,
    post_render: JobQueue,
}

impl RunContext {
    /// Create a context for one output target.
    #[must_use]
    pub fn new(output_path: impl Into<PathBuf>, pre_render: JobQueue, post_render: JobQueue) -> Self {
        Self {
            output_path: output_path.into(),
            pre_render,
            post_render,
        }
    }

    /// Output root of the target.
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Jobs run after routing, before the first page renders.
    #[must_use]
    pub fn pre_render_jobs(&self) -> &JobQueue {
        &self.pre_render
    }

    /// Jobs run after the last page is written and the backend torn down.
    #[must_use]
    pub fn post_render_jobs(&self) -> &JobQueue {
        &self.post_render
    }
}

/// Everything a backend sees while rendering one document.
///
/// The router's current document is already set to `page.document`.
pub struct PageContext<'a> {
    pub graph: &'a ProjectGraph,
    pub router: &'a mut dyn Router,
    pub page: &'a mut PageEvent,
    pub hooks: &'a HookRegistry<HookContext, String>,
}

impl PageContext<'_> {
    /// Payload for insertion-point hooks on this page.
    pub fn hook_context(&mut self) -> HookContext {
        HookContext {
            document: self.page.document.clone(),
            project: self.graph.name().to_owned(),
            root: self.router.relative_url("", false),
        }
    }

    /// Concatenated output of the listeners on an insertion point.
    pub fn insert(&self, channel: &str, context: &mut HookContext) -> String {
        self.hooks.render(channel, context)
    }
}
