//! Multi-phase render orchestration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use dossier_hooks::{HookRegistry, channel};
use dossier_model::ProjectGraph;
use dossier_output::{
    HookContext, JobQueue, OutputBackend, OutputOptions, OutputRegistry, PageContext, PageEvent,
    RenderEvent, RunContext,
};
use dossier_router::{Document, Router, RouterOptions};

use crate::jobs::run_jobs;
use crate::report::{DocumentFailure, RenderError, RenderReport, RunState};
use crate::target::OutputTarget;
use crate::writer::{prepare_output_dir, write_file};

/// Drives output backends through a run and writes their documents.
///
/// Hooks and job queues live on the renderer and apply to every target it
/// writes. Insertion-point hooks registered for a single page through
/// [`PageEvent::hooks`] are rolled back once that page is done.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use dossier_model::ProjectGraph;
/// use dossier_render::{OutputTarget, Renderer};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let graph = Arc::new(ProjectGraph::from_json(&std::fs::read_to_string("project.json")?)?);
/// let mut renderer = Renderer::default();
/// let report = renderer
///     .write_output(graph, &OutputTarget::new("html", "docs"))
///     .await;
/// assert!(report.is_success());
/// # Ok(())
/// # }
/// ```
pub struct Renderer {
    outputs: OutputRegistry,
    output_options: OutputOptions,
    render_hooks: HookRegistry<RenderEvent>,
    page_hooks: HookRegistry<PageEvent>,
    insertion_hooks: HookRegistry<HookContext, String>,
    pre_render: JobQueue,
    post_render: JobQueue,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(OutputRegistry::with_defaults())
    }
}

impl Renderer {
    #[must_use]
    pub fn new(outputs: OutputRegistry) -> Self {
        Self {
            outputs,
            output_options: OutputOptions::default(),
            render_hooks: HookRegistry::new(),
            page_hooks: HookRegistry::new(),
            insertion_hooks: HookRegistry::new(),
            pre_render: JobQueue::new(),
            post_render: JobQueue::new(),
        }
    }

    /// Options passed to every backend constructor.
    #[must_use]
    pub fn with_output_options(mut self, options: OutputOptions) -> Self {
        self.output_options = options;
        self
    }

    /// Registered backends.
    pub fn outputs(&self) -> &OutputRegistry {
        &self.outputs
    }

    /// `beginRender` / `endRender` listeners.
    pub fn render_hooks_mut(&mut self) -> &mut HookRegistry<RenderEvent> {
        &mut self.render_hooks
    }

    /// `beginPage` / `endPage` listeners.
    pub fn page_hooks_mut(&mut self) -> &mut HookRegistry<PageEvent> {
        &mut self.page_hooks
    }

    /// Insertion-point listeners (`head.end`, `body.begin`, ...).
    pub fn insertion_hooks_mut(&mut self) -> &mut HookRegistry<HookContext, String> {
        &mut self.insertion_hooks
    }

    /// Jobs run after routing, before the first page. Drained by each run.
    pub fn pre_render_jobs(&self) -> &JobQueue {
        &self.pre_render
    }

    /// Jobs run after teardown. Drained by each run.
    pub fn post_render_jobs(&self) -> &JobQueue {
        &self.post_render
    }

    /// Render every target in order. Targets are independent: a failing
    /// target does not stop the following ones.
    pub async fn write_outputs(
        &mut self,
        graph: Arc<ProjectGraph>,
        targets: &[OutputTarget],
    ) -> Vec<RenderReport> {
        let mut reports = Vec::with_capacity(targets.len());
        for target in targets {
            reports.push(self.write_output(Arc::clone(&graph), target).await);
        }
        reports
    }

    /// Render one target.
    ///
    /// Never fails: errors are logged and recorded in the returned report.
    pub async fn write_output(&mut self, graph: Arc<ProjectGraph>, target: &OutputTarget) -> RenderReport {
        let mut report = RenderReport::new(&target.backend, target.path.clone());

        let mut backend = match self.outputs.create(&target.backend, &self.output_options) {
            Ok(backend) => backend,
            Err(e) => {
                tracing::error!(
                    backend = %target.backend,
                    available = %self.outputs.names().collect::<Vec<_>>().join(", "),
                    "Unknown output backend"
                );
                report.error = Some(e.into());
                return report;
            }
        };

        let context = RunContext::new(&target.path, self.pre_render.clone(), self.post_render.clone());
        if let Err(e) = backend.setup(&context).await {
            tracing::error!(backend = %target.backend, error = %e, "Output backend setup failed");
            report.error = Some(e.into());
            self.abort(backend.as_mut(), &context).await;
            return report;
        }
        report.state = RunState::BackendReady;

        let router_options = RouterOptions {
            readme: target.options.readme,
            cache_bust: target.options.cache_bust,
            run_started_ms: run_started_ms(),
        };
        let mut router = match backend.build_router(&target.options.router, &target.path, &router_options) {
            Ok(router) => router,
            Err(e) => {
                tracing::error!(backend = %target.backend, error = %e, "Failed to create router");
                report.error = Some(e.into());
                self.abort(backend.as_mut(), &context).await;
                return report;
            }
        };
        let documents = router.build_documents(&graph);
        report.state = RunState::Routed;

        let mut event = RenderEvent {
            output_path: target.path.clone(),
            navigation: router.navigation(&graph).to_vec(),
            graph: Arc::clone(&graph),
            documents,
        };
        self.render_hooks.emit(channel::BEGIN_RENDER, &mut event);
        let mut event = Arc::new(event);

        report.job_failures += run_jobs(&self.pre_render, &event, "pre-render").await;

        if event.documents.len() > 1 {
            if let Err(e) = prepare_output_dir(&target.path, target.options.clean_output_dir).await {
                tracing::error!(path = %target.path.display(), error = %e, "Failed to prepare output directory");
                report.error = Some(e.into());
                self.abort(backend.as_mut(), &context).await;
                return report;
            }
            report.state = RunState::DirectoryPrepared;
        }

        report.state = RunState::Rendering;
        for document in &event.documents {
            match self
                .render_document(backend.as_mut(), router.as_mut(), &graph, document)
                .await
            {
                Ok(path) => report.documents_written.push(path),
                Err(error) => {
                    tracing::error!(path = %document.path, error = %error, "Failed to render document");
                    report.failures.push(DocumentFailure {
                        path: document.path.clone(),
                        error,
                    });
                }
            }
        }

        self.render_hooks
            .emit(channel::END_RENDER, Arc::make_mut(&mut event));

        if let Err(e) = backend.teardown(&context).await {
            tracing::error!(backend = %target.backend, error = %e, "Output backend teardown failed");
        }

        report.job_failures += run_jobs(&self.post_render, &event, "post-render").await;
        report.state = RunState::Finalized;

        drop(router);
        drop(backend);

        tracing::info!(
            backend = %target.backend,
            path = %target.path.display(),
            written = report.documents_written.len(),
            failed = report.failures.len(),
            "Output written"
        );
        report
    }

    async fn render_document(
        &mut self,
        backend: &mut dyn OutputBackend,
        router: &mut dyn Router,
        graph: &ProjectGraph,
        document: &Document,
    ) -> Result<PathBuf, RenderError> {
        router.set_current_document(document);
        let filename = router.output_path(document);
        let mut page = PageEvent::new(document.clone(), filename.clone());

        let snapshot = self.insertion_hooks.snapshot();
        self.page_hooks.emit(channel::BEGIN_PAGE, &mut page);
        self.insertion_hooks.extend(std::mem::take(&mut page.hooks));

        let rendered = backend.render(&mut PageContext {
            graph,
            router,
            page: &mut page,
            hooks: &self.insertion_hooks,
        });
        let finished = rendered.map(|contents| {
            page.contents = Some(contents);
            self.page_hooks.emit(channel::END_PAGE, &mut page);
        });
        self.insertion_hooks.restore(snapshot);
        finished?;

        let contents = page.contents.unwrap_or_default();
        write_file(&filename, contents.as_bytes()).await?;
        tracing::debug!(path = %filename.display(), "Wrote document");
        Ok(filename)
    }

    /// Release the backend of an aborted target and drop its pending jobs.
    async fn abort(&self, backend: &mut dyn OutputBackend, context: &RunContext) {
        if let Err(e) = backend.teardown(context).await {
            tracing::error!(backend = backend.name(), error = %e, "Output backend teardown failed");
        }
        self.pre_render.clear();
        self.post_render.clear();
    }
}

fn run_started_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
