//! Deferred async jobs run before and after page rendering.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::context::{BoxFuture, RenderEvent};

/// Error returned by a job.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Failed(String),
}

type JobFn = Box<dyn FnOnce(Arc<RenderEvent>) -> BoxFuture<'static, Result<(), JobError>> + Send>;

/// A queued job with a name for diagnostics.
pub struct Job {
    name: String,
    run: JobFn,
}

impl Job {
    /// Name given when the job was queued.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start the job.
    pub fn run(self, event: Arc<RenderEvent>) -> BoxFuture<'static, Result<(), JobError>> {
        (self.run)(event)
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Shared handle to a list of pending jobs.
///
/// Clones refer to the same list, so a backend can queue work on the handle
/// it received in its run context and the renderer drains it later.
#[derive(Clone, Default)]
pub struct JobQueue {
    jobs: Arc<Mutex<Vec<Job>>>,
}

impl JobQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a job.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn push<F, Fut>(&self, name: impl Into<String>, job: F)
    where
        F: FnOnce(Arc<RenderEvent>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), JobError>> + Send + 'static,
    {
        let run: JobFn = Box::new(
            move |event: Arc<RenderEvent>| -> BoxFuture<'static, Result<(), JobError>> {
                Box::pin(job(event))
            },
        );
        self.jobs.lock().unwrap().push(Job {
            name: name.into(),
            run,
        });
    }

    /// Remove and return every queued job, leaving the queue empty.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn take(&self) -> Vec<Job> {
        std::mem::take(&mut *self.jobs.lock().unwrap())
    }

    /// Number of queued jobs.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    /// Whether no job is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every queued job without running it.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn clear(&self) {
        self.jobs.lock().unwrap().clear();
    }
}

impl fmt::Debug for JobQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobQueue").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_model::GraphBuilder;

    fn event() -> Arc<RenderEvent> {
        Arc::new(RenderEvent {
            output_path: PathBuf::from("out"),
            graph: Arc::new(GraphBuilder::new("demo").build()),
            documents: Vec::new(),
            navigation: Vec::new(),
        })
    }

    #[test]
    fn test_clones_share_jobs() {
        let queue = JobQueue::new();
        let handle = queue.clone();
        handle.push("noop", |_| async { Ok(()) });

        assert_eq!(queue.len(), 1);
        let jobs = queue.take();
        assert_eq!(jobs[0].name(), "noop");
        assert!(handle.is_empty());
    }

    #[test]
    fn test_clear_drops_jobs() {
        let queue = JobQueue::new();
        queue.push("a", |_| async { Ok(()) });
        queue.push("b", |_| async { Ok(()) });
        queue.clear();
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_job_receives_event() {
        let queue = JobQueue::new();
        queue.push("check", |event: Arc<RenderEvent>| async move {
            if event.output_path == PathBuf::from("out") {
                Ok(())
            } else {
                Err(JobError::Failed("wrong path".to_owned()))
            }
        });

        for job in queue.take() {
            job.run(event()).await.unwrap();
        }
    }
}
