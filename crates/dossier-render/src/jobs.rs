//! Concurrent execution of queued jobs.

use std::sync::Arc;

use dossier_output::{JobQueue, RenderEvent};
use tokio::task::JoinSet;

/// Drain `queue` and run every job concurrently, waiting for all of them.
///
/// A failing or panicking job does not stop the others. Returns the number
/// of jobs that did not complete successfully.
pub(crate) async fn run_jobs(queue: &JobQueue, event: &Arc<RenderEvent>, phase: &'static str) -> usize {
    let jobs = queue.take();
    if jobs.is_empty() {
        return 0;
    }
    tracing::debug!(phase, count = jobs.len(), "Running jobs");

    let mut set = JoinSet::new();
    for job in jobs {
        let name = job.name().to_owned();
        let event = Arc::clone(event);
        set.spawn(async move { (name, job.run(event).await) });
    }

    let mut failed = 0;
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((name, Ok(()))) => tracing::debug!(phase, job = %name, "Job finished"),
            Ok((name, Err(e))) => {
                failed += 1;
                tracing::error!(phase, job = %name, error = %e, "Job failed");
            }
            Err(e) => {
                failed += 1;
                tracing::error!(phase, error = %e, "Job panicked");
            }
        }
    }
    failed
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_model::GraphBuilder;
    use dossier_output::JobError;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn event() -> Arc<RenderEvent> {
        Arc::new(RenderEvent {
            output_path: PathBuf::from("out"),
            graph: Arc::new(GraphBuilder::new("demo").build()),
            documents: Vec::new(),
            navigation: Vec::new(),
        })
    }

    #[tokio::test]
    async fn test_failing_job_does_not_stop_others() {
        let queue = JobQueue::new();
        let done = Arc::new(AtomicUsize::new(0));

        queue.push("fails", |_| async { Err(JobError::Failed("boom".to_owned())) });
        for name in ["a", "b"] {
            let done = Arc::clone(&done);
            queue.push(name, move |_| async move {
                done.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }

        let failed = run_jobs(&queue, &event(), "pre-render").await;
        assert_eq!(failed, 1);
        assert_eq!(done.load(Ordering::SeqCst), 2);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_panicking_job_is_counted() {
        let queue = JobQueue::new();
        queue.push("panics", |_| async { panic!("job panicked") });

        assert_eq!(run_jobs(&queue, &event(), "post-render").await, 1);
    }

    #[tokio::test]
    async fn test_empty_queue() {
        assert_eq!(run_jobs(&JobQueue::new(), &event(), "pre-render").await, 0);
    }
}
