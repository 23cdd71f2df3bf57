//! `dossier watch` command implementation.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::commands::args::RenderArgs;
use crate::commands::build::run_build;
use crate::error::CliError;
use crate::output::Output;
use crate::project::watched_files;

/// Quiet period after the last event before a rebuild starts.
const DEBOUNCE: Duration = Duration::from_millis(200);

/// Arguments for the watch command.
#[derive(Args)]
pub(crate) struct WatchArgs {
    #[command(flatten)]
    pub render: RenderArgs,
}

impl WatchArgs {
    /// Build once, then rebuild on every change to the project files.
    ///
    /// Failed builds are reported and watching continues.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let config = self.render.load_config()?;
        let output = Output::new();

        if let Err(err) = run_build(&config, &output).await {
            output.error(&format!("Error: {err}"));
        }

        let files = watched_files(&config)
            .iter()
            .map(std::path::absolute)
            .collect::<Result<Vec<_>, _>>()?;

        let (tx, mut rx) = mpsc::channel::<Event>(100);
        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                // Callback runs on the watcher thread
                let _ = tx.blocking_send(event);
            }
        })?;
        // Watch parent directories so atomic saves (write + rename) are seen.
        for dir in parent_dirs(&files) {
            watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        }

        output.highlight("Watching for changes (Ctrl+C to stop)");
        while let Some(event) = rx.recv().await {
            if !is_relevant(&event, &files) {
                continue;
            }
            // Coalesce the burst of events a single save produces.
            while let Ok(Some(_)) = tokio::time::timeout(DEBOUNCE, rx.recv()).await {}

            output.info("Change detected, rebuilding");
            tracing::info!(paths = ?event.paths, "Rebuilding");
            if let Err(err) = run_build(&config, &output).await {
                output.error(&format!("Error: {err}"));
            }
        }
        Ok(())
    }
}

fn parent_dirs(files: &[PathBuf]) -> BTreeSet<PathBuf> {
    files
        .iter()
        .filter_map(|file| file.parent().map(Path::to_path_buf))
        .collect()
}

fn is_relevant(event: &Event, files: &[PathBuf]) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|path| files.contains(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};
    use pretty_assertions::assert_eq;

    fn files() -> Vec<PathBuf> {
        vec![
            PathBuf::from("/work/project.json"),
            PathBuf::from("/work/docs/README.md"),
        ]
    }

    #[test]
    fn test_modify_watched_file_is_relevant() {
        let event = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/work/project.json"));
        assert!(is_relevant(&event, &files()));
    }

    #[test]
    fn test_create_by_rename_is_relevant() {
        let event = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/work/docs/README.md"));
        assert!(is_relevant(&event, &files()));
    }

    #[test]
    fn test_other_file_is_ignored() {
        let event = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/work/notes.txt"));
        assert!(!is_relevant(&event, &files()));
    }

    #[test]
    fn test_access_is_ignored() {
        let event = Event::new(EventKind::Access(AccessKind::Any))
            .add_path(PathBuf::from("/work/project.json"));
        assert!(!is_relevant(&event, &files()));
    }

    #[test]
    fn test_parent_dirs_are_deduplicated() {
        let mut all = files();
        all.push(PathBuf::from("/work/theme.css"));
        let dirs: Vec<_> = parent_dirs(&all).into_iter().collect();
        assert_eq!(dirs, vec![PathBuf::from("/work"), PathBuf::from("/work/docs")]);
    }
}
