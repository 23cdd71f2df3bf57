//! Output directory preparation and document writing.

use std::path::{Path, PathBuf};

/// Filesystem error while producing output.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("Failed to clean output directory {}: {source}", path.display())]
    Clean {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Make sure `path` exists as a directory, optionally emptying it first.
pub async fn prepare_output_dir(path: &Path, clean: bool) -> Result<(), WriteError> {
    if clean && tokio::fs::try_exists(path).await.unwrap_or(false) {
        tokio::fs::remove_dir_all(path)
            .await
            .map_err(|source| WriteError::Clean {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), "Cleaned output directory");
    }
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| WriteError::Create {
            path: path.to_path_buf(),
            source,
        })
}

/// Write `contents` to `path`, creating parent directories as needed.
pub async fn write_file(path: &Path, contents: &[u8]) -> Result<(), WriteError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| WriteError::Create {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| WriteError::Write {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prepare_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a/b");
        prepare_output_dir(&out, false).await.unwrap();
        assert!(out.is_dir());
    }

    #[tokio::test]
    async fn test_prepare_clean_removes_stale_files() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("stale.html");
        std::fs::write(&stale, "old").unwrap();

        prepare_output_dir(dir.path(), true).await.unwrap();
        assert!(dir.path().is_dir());
        assert!(!stale.exists());
    }

    #[tokio::test]
    async fn test_prepare_without_clean_keeps_files() {
        let dir = tempfile::tempdir().unwrap();
        let kept = dir.path().join("kept.html");
        std::fs::write(&kept, "old").unwrap();

        prepare_output_dir(dir.path(), false).await.unwrap();
        assert!(kept.exists());
    }

    #[tokio::test]
    async fn test_prepare_fails_on_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, "x").unwrap();

        let err = prepare_output_dir(&file.join("sub"), false).await.unwrap_err();
        assert!(matches!(err, WriteError::Create { .. }));
    }

    #[tokio::test]
    async fn test_write_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classes/Foo.html");
        write_file(&path, b"<html></html>").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html></html>");
    }

    #[tokio::test]
    async fn test_write_file_into_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_file(dir.path(), b"x").await.unwrap_err();
        assert!(matches!(err, WriteError::Write { .. }));
    }
}
