//! Scoped removal of the container record directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Removes a directory tree when dropped.
///
/// Constructed at the start of bootstrap, before anything is created, so
/// that a failure partway through still cleans up whatever exists. The
/// guard lives in the scope wrapping bootstrap through supervision, which
/// makes it fire on every error return; it cannot fire when the process is
/// killed by an uncatchable signal, so the record may be left behind.
#[derive(Debug)]
pub struct RemoveOnExit {
    path: PathBuf,
}

impl RemoveOnExit {
    /// Registers `path` for removal at scope exit.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        tracing::debug!(path = %path.display(), "registered container directory for cleanup");
        Self { path }
    }

    /// The path that will be removed.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RemoveOnExit {
    fn drop(&mut self) {
        match fs::remove_dir_all(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "removed container directory");
            }
            // Bootstrap may fail before the directory exists.
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to remove container directory"
                );
            }
        }
    }
}
