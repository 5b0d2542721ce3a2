//! Cross-process workspace lock
//!
//! Only one engine may own a workspace's internal subtree at a time. The
//! lock is an exclusive advisory lock on `<internal>/.lock`, released when
//! the guard is dropped.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{EngineError, EngineResult};

/// Lock file name inside the internal directory
pub const LOCK_FILE: &str = ".lock";

/// Held for as long as the engine runs
#[derive(Debug)]
pub struct WorkspaceLock {
    file: File,
    path: PathBuf,
}

impl WorkspaceLock {
    /// Take the lock for the internal directory `internal_dir`, failing fast
    /// with [`EngineError::Locked`] when another process holds it.
    pub fn acquire(internal_dir: &Path) -> EngineResult<Self> {
        fs::create_dir_all(internal_dir)?;
        let path = internal_dir.join(LOCK_FILE);
        let file = File::create(&path)?;
        if file.try_lock_exclusive().is_err() {
            return Err(EngineError::Locked {
                path: path.display().to_string(),
            });
        }
        tracing::debug!(path = %path.display(), "workspace lock acquired");
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WorkspaceLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), error = %e, "could not release workspace lock");
        }
    }
}
