//! ResourceTree port - abstraction over the workspace storage tree
//!
//! Every backend (directory on disk, in-memory, editor buffers) implements
//! this trait identically. Paths are always [`ResourcePath`]s, which cannot
//! point outside the tree.
//!
//! Implementations:
//! - `LocalTree` - directory on disk, atomic writes
//! - `MemoryTree` - in-memory, for tests and unsaved editor buffers

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::value_objects::ResourcePath;

/// Result type for resource tree operations
pub type TreeResult<T> = Result<T, TreeError>;

/// Resource tree operation errors
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("resource not found: {0}")]
    NotFound(ResourcePath),

    #[error("resource is a directory, not a file: {0}")]
    NotAFile(ResourcePath),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: ResourcePath,
        #[source]
        source: std::io::Error,
    },
}

impl TreeError {
    /// Wrap an I/O error, mapping `NotFound` to [`TreeError::NotFound`]
    pub fn io(path: &ResourcePath, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => TreeError::NotFound(path.clone()),
            _ => TreeError::Io {
                path: path.clone(),
                source: err,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TreeError::NotFound(_))
    }
}

/// Hierarchical storage of named resources
pub trait ResourceTree: Send + Sync {
    /// Read a file's bytes
    fn read(&self, path: &ResourcePath) -> TreeResult<Vec<u8>>;

    /// Write a file, creating parent directories.
    ///
    /// Readers must never observe a partially written file.
    fn write(&self, path: &ResourcePath, content: &[u8]) -> TreeResult<()>;

    /// Delete a file or a whole subtree. Deleting a missing resource is not an error.
    fn delete(&self, path: &ResourcePath) -> TreeResult<()>;

    fn exists(&self, path: &ResourcePath) -> bool;

    fn is_dir(&self, path: &ResourcePath) -> bool;

    /// Direct children, sorted by path. Empty for files and missing paths.
    fn children(&self, path: &ResourcePath) -> TreeResult<Vec<ResourcePath>>;

    fn last_modified(&self, path: &ResourcePath) -> TreeResult<DateTime<Utc>>;

    /// Read a file as UTF-8 (lossy)
    fn read_to_string(&self, path: &ResourcePath) -> TreeResult<String> {
        let bytes = self.read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// All files below `root`, sorted
    fn walk(&self, root: &ResourcePath) -> TreeResult<Vec<ResourcePath>> {
        let mut files = Vec::new();
        if !self.is_dir(root) {
            if self.exists(root) {
                files.push(root.clone());
            }
            return Ok(files);
        }
        let mut pending = vec![root.clone()];
        while let Some(dir) = pending.pop() {
            for child in self.children(&dir)? {
                if self.is_dir(&child) {
                    pending.push(child);
                } else {
                    files.push(child);
                }
            }
        }
        files.sort();
        Ok(files)
    }
}
