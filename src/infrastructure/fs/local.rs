//! Local File System Tree
//!
//! Implements the ResourceTree port over a directory on disk.

use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::domain::ports::resource_tree::{ResourceTree, TreeError, TreeResult};
use crate::domain::value_objects::ResourcePath;

/// Directory-backed resource tree
///
/// Writes go through a temp file in the target directory followed by a
/// rename, so readers never see half-written content.
#[derive(Debug, Clone)]
pub struct LocalTree {
    root: PathBuf,
}

impl LocalTree {
    /// Create a tree rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root
    }

    /// On-disk location of `path`
    pub fn fs_path(&self, path: &ResourcePath) -> PathBuf {
        if path.is_root() {
            self.root.clone()
        } else {
            self.root.join(path.relative())
        }
    }

    /// Map an on-disk path back into the tree; `None` if it lies outside the root
    pub fn resource_path(&self, fs_path: &Path) -> Option<ResourcePath> {
        let relative = fs_path.strip_prefix(&self.root).ok()?;
        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(name) => segments.push(name.to_str()?.to_string()),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(ResourcePath::parse(&segments.join("/")))
    }

    fn atomic_write(&self, target: &Path, content: &[u8]) -> std::io::Result<()> {
        let parent = target.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent)?;
        let mut temp = tempfile::NamedTempFile::new_in(parent)?;
        temp.write_all(content)?;
        temp.as_file().sync_all()?;
        temp.persist(target).map_err(|e| e.error)?;
        Ok(())
    }
}

impl ResourceTree for LocalTree {
    fn read(&self, path: &ResourcePath) -> TreeResult<Vec<u8>> {
        let target = self.fs_path(path);
        if target.is_dir() {
            return Err(TreeError::NotAFile(path.clone()));
        }
        fs::read(&target).map_err(|e| TreeError::io(path, e))
    }

    fn write(&self, path: &ResourcePath, content: &[u8]) -> TreeResult<()> {
        let target = self.fs_path(path);
        if path.is_root() || target.is_dir() {
            return Err(TreeError::NotAFile(path.clone()));
        }
        self.atomic_write(&target, content)
            .map_err(|e| TreeError::io(path, e))
    }

    fn delete(&self, path: &ResourcePath) -> TreeResult<()> {
        let target = self.fs_path(path);
        let result = match fs::symlink_metadata(&target) {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(&target),
            Ok(_) => fs::remove_file(&target),
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TreeError::io(path, e)),
        }
    }

    fn exists(&self, path: &ResourcePath) -> bool {
        self.fs_path(path).exists()
    }

    fn is_dir(&self, path: &ResourcePath) -> bool {
        self.fs_path(path).is_dir()
    }

    fn children(&self, path: &ResourcePath) -> TreeResult<Vec<ResourcePath>> {
        let target = self.fs_path(path);
        if !target.is_dir() {
            return Ok(Vec::new());
        }
        let mut children = Vec::new();
        for entry in fs::read_dir(&target).map_err(|e| TreeError::io(path, e))? {
            let entry = entry.map_err(|e| TreeError::io(path, e))?;
            match entry.file_name().to_str() {
                Some(name) => children.push(path.join(name)),
                None => tracing::debug!(dir = %path, "skipping non UTF-8 file name"),
            }
        }
        children.sort();
        Ok(children)
    }

    fn last_modified(&self, path: &ResourcePath) -> TreeResult<DateTime<Utc>> {
        let modified = fs::metadata(self.fs_path(path))
            .and_then(|meta| meta.modified())
            .map_err(|e| TreeError::io(path, e))?;
        Ok(DateTime::<Utc>::from(modified))
    }
}
