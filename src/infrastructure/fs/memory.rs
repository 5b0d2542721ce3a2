//! In-memory resource tree
//!
//! Backs tests and unsaved editor buffers. Directories are implicit: a
//! directory exists while at least one file lives below it. Modification
//! times come from a per-tree clock that never repeats a value, so "written
//! after" is always observable.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};

use crate::domain::ports::resource_tree::{ResourceTree, TreeError, TreeResult};
use crate::domain::value_objects::ResourcePath;

#[derive(Debug, Clone)]
struct MemoryFile {
    content: Vec<u8>,
    modified: DateTime<Utc>,
}

#[derive(Debug)]
struct MemoryState {
    files: BTreeMap<ResourcePath, MemoryFile>,
    clock: DateTime<Utc>,
}

impl MemoryState {
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        self.clock = if now > self.clock {
            now
        } else {
            self.clock + Duration::microseconds(1)
        };
        self.clock
    }

    fn below<'a>(
        &'a self,
        dir: &'a ResourcePath,
    ) -> impl Iterator<Item = (&'a ResourcePath, &'a MemoryFile)> + 'a {
        self.files
            .iter()
            .filter(move |(path, _)| *path != dir && path.is_under(dir))
    }

    fn is_dir(&self, path: &ResourcePath) -> bool {
        path.is_root() || self.below(path).next().is_some()
    }
}

/// Resource tree held entirely in memory
#[derive(Debug)]
pub struct MemoryTree {
    state: Mutex<MemoryState>,
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTree {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                files: BTreeMap::new(),
                clock: Utc::now(),
            }),
        }
    }

    /// Tree pre-populated with `(path, content)` pairs
    pub fn with_files<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let tree = Self::new();
        {
            let mut state = tree.lock();
            for (path, content) in files {
                let modified = state.tick();
                state.files.insert(
                    ResourcePath::parse(path),
                    MemoryFile {
                        content: content.as_bytes().to_vec(),
                        modified,
                    },
                );
            }
        }
        tree
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResourceTree for MemoryTree {
    fn read(&self, path: &ResourcePath) -> TreeResult<Vec<u8>> {
        let state = self.lock();
        match state.files.get(path) {
            Some(file) => Ok(file.content.clone()),
            None if state.is_dir(path) => Err(TreeError::NotAFile(path.clone())),
            None => Err(TreeError::NotFound(path.clone())),
        }
    }

    fn write(&self, path: &ResourcePath, content: &[u8]) -> TreeResult<()> {
        let mut state = self.lock();
        if state.is_dir(path) {
            return Err(TreeError::NotAFile(path.clone()));
        }
        let mut ancestor = path.parent();
        while let Some(dir) = ancestor {
            if state.files.contains_key(&dir) {
                return Err(TreeError::NotAFile(dir));
            }
            ancestor = dir.parent();
        }
        let modified = state.tick();
        state.files.insert(
            path.clone(),
            MemoryFile {
                content: content.to_vec(),
                modified,
            },
        );
        Ok(())
    }

    fn delete(&self, path: &ResourcePath) -> TreeResult<()> {
        let mut state = self.lock();
        state.files.retain(|p, _| !p.is_under(path));
        Ok(())
    }

    fn exists(&self, path: &ResourcePath) -> bool {
        let state = self.lock();
        state.files.contains_key(path) || state.is_dir(path)
    }

    fn is_dir(&self, path: &ResourcePath) -> bool {
        self.lock().is_dir(path)
    }

    fn children(&self, path: &ResourcePath) -> TreeResult<Vec<ResourcePath>> {
        let state = self.lock();
        let children: BTreeSet<ResourcePath> = state
            .below(path)
            .filter_map(|(p, _)| {
                let rest = p.strip_prefix(path)?;
                let first = rest.split('/').next()?;
                Some(path.join(first))
            })
            .collect();
        Ok(children.into_iter().collect())
    }

    fn last_modified(&self, path: &ResourcePath) -> TreeResult<DateTime<Utc>> {
        let state = self.lock();
        if let Some(file) = state.files.get(path) {
            return Ok(file.modified);
        }
        if path.is_root() && state.files.is_empty() {
            return Ok(state.clock);
        }
        state
            .below(path)
            .map(|(_, f)| f.modified)
            .max()
            .ok_or_else(|| TreeError::NotFound(path.clone()))
    }
}
