//! Input path cache
//!
//! Remembers which resources each declared input glob matches, so "all
//! resources of type X" never needs a tree walk after startup. Layout under
//! the internal root:
//!
//! ```text
//! inputs/<glob path>/<extension>.paths
//! ```
//!
//! one resource path per line. Globs sharing a key share the file, which
//! then holds the union of their matches; reads filter by the asking glob.
//! A missing or corrupt file reads as an empty set.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::domain::ports::resource_tree::{ResourceTree, TreeResult};
use crate::domain::value_objects::{Glob, ResourcePath};
use crate::error::EngineResult;

const INPUTS_DIR: &str = "inputs";
const ANY_EXTENSION: &str = "any";

#[derive(Clone)]
pub struct InputPathCache {
    tree: Arc<dyn ResourceTree>,
    internal_root: ResourcePath,
    root: ResourcePath,
    /// cache file -> globs stored in it
    entries: BTreeMap<ResourcePath, Vec<Glob>>,
}

impl InputPathCache {
    pub fn new(
        tree: Arc<dyn ResourceTree>,
        internal_root: &ResourcePath,
        globs: impl IntoIterator<Item = Glob>,
    ) -> Self {
        let root = internal_root.join(INPUTS_DIR);
        let mut entries: BTreeMap<ResourcePath, Vec<Glob>> = BTreeMap::new();
        for glob in globs {
            let key = key_for(&root, &glob);
            let globs = entries.entry(key).or_default();
            if !globs.contains(&glob) {
                globs.push(glob);
            }
        }
        Self {
            tree,
            internal_root: internal_root.clone(),
            root,
            entries,
        }
    }

    /// Cache file holding the matches of `glob`
    pub fn key_for(&self, glob: &Glob) -> ResourcePath {
        key_for(&self.root, glob)
    }

    /// Walk the whole tree once and rewrite every cache file.
    ///
    /// Returns the number of tracked resources.
    pub fn rebuild(&self) -> EngineResult<usize> {
        let files = self.walk_workspace()?;
        let mut tracked = BTreeSet::new();
        for (key, globs) in &self.entries {
            let matching: BTreeSet<ResourcePath> = files
                .iter()
                .filter(|p| globs.iter().any(|g| g.matches(p)))
                .cloned()
                .collect();
            self.store(key, &matching)?;
            tracked.extend(matching);
        }
        tracing::debug!(tracked = tracked.len(), files = files.len(), "input path cache rebuilt");
        Ok(tracked.len())
    }

    /// Paths currently matching `glob`, sorted
    pub fn load(&self, glob: &Glob) -> Vec<ResourcePath> {
        self.read_entry(&self.key_for(glob))
            .into_iter()
            .filter(|p| glob.matches(p))
            .collect()
    }

    /// Every tracked path across all globs
    pub fn tracked(&self) -> BTreeSet<ResourcePath> {
        self.entries
            .iter()
            .flat_map(|(key, globs)| {
                self.read_entry(key)
                    .into_iter()
                    .filter(|p| globs.iter().any(|g| g.matches(p)))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Record `path` in every entry whose globs match it
    pub fn add(&self, path: &ResourcePath) -> EngineResult<()> {
        if path.is_under(&self.internal_root) {
            return Ok(());
        }
        for (key, globs) in &self.entries {
            if !globs.iter().any(|g| g.matches(path)) {
                continue;
            }
            let mut paths = self.read_entry(key);
            if paths.insert(path.clone()) {
                self.store(key, &paths)?;
            }
        }
        Ok(())
    }

    /// Forget `path` and anything tracked below it.
    ///
    /// Returns every path that was removed, sorted.
    pub fn remove(&self, path: &ResourcePath) -> EngineResult<Vec<ResourcePath>> {
        let mut removed = BTreeSet::new();
        for key in self.entries.keys() {
            let mut paths = self.read_entry(key);
            let before = paths.len();
            paths.retain(|p| {
                if p.is_under(path) {
                    removed.insert(p.clone());
                    false
                } else {
                    true
                }
            });
            if paths.len() != before {
                self.store(key, &paths)?;
            }
        }
        Ok(removed.into_iter().collect())
    }

    fn read_entry(&self, key: &ResourcePath) -> BTreeSet<ResourcePath> {
        let bytes = match self.tree.read(key) {
            Ok(bytes) => bytes,
            Err(e) if e.is_not_found() => return BTreeSet::new(),
            Err(e) => {
                tracing::warn!(cache = %key, error = %e, "unreadable input cache, treating as empty");
                return BTreeSet::new();
            }
        };
        let Ok(text) = String::from_utf8(bytes) else {
            tracing::warn!(cache = %key, "corrupt input cache, treating as empty");
            return BTreeSet::new();
        };
        text.lines()
            .map(str::trim)
            .filter(|line| line.starts_with('/'))
            .map(ResourcePath::parse)
            .collect()
    }

    fn store(&self, key: &ResourcePath, paths: &BTreeSet<ResourcePath>) -> TreeResult<()> {
        let mut content = String::new();
        for path in paths {
            content.push_str(path.as_str());
            content.push('\n');
        }
        self.tree.write(key, content.as_bytes())
    }

    /// All files in the workspace, skipping the internal subtree
    fn walk_workspace(&self) -> TreeResult<Vec<ResourcePath>> {
        let mut files = Vec::new();
        let mut pending = vec![ResourcePath::root()];
        while let Some(dir) = pending.pop() {
            for child in self.tree.children(&dir)? {
                if child.is_under(&self.internal_root) {
                    continue;
                }
                if self.tree.is_dir(&child) {
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

fn key_for(root: &ResourcePath, glob: &Glob) -> ResourcePath {
    let file = format!("{}.paths", glob.extension().unwrap_or(ANY_EXTENSION));
    root.join(glob.path()).join(&file)
}
