//! Debounce and change-detection state

use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};

use crate::domain::value_objects::ResourcePath;

/// Default quiet period before pending changes are dispatched
pub const DEBOUNCE_MS: u64 = 100;

/// Collects raw change notifications until the tree has been quiet for the
/// debounce period
#[derive(Debug)]
pub struct WatcherState {
    pending_changes: BTreeSet<ResourcePath>,
    last_change: Option<Instant>,
    debounce: Duration,
}

impl Default for WatcherState {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEBOUNCE_MS))
    }
}

impl WatcherState {
    pub fn new(debounce: Duration) -> Self {
        Self {
            pending_changes: BTreeSet::new(),
            last_change: None,
            debounce,
        }
    }

    /// Add a change; restarts the quiet period
    pub fn add_change(&mut self, path: ResourcePath) {
        self.pending_changes.insert(path);
        self.last_change = Some(Instant::now());
    }

    /// True once the debounce period has passed with changes pending
    pub fn should_flush(&self) -> bool {
        match self.last_change {
            Some(last) => !self.pending_changes.is_empty() && last.elapsed() >= self.debounce,
            None => false,
        }
    }

    /// Take all pending changes in path order, resetting state
    pub fn take_changes(&mut self) -> Vec<ResourcePath> {
        self.last_change = None;
        std::mem::take(&mut self.pending_changes).into_iter().collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending_changes.is_empty()
    }
}

/// SHA-256 of `content`, hex encoded
pub fn compute_content_hash(content: &[u8]) -> String {
    format!("{:x}", Sha256::digest(content))
}

/// Last seen content hash per resource.
///
/// Editors often touch files without changing them; those events are dropped.
#[derive(Debug, Default)]
pub struct ContentHashes {
    hashes: HashMap<ResourcePath, String>,
}

impl ContentHashes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `content` for `path`; true if it differs from what was seen before
    pub fn update(&mut self, path: &ResourcePath, content: &[u8]) -> bool {
        let hash = compute_content_hash(content);
        match self.hashes.get(path) {
            Some(old) if *old == hash => false,
            _ => {
                self.hashes.insert(path.clone(), hash);
                true
            }
        }
    }

    /// Forget `path` and everything below it
    pub fn forget(&mut self, path: &ResourcePath) {
        self.hashes.retain(|p, _| !p.is_under(path));
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}
