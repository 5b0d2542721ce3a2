//! `notify`-backed workspace watcher

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::application::Workspace;
use crate::domain::value_objects::ResourcePath;
use crate::error::{EngineError, EngineResult};
use crate::infrastructure::fs::LocalTree;

use super::state::{ContentHashes, WatcherState};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Feeds file system changes below a directory into a [`Workspace`].
///
/// Changes are debounced, mapped into the tree, filtered for unchanged
/// content and then reported through `Workspace::notify_changed` or
/// `Workspace::notify_deleted`. The internal subtree is never reported.
pub struct WorkspaceWatcher {
    workspace: Arc<Workspace>,
    roots: Vec<LocalTree>,
    debounce: Duration,
    hashes: ContentHashes,
}

impl WorkspaceWatcher {
    /// Watcher for the directory backing `workspace`
    pub fn new(workspace: Arc<Workspace>, root: &Path, debounce: Duration) -> Self {
        let mut roots = vec![LocalTree::new(root)];
        // notify may report canonical paths (e.g. /private/var on macOS)
        if let Ok(canonical) = root.canonicalize() {
            if canonical != root {
                roots.push(LocalTree::new(canonical));
            }
        }
        Self {
            workspace,
            roots,
            debounce,
            hashes: ContentHashes::new(),
        }
    }

    /// Map an event path into the tree; `None` outside the root or inside the internal subtree
    pub fn resource_path(&self, fs_path: &Path) -> Option<ResourcePath> {
        let path = self.roots.iter().find_map(|root| root.resource_path(fs_path))?;
        if path.is_root() || self.workspace.is_internal(&path) {
            return None;
        }
        Some(path)
    }

    /// Remember the current content of every artifact so the first events
    /// after start-up are not mistaken for edits
    pub fn prime(&mut self) -> EngineResult<usize> {
        let tree = self.workspace.tree().clone();
        for path in tree.walk(&ResourcePath::root())? {
            if self.workspace.definition_for(&path).is_none() {
                continue;
            }
            match tree.read(&path) {
                Ok(bytes) => {
                    self.hashes.update(&path, &bytes);
                }
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(self.hashes.len())
    }

    /// Report a batch of settled changes to the workspace
    pub fn dispatch(&mut self, changes: &[ResourcePath]) {
        let tree = self.workspace.tree().clone();
        for path in changes {
            if !tree.exists(path) {
                self.hashes.forget(path);
                tracing::debug!(path = %path, "resource removed");
                if let Err(e) = self.workspace.notify_deleted(path) {
                    tracing::warn!(path = %path, error = %e, "could not report deletion");
                }
                continue;
            }
            let files = if tree.is_dir(path) {
                match tree.walk(path) {
                    Ok(files) => files,
                    Err(e) => {
                        tracing::warn!(path = %path, error = %e, "could not scan directory");
                        continue;
                    }
                }
            } else {
                vec![path.clone()]
            };
            for file in files {
                if self.workspace.is_internal(&file) || self.workspace.definition_for(&file).is_none() {
                    continue;
                }
                match tree.read(&file) {
                    Ok(bytes) => {
                        if !self.hashes.update(&file, &bytes) {
                            tracing::trace!(path = %file, "content unchanged");
                            continue;
                        }
                        tracing::debug!(path = %file, "resource changed");
                        if let Err(e) = self.workspace.notify_changed(&file) {
                            tracing::warn!(path = %file, error = %e, "could not report change");
                        }
                    }
                    Err(e) if e.is_not_found() => {
                        self.hashes.forget(&file);
                        if let Err(e) = self.workspace.notify_deleted(&file) {
                            tracing::warn!(path = %file, error = %e, "could not report deletion");
                        }
                    }
                    Err(e) => tracing::warn!(path = %file, error = %e, "could not read changed resource"),
                }
            }
        }
    }

    /// Watch until `running` turns false (blocking)
    pub fn run(&mut self, running: Arc<AtomicBool>) -> EngineResult<()> {
        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    for path in event.paths {
                        let _ = tx.send(path);
                    }
                }
                Err(e) => tracing::warn!(error = %e, "file watcher error"),
            },
            Config::default(),
        )
        .map_err(|e| EngineError::Watcher(e.to_string()))?;

        let root = self.roots[0].root_dir().to_path_buf();
        watcher
            .watch(&root, RecursiveMode::Recursive)
            .map_err(|e| EngineError::Watcher(e.to_string()))?;

        let primed = self.prime()?;
        tracing::info!(root = %root.display(), primed, "watching workspace");

        let mut state = WatcherState::new(self.debounce);
        while running.load(Ordering::SeqCst) {
            self.collect(&rx, &mut state);
            if state.should_flush() {
                let changes = state.take_changes();
                self.dispatch(&changes);
            }
        }

        if state.has_pending() {
            let changes = state.take_changes();
            self.dispatch(&changes);
        }
        tracing::info!("watcher stopped");
        Ok(())
    }

    fn collect(&self, rx: &Receiver<PathBuf>, state: &mut WatcherState) {
        let Ok(first) = rx.recv_timeout(POLL_INTERVAL) else {
            return;
        };
        for fs_path in std::iter::once(first).chain(rx.try_iter()) {
            if let Some(path) = self.resource_path(&fs_path) {
                state.add_change(path);
            }
        }
    }
}
