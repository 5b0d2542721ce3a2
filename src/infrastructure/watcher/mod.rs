//! File watching
//!
//! Turns raw `notify` events into debounced, de-duplicated workspace
//! notifications.

mod fs_watcher;
mod state;

pub use fs_watcher::WorkspaceWatcher;
pub use state::{compute_content_hash, ContentHashes, WatcherState, DEBOUNCE_MS};
