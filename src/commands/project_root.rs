use std::path::{Path, PathBuf};

use blueprint::application::DEFAULT_INTERNAL_DIR;
use blueprint::config::PROJECT_CONFIG_FILE;

/// Discover the workspace root from an invocation directory.
///
/// Heuristics (first match wins, walking upward from `start`):
/// - `blueprint.toml` (explicit workspace configuration)
/// - `.internal/` (a workspace the engine already ran on)
/// - `.git/` or `.git` file (git repo root / worktree)
///
/// Falls back to `start` when no markers are found.
pub(crate) fn discover_workspace_root(start: &Path) -> PathBuf {
    for dir in start.ancestors() {
        if dir.join(PROJECT_CONFIG_FILE).is_file() {
            return dir.to_path_buf();
        }
        if dir.join(DEFAULT_INTERNAL_DIR).is_dir() {
            return dir.to_path_buf();
        }
        if dir.join(".git").exists() {
            return dir.to_path_buf();
        }
    }
    start.to_path_buf()
}
