//! Configuration type definitions

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::application::DEFAULT_INTERNAL_DIR;
use crate::error::{EngineError, EngineResult};

use super::loader::{self, ConfigWarning};

/// Engine behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Workspace-relative directory holding caches, diagnostics and reports
    #[serde(default = "default_internal_dir")]
    pub internal_dir: String,

    #[serde(default = "default_true")]
    pub reconcile_on_start: bool,

    #[serde(default)]
    pub unique_suggestion_codes: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            internal_dir: default_internal_dir(),
            reconcile_on_start: true,
            unique_suggestion_codes: false,
        }
    }
}

fn default_internal_dir() -> String {
    DEFAULT_INTERNAL_DIR.to_string()
}

fn default_true() -> bool {
    true
}

/// File watcher settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    100
}

/// Which built-in tools are registered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_enabled_tools")]
    pub enabled: Vec<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_tools(),
        }
    }
}

fn default_enabled_tools() -> Vec<String> {
    vec!["decisions".to_string(), "decision-index".to_string()]
}

/// Decision record location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionsConfig {
    #[serde(default = "default_decisions_root")]
    pub root: String,
}

impl Default for DecisionsConfig {
    fn default() -> Self {
        Self {
            root: default_decisions_root(),
        }
    }
}

fn default_decisions_root() -> String {
    "decisions".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub decisions: DecisionsConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> EngineResult<Self> {
        Ok(Self::load_with_warnings(path)?.0)
    }

    /// Load configuration and collect unknown-key warnings
    pub fn load_with_warnings(path: &Path) -> EngineResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Project file, then user file, then defaults; environment overrides last
    pub fn load_or_default(workspace_root: &Path) -> EngineResult<(Self, Vec<ConfigWarning>)> {
        loader::load_or_default(workspace_root)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self, file: &str) -> EngineResult<()> {
        let internal = self.engine.internal_dir.trim_matches('/');
        if internal.is_empty() || internal.split('/').any(|s| s == ".." || s == ".") {
            return Err(EngineError::Config {
                file: file.to_string(),
                message: format!(
                    "engine.internal_dir must be a relative directory inside the workspace, got '{}'",
                    self.engine.internal_dir
                ),
            });
        }
        if self.decisions.root.split('/').any(|s| s == "..") {
            return Err(EngineError::Config {
                file: file.to_string(),
                message: format!("decisions.root escapes the workspace: '{}'", self.decisions.root),
            });
        }
        Ok(())
    }
}
