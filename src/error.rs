//! Error types for Blueprint
//!
//! Uses `thiserror` for library errors. Validation findings are never errors:
//! they travel as `Diagnostic` data. Only operational failures end up here.

use thiserror::Error;

use crate::domain::ports::format::FormatError;
use crate::domain::ports::resource_tree::TreeError;
use crate::domain::value_objects::ResourcePath;

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Main error type for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Resource tree failure (read/write/delete)
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Artifact could not be decoded or encoded
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Diagnostics document could not be (de)serialized
    #[error("diagnostics document error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration file
    #[error("invalid configuration in {file}: {message}")]
    Config { file: String, message: String },

    /// File watcher could not be started
    #[error("file watcher error: {0}")]
    Watcher(String),

    /// Path is not covered by any registered artifact definition
    #[error("'{path}' is not a known artifact")]
    NotAnArtifact { path: ResourcePath },

    /// Tool cannot be registered
    #[error("cannot register tool '{id}': {reason}")]
    InvalidTool { id: String, reason: String },

    /// More than one tool claims a suggestion code
    #[error("suggestion '{code}' is claimed by several tools: {}", tools.join(", "))]
    AmbiguousSuggestion { code: String, tools: Vec<String> },

    /// The orchestrator worker is no longer running
    #[error("orchestrator has stopped")]
    EngineStopped,

    /// Another process holds the workspace lock
    #[error("workspace is locked by another process: {path}")]
    Locked { path: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
