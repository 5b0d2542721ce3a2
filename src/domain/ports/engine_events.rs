//! Engine Event Port
//!
//! Provides an observable interface for pipeline activity.
//! Enables progress reporting, NDJSON event streams, and test assertions.

use serde::Serialize;

use crate::domain::value_objects::ResourcePath;

/// Event emitted while the orchestrator works
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A tool validated a resource
    Validated {
        path: ResourcePath,
        tool: String,
        errors: usize,
        warnings: usize,
    },

    /// A dependent tool was re-run because `path` changed
    Cascaded {
        path: ResourcePath,
        tool: String,
        targets: usize,
    },

    /// Reports for `path` were rebuilt by `tool`
    ReportsBuilt { path: ResourcePath, tool: String },

    /// Build skipped because validation reported errors
    BuildSkipped { path: ResourcePath },

    /// A changed resource could not be parsed
    ParseFailed { path: ResourcePath, message: String },

    /// Diagnostics and reports of a deleted resource were removed
    Removed { path: ResourcePath },

    /// A quick-fix touched resources
    SuggestionApplied {
        path: ResourcePath,
        code: String,
        changed: usize,
    },

    /// Startup reconciliation began
    ReconcileStarted { tracked: usize },

    /// Startup reconciliation finished
    ReconcileCompleted { refreshed: usize },

    /// A queued operation failed
    Error { message: String },
}

impl EngineEvent {
    /// NDJSON line
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Trait for receiving engine events
///
/// Implementations can be:
/// - a console printer for `watch`
/// - an NDJSON writer for CI
/// - `NoopEventSink` for silent operation
pub trait EngineEventSink: Send + Sync {
    fn on_event(&self, event: EngineEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl EngineEventSink for NoopEventSink {
    fn on_event(&self, _event: EngineEvent) {
        // Do nothing
    }
}
