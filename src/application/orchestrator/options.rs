//! Orchestrator Options
//!
//! Behavior switches for the orchestrator.

use std::fmt;
use std::sync::Arc;

use crate::domain::ports::engine_events::{EngineEventSink, NoopEventSink};

/// Options for [`Orchestrator`](super::Orchestrator)
#[derive(Clone)]
pub struct OrchestratorOptions {
    /// Queue the startup reconciliation pass
    pub reconcile_on_start: bool,
    /// Fail suggestion application when several tools claim the code
    pub unique_suggestion_codes: bool,
    /// Receiver of engine events
    pub events: Arc<dyn EngineEventSink>,
}

impl OrchestratorOptions {
    pub fn new() -> Self {
        Self {
            reconcile_on_start: true,
            unique_suggestion_codes: false,
            events: Arc::new(NoopEventSink),
        }
    }

    pub fn with_reconcile_on_start(mut self, reconcile: bool) -> Self {
        self.reconcile_on_start = reconcile;
        self
    }

    pub fn with_unique_suggestion_codes(mut self, unique: bool) -> Self {
        self.unique_suggestion_codes = unique;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn EngineEventSink>) -> Self {
        self.events = events;
        self
    }
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OrchestratorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrchestratorOptions")
            .field("reconcile_on_start", &self.reconcile_on_start)
            .field("unique_suggestion_codes", &self.unique_suggestion_codes)
            .finish_non_exhaustive()
    }
}
