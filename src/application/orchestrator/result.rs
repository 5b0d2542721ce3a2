//! Orchestrator Results

use serde::Serialize;

use crate::domain::value_objects::{Diagnostic, ResourcePath};

/// Result of running the full pipeline for one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOutcome {
    pub path: ResourcePath,
    /// No tool reported an ERROR for the resource itself
    pub valid: bool,
    /// Merged diagnostics stored for the resource after the run
    pub diagnostics: Vec<Diagnostic>,
    /// Report resources present for the resource after the run
    pub reports: Vec<ResourcePath>,
}

impl BuildOutcome {
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn is_built(&self) -> bool {
        self.valid && !self.reports.is_empty()
    }
}
