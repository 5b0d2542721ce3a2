//! Application Layer
//!
//! Use cases that drive tools over a workspace.
//! This layer:
//! - Depends on the Domain layer (entities, value objects, ports)
//! - Does NOT decide what an artifact means (that is each tool's business)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `Orchestrator` - Validate, cascade, build and reconcile on workspace changes
//! - `Workspace` - Artifact definitions and change dispatch
//! - `ToolRegistry` - The tools an orchestrator drives
//!
//! ## Services
//!
//! - `resolve_inputs` - Build a `ResolvedInputs` snapshot for a tool

pub mod inputs;
pub mod orchestrator;
pub mod registry;
pub mod workspace;

#[cfg(test)]
pub(crate) mod test_support;

pub use inputs::resolve_inputs;
pub use orchestrator::{
    BuildOutcome, DiagnosticsStore, InputPathCache, Orchestrator, OrchestratorOptions,
    ReportStore, ReportedDiagnostic,
};
pub use registry::{ToolRegistry, PARSER_TOOL_ID};
pub use workspace::{ArtifactDefinition, Workspace, WorkspaceHandler, DEFAULT_INTERNAL_DIR};
