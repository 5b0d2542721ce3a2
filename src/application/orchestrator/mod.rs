//! Orchestrator Module
//!
//! Keeps diagnostics and reports in sync with the workspace.
//!
//! ## Structure
//!
//! - `cache` - Input path cache (`InputPathCache`)
//! - `store` - Diagnostics and report persistence
//! - `pipeline` - Validate, cascade, build, suggestion and reconciliation flows
//! - `options` - `OrchestratorOptions`
//! - `result` - `BuildOutcome`
//! - `use_case` - The `Orchestrator` facade and its worker queue
//!
//! ## Usage
//!
//! ```ignore
//! let workspace = Arc::new(Workspace::new(Arc::new(LocalTree::new(root))));
//! let orchestrator = Orchestrator::new(workspace, registry, OrchestratorOptions::new())?;
//! let outcome = orchestrator.build(&ResourcePath::parse("decisions/0001.decision"))?;
//! ```

mod cache;
mod options;
mod pipeline;
mod result;
mod store;
mod use_case;

pub use cache::InputPathCache;
pub use options::OrchestratorOptions;
pub use result::BuildOutcome;
pub use store::{DiagnosticsStore, ReportStore, ReportedDiagnostic};
pub use use_case::Orchestrator;
