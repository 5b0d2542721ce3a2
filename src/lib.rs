//! Blueprint - incremental validation and report engine for design artifacts
//!
//! Blueprint keeps design artifacts (decision records and the like) as plain
//! files in a workspace, re-validates exactly what a change affects, and
//! regenerates reports and diagnostics under an internal directory.
//!
//! Layers:
//! - `domain` - resource paths, globs, diagnostics, artifacts and the ports
//!   tools and storage backends implement
//! - `application` - workspace, tool registry and the orchestrator
//! - `infrastructure` - local and in-memory trees, document formats, the
//!   file watcher and the built-in decision tools
//! - `config` - `blueprint.toml` loading

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{
    BuildOutcome, Orchestrator, OrchestratorOptions, ToolRegistry, Workspace, WorkspaceHandler,
};
pub use config::Config;
pub use domain::entities::{Artifact, ArtifactType, Document, Input, Link, Resource, ResolvedInputs};
pub use domain::ports::{AppliedSuggestion, ArtifactTool, Format, ResourceTree, StandaloneTool, Tool};
pub use domain::value_objects::{Diagnostic, Glob, Level, Location, ResourcePath};
pub use error::{EngineError, EngineResult};
pub use infrastructure::{builtin_registry, LocalTree, MemoryTree};
