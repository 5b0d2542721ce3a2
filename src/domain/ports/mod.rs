//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod engine_events;
pub mod format;
pub mod resource_tree;
pub mod tool;

pub use engine_events::{EngineEvent, EngineEventSink, NoopEventSink};
pub use format::{Format, FormatError};
pub use resource_tree::{ResourceTree, TreeError, TreeResult};
pub use tool::{AppliedSuggestion, ArtifactTool, StandaloneTool, Tool, ToolDescriptor};
