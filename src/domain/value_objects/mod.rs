//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod config_warning;
mod diagnostic;
mod glob;
mod resource_path;

pub use config_warning::ConfigWarning;
pub use diagnostic::{has_errors, Diagnostic, DiagnosticsDocument, Level, Location, Suggestion};
pub use glob::Glob;
pub use resource_path::ResourcePath;
