//! Configuration module for Blueprint
//!
//! Resolution order:
//! 1. Environment variables (BLUEPRINT_*)
//! 2. Project config (`blueprint.toml` at the workspace root)
//! 3. User config (`<config_dir>/blueprint/config.toml`)
//! 4. Built-in defaults

mod loader;
#[cfg(test)]
mod tests;
mod types;

pub use crate::domain::value_objects::ConfigWarning;

pub use loader::{
    apply_overrides, parse_with_warnings, user_config_path, with_env_overrides, PROJECT_CONFIG_FILE,
};
pub use types::{Config, DecisionsConfig, EngineConfig, ToolsConfig, WatchConfig};
