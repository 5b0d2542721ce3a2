//! Built-in tools
//!
//! Decision records (`decisions/**/*.decision`) with a per-decision validator
//! and renderer plus a workspace-wide decision log.

mod decision;
mod decision_index;
mod decision_tool;

use std::sync::Arc;

pub use decision::{decisions_input, Decision, DecisionBody, Status, DECISION, DECISION_EXTENSION};
pub use decision_index::DecisionIndexTool;
pub use decision_tool::{DecisionTool, CREATE_MISSING};

use crate::application::ToolRegistry;
use crate::config::Config;
use crate::error::{EngineError, EngineResult};

/// Ids of every built-in tool, in registration order
pub const BUILTIN_TOOLS: &[&str] = &[DecisionTool::ID, DecisionIndexTool::ID];

/// Registry holding the built-in tools enabled in `config`
pub fn builtin_registry(config: &Config) -> EngineResult<ToolRegistry> {
    let root = config.decisions.root.as_str();
    let mut registry = ToolRegistry::default();
    for id in &config.tools.enabled {
        match id.as_str() {
            DecisionTool::ID => registry.register_artifact_tool(Arc::new(DecisionTool::new(root)))?,
            DecisionIndexTool::ID => {
                registry.register_standalone_tool(Arc::new(DecisionIndexTool::new(root)))?
            }
            other => {
                return Err(EngineError::InvalidTool {
                    id: other.to_string(),
                    reason: format!("no such built-in tool (known: {})", BUILTIN_TOOLS.join(", ")),
                })
            }
        }
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_registers_both_tools() {
        let registry = builtin_registry(&Config::default()).unwrap();
        let ids: Vec<_> = registry.tools().iter().map(|t| t.id().to_string()).collect();
        assert_eq!(ids, vec!["decisions", "decision-index"]);
    }

    #[test]
    fn unknown_tool_is_rejected() {
        let mut config = Config::default();
        config.tools.enabled.push("usecases".to_string());
        let err = builtin_registry(&config).unwrap_err();
        assert!(err.to_string().contains("usecases"));
    }

    #[test]
    fn enabling_a_tool_twice_is_rejected() {
        let mut config = Config::default();
        config.tools.enabled = vec!["decisions".to_string(), "decisions".to_string()];
        assert!(builtin_registry(&config).is_err());
    }
}
