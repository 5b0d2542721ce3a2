//! Tool registry
//!
//! An explicit value listing the tools an orchestrator drives, in
//! registration order. It is handed to the orchestrator at construction;
//! there is no process-wide registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::entities::{ArtifactType, Input};
use crate::domain::ports::tool::{ArtifactTool, StandaloneTool, Tool};
use crate::domain::value_objects::{Glob, ResourcePath};
use crate::error::{EngineError, EngineResult};

/// Tool id reserved for parse failures of the changed resource itself
pub const PARSER_TOOL_ID: &str = "parser";

#[derive(Clone, Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Ids must be unique; they namespace files on disk.
    pub fn register(&mut self, tool: Tool) -> EngineResult<()> {
        let id = tool.id();
        if id.is_empty() || id == PARSER_TOOL_ID || id.contains(['/', '\\']) {
            return Err(EngineError::InvalidTool {
                id: id.to_string(),
                reason: "id must be non-empty, must not contain '/' and must not be 'parser'"
                    .to_string(),
            });
        }
        if self.get(id).is_some() {
            return Err(EngineError::InvalidTool {
                id: id.to_string(),
                reason: "a tool with this id is already registered".to_string(),
            });
        }
        self.tools.push(tool);
        Ok(())
    }

    pub fn register_artifact_tool(&mut self, tool: Arc<dyn ArtifactTool>) -> EngineResult<()> {
        self.register(Tool::Artifact(tool))
    }

    pub fn register_standalone_tool(&mut self, tool: Arc<dyn StandaloneTool>) -> EngineResult<()> {
        self.register(Tool::Standalone(tool))
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn get(&self, id: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.id() == id)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    fn artifact_tools(&self) -> impl Iterator<Item = &Arc<dyn ArtifactTool>> {
        self.tools.iter().filter_map(Tool::as_artifact_tool)
    }

    /// Artifact tools whose validation target covers `path`, in registration order
    pub fn artifact_tools_for(&self, path: &ResourcePath) -> Vec<&Arc<dyn ArtifactTool>> {
        self.artifact_tools()
            .filter(|t| t.validation_target().matches(path))
            .collect()
    }

    /// Tools that validate an artifact of `artifact_type` stored at `path`
    pub fn validators_of(
        &self,
        path: &ResourcePath,
        artifact_type: ArtifactType,
    ) -> Vec<&Arc<dyn ArtifactTool>> {
        self.artifact_tools()
            .filter(|t| {
                let target = t.validation_target();
                target.artifact_type() == artifact_type && target.matches(path)
            })
            .collect()
    }

    /// Tools that build reports for an artifact of `artifact_type` stored at `path`
    pub fn reporters_of(
        &self,
        path: &ResourcePath,
        artifact_type: ArtifactType,
    ) -> Vec<&Arc<dyn ArtifactTool>> {
        self.artifact_tools()
            .filter(|t| {
                t.reporting_target().is_some_and(|target| {
                    target.artifact_type() == artifact_type && target.matches(path)
                })
            })
            .collect()
    }

    /// Tools whose validation inputs include a glob matching `path`
    pub fn readers_of(&self, path: &ResourcePath) -> Vec<&Tool> {
        self.tools.iter().filter(|t| t.reads(path)).collect()
    }

    /// One input per distinct glob across every declared input, first declaration wins
    pub fn distinct_inputs(&self) -> Vec<Input> {
        let mut by_glob: BTreeMap<Glob, Input> = BTreeMap::new();
        for tool in &self.tools {
            for input in tool.declared_inputs() {
                by_glob
                    .entry(input.glob().clone())
                    .or_insert_with(|| input.clone());
            }
        }
        by_glob.into_values().collect()
    }
}
