//! Tool port - pluggable validators, report builders and quick-fix appliers
//!
//! A tool comes in one of two shapes:
//! - [`ArtifactTool`]: centered on one artifact type. Validates a single
//!   resource, builds reports for it, applies suggestions against it.
//! - [`StandaloneTool`]: works on a whole set of inputs with no single target
//!   resource (cross-artifact consistency checks, indexes).
//!
//! What an artifact *means* is entirely the tool's business.

use std::fmt;
use std::sync::Arc;

use crate::domain::entities::{Artifact, Input, Resource, ResolvedInputs};
use crate::domain::value_objects::{Diagnostic, Location, ResourcePath};
use crate::error::EngineResult;

/// Identity and declared inputs shared by both tool shapes
pub trait ToolDescriptor: Send + Sync {
    /// Stable id; namespaces diagnostics and reports on disk
    fn id(&self) -> &str;

    /// Inputs resolved before validation
    fn validation_context(&self) -> &[Input];

    /// Inputs resolved before building reports
    fn reporting_context(&self) -> &[Input] {
        self.validation_context()
    }
}

/// Tool centered on a single artifact type
pub trait ArtifactTool: ToolDescriptor {
    /// Input describing the resources this tool validates
    fn validation_target(&self) -> &Input;

    /// Input describing the resources this tool builds reports for
    fn reporting_target(&self) -> Option<&Input> {
        None
    }

    fn validate(&self, artifact: &dyn Artifact, inputs: &ResolvedInputs) -> Vec<Diagnostic>;

    /// Write report resources below `output`
    fn build_reports(
        &self,
        _artifact: &dyn Artifact,
        _inputs: &ResolvedInputs,
        _output: &Resource,
    ) -> EngineResult<Vec<Diagnostic>> {
        Ok(Vec::new())
    }

    /// Name of the report file (relative to the tool's output) editors open first
    fn main_report(&self) -> Option<&str> {
        None
    }

    /// Suggestion codes this tool may offer
    fn suggestion_codes(&self) -> &[&str] {
        &[]
    }

    /// Apply suggestion `code` at `location`.
    ///
    /// Returning [`AppliedSuggestion::NoEffect`] means "this code is not mine".
    fn apply_suggestion(
        &self,
        _artifact: &dyn Artifact,
        _code: &str,
        _location: Option<&Location>,
        _inputs: &ResolvedInputs,
        _resource: &Resource,
    ) -> EngineResult<AppliedSuggestion> {
        Ok(AppliedSuggestion::NoEffect)
    }
}

/// Tool working on a set of inputs with no single target
pub trait StandaloneTool: ToolDescriptor {
    fn validate(&self, inputs: &ResolvedInputs) -> Vec<Diagnostic>;

    fn build_reports(
        &self,
        _inputs: &ResolvedInputs,
        _output: &Resource,
    ) -> EngineResult<Vec<Diagnostic>> {
        Ok(Vec::new())
    }

    fn main_report(&self) -> Option<&str> {
        None
    }
}

/// A registered tool of either shape
#[derive(Clone)]
pub enum Tool {
    Artifact(Arc<dyn ArtifactTool>),
    Standalone(Arc<dyn StandaloneTool>),
}

impl Tool {
    pub fn id(&self) -> &str {
        match self {
            Tool::Artifact(tool) => tool.id(),
            Tool::Standalone(tool) => tool.id(),
        }
    }

    pub fn validation_context(&self) -> &[Input] {
        match self {
            Tool::Artifact(tool) => tool.validation_context(),
            Tool::Standalone(tool) => tool.validation_context(),
        }
    }

    pub fn reporting_context(&self) -> &[Input] {
        match self {
            Tool::Artifact(tool) => tool.reporting_context(),
            Tool::Standalone(tool) => tool.reporting_context(),
        }
    }

    /// Every input this tool declares, targets included
    pub fn declared_inputs(&self) -> Vec<&Input> {
        let mut inputs: Vec<&Input> = self
            .validation_context()
            .iter()
            .chain(self.reporting_context())
            .collect();
        if let Tool::Artifact(tool) = self {
            inputs.push(tool.validation_target());
            inputs.extend(tool.reporting_target());
        }
        inputs
    }

    /// True if any validation input matches `path`
    pub fn reads(&self, path: &ResourcePath) -> bool {
        self.validation_context().iter().any(|i| i.matches(path))
    }

    pub fn as_artifact_tool(&self) -> Option<&Arc<dyn ArtifactTool>> {
        match self {
            Tool::Artifact(tool) => Some(tool),
            Tool::Standalone(_) => None,
        }
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tool::Artifact(tool) => f.debug_tuple("ArtifactTool").field(&tool.id()).finish(),
            Tool::Standalone(tool) => f.debug_tuple("StandaloneTool").field(&tool.id()).finish(),
        }
    }
}

/// Outcome of applying a suggestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedSuggestion {
    /// The tool did not recognize the code, or changed nothing
    NoEffect,
    /// Resources created or changed by the fix
    Applied { changed: Vec<ResourcePath> },
}

impl AppliedSuggestion {
    /// `NoEffect` when nothing was touched
    pub fn changed(paths: Vec<ResourcePath>) -> Self {
        if paths.is_empty() {
            AppliedSuggestion::NoEffect
        } else {
            AppliedSuggestion::Applied { changed: paths }
        }
    }

    pub fn is_effective(&self) -> bool {
        matches!(self, AppliedSuggestion::Applied { changed } if !changed.is_empty())
    }

    pub fn changed_paths(&self) -> &[ResourcePath] {
        match self {
            AppliedSuggestion::NoEffect => &[],
            AppliedSuggestion::Applied { changed } => changed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_change_set_is_no_effect() {
        assert_eq!(AppliedSuggestion::changed(vec![]), AppliedSuggestion::NoEffect);
        assert!(!AppliedSuggestion::Applied { changed: vec![] }.is_effective());
    }

    #[test]
    fn applied_exposes_changed_paths() {
        let applied = AppliedSuggestion::changed(vec![ResourcePath::parse("/a/b.x")]);
        assert!(applied.is_effective());
        assert_eq!(applied.changed_paths(), [ResourcePath::parse("/a/b.x")]);
    }
}
