//! Validate, cascade and build pipelines
//!
//! A `Pipeline` is owned by the orchestrator's worker thread. Every method
//! runs to completion before the next command is taken off the queue, so
//! cache writes from different events never interleave.
//!
//! For one changed resource the order is always:
//! 1. validate the resource itself
//! 2. cascade to every tool reading it
//! 3. build reports, only if step 1 found no ERROR

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::application::inputs::resolve_inputs;
use crate::application::registry::{ToolRegistry, PARSER_TOOL_ID};
use crate::application::workspace::Workspace;
use crate::domain::entities::{Artifact, Input, ResolvedInputs};
use crate::domain::ports::engine_events::EngineEvent;
use crate::domain::ports::format::FormatError;
use crate::domain::ports::tool::{AppliedSuggestion, ArtifactTool, StandaloneTool, Tool};
use crate::domain::value_objects::{has_errors, Diagnostic, Level, Location, ResourcePath};
use crate::error::{EngineError, EngineResult};

use super::cache::InputPathCache;
use super::options::OrchestratorOptions;
use super::result::BuildOutcome;
use super::store::{DiagnosticsStore, ReportStore};

pub(crate) struct Pipeline {
    workspace: Arc<Workspace>,
    registry: ToolRegistry,
    cache: InputPathCache,
    diagnostics: DiagnosticsStore,
    reports: ReportStore,
    options: OrchestratorOptions,
}

impl Pipeline {
    pub(crate) fn new(
        workspace: Arc<Workspace>,
        registry: ToolRegistry,
        cache: InputPathCache,
        options: OrchestratorOptions,
    ) -> Self {
        let tree = workspace.tree().clone();
        let internal = workspace.internal_root().clone();
        Self {
            diagnostics: DiagnosticsStore::new(tree.clone(), &internal),
            reports: ReportStore::new(tree, &internal),
            workspace,
            registry,
            cache,
            options,
        }
    }

    fn emit(&self, event: EngineEvent) {
        self.options.events.on_event(event);
    }

    fn resolve(&self, inputs: &[Input]) -> EngineResult<ResolvedInputs> {
        resolve_inputs(self.workspace.tree().as_ref(), &self.cache, inputs)
    }

    /// Full pipeline for a changed, successfully parsed resource
    pub(crate) fn changed(
        &self,
        path: &ResourcePath,
        artifact: &dyn Artifact,
    ) -> EngineResult<BuildOutcome> {
        tracing::debug!(path = %path, "artifact changed");
        self.cache.add(path)?;
        self.diagnostics.remove_tool(path, PARSER_TOOL_ID)?;

        let (valid, validated_by) = self.validate_self(path, artifact)?;
        self.cascade(std::slice::from_ref(path), &validated_by)?;

        if valid {
            self.build(path, artifact, &validated_by)?;
        } else {
            tracing::debug!(path = %path, "validation failed, build skipped");
            self.emit(EngineEvent::BuildSkipped { path: path.clone() });
        }

        Ok(BuildOutcome {
            path: path.clone(),
            valid,
            diagnostics: self.diagnostics.for_path(path)?,
            reports: self.reports.list(path)?,
        })
    }

    /// Validation of the resource itself, without cascade or build
    pub(crate) fn validate_only(
        &self,
        path: &ResourcePath,
        artifact: &dyn Artifact,
    ) -> EngineResult<Vec<Diagnostic>> {
        self.cache.add(path)?;
        self.diagnostics.remove_tool(path, PARSER_TOOL_ID)?;
        self.validate_self(path, artifact)?;
        self.diagnostics.for_path(path)
    }

    /// A resource matching a definition does not parse.
    ///
    /// Previous tool diagnostics are replaced by a single `parser` ERROR;
    /// existing reports are left alone. Dependents still learn about it.
    pub(crate) fn unparsable(
        &self,
        path: &ResourcePath,
        error: &FormatError,
    ) -> EngineResult<BuildOutcome> {
        let diagnostic = self.record_parse_failure(path, error)?;
        self.cascade(std::slice::from_ref(path), &[])?;
        Ok(BuildOutcome {
            path: path.clone(),
            valid: false,
            diagnostics: vec![diagnostic],
            reports: self.reports.list(path)?,
        })
    }

    /// Replace the diagnostics of `path` with a single `parser` ERROR.
    ///
    /// Nothing else is re-validated.
    pub(crate) fn record_parse_failure(
        &self,
        path: &ResourcePath,
        error: &FormatError,
    ) -> EngineResult<Diagnostic> {
        tracing::debug!(path = %path, %error, "artifact does not parse");
        self.cache.add(path)?;
        self.diagnostics.remove_all(path)?;
        let diagnostic = Diagnostic::error(error.to_string());
        self.diagnostics
            .save(path, PARSER_TOOL_ID, std::slice::from_ref(&diagnostic))?;
        self.emit(EngineEvent::ParseFailed {
            path: path.clone(),
            message: error.to_string(),
        });
        Ok(diagnostic)
    }

    /// Deletion of a resource, or of a directory holding tracked resources
    pub(crate) fn deleted(&self, path: &ResourcePath) -> EngineResult<()> {
        let mut removed = self.cache.remove(path)?;
        if removed.is_empty() {
            if self.workspace.definition_for(path).is_none() {
                tracing::trace!(path = %path, "deleted path was not tracked");
                return Ok(());
            }
            removed.push(path.clone());
        }
        for gone in &removed {
            self.diagnostics.remove_all(gone)?;
            self.reports.clear(gone)?;
            tracing::debug!(path = %gone, "artifact removed");
            self.emit(EngineEvent::Removed { path: gone.clone() });
        }
        self.cascade(&removed, &[])
    }

    /// Drop what is stored for a resource deleted while nobody was watching
    fn forget(&self, path: &ResourcePath) -> EngineResult<()> {
        self.diagnostics.remove_all(path)?;
        self.reports.clear(path)?;
        tracing::debug!(path = %path, "stale artifact removed");
        self.emit(EngineEvent::Removed { path: path.clone() });
        self.cascade(std::slice::from_ref(path), &[])
    }

    /// Run every validator of `artifact`'s type on it and store the results.
    ///
    /// Returns overall validity and the ids of the tools that ran.
    fn validate_self(
        &self,
        path: &ResourcePath,
        artifact: &dyn Artifact,
    ) -> EngineResult<(bool, Vec<String>)> {
        let mut valid = true;
        let mut validated_by = Vec::new();
        for tool in self.registry.validators_of(path, artifact.artifact_type()) {
            let inputs = self.resolve(tool.validation_context())?;
            let diagnostics = tool.validate(artifact, &inputs);
            valid &= !has_errors(&diagnostics);
            self.store_validation(path, tool.id(), &diagnostics)?;
            validated_by.push(tool.id().to_string());
        }
        Ok((valid, validated_by))
    }

    fn store_validation(
        &self,
        path: &ResourcePath,
        tool: &str,
        diagnostics: &[Diagnostic],
    ) -> EngineResult<()> {
        self.diagnostics.save(path, tool, diagnostics)?;
        let errors = diagnostics.iter().filter(|d| d.is_error()).count();
        let warnings = diagnostics.iter().filter(|d| d.level == Level::Warn).count();
        tracing::debug!(path = %path, tool, errors, warnings, "validated");
        self.emit(EngineEvent::Validated {
            path: path.clone(),
            tool: tool.to_string(),
            errors,
            warnings,
        });
        Ok(())
    }

    /// Re-validate everything read by tools whose inputs match `changed`.
    ///
    /// Tools listed in `validated_by` already validated `changed[0]` in this
    /// pass and skip it; they still re-validate their other targets.
    fn cascade(&self, changed: &[ResourcePath], validated_by: &[String]) -> EngineResult<()> {
        let mut seen = BTreeSet::new();
        for path in changed {
            for tool in self.registry.readers_of(path) {
                if !seen.insert(tool.id().to_string()) {
                    continue;
                }
                match tool {
                    Tool::Artifact(tool) => {
                        let skip = changed
                            .first()
                            .filter(|_| validated_by.iter().any(|id| id == tool.id()));
                        self.cascade_artifact_tool(tool.as_ref(), path, skip)?;
                    }
                    Tool::Standalone(tool) => {
                        self.cascade_standalone_tool(tool.as_ref(), changed)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn cascade_artifact_tool(
        &self,
        tool: &dyn ArtifactTool,
        trigger: &ResourcePath,
        skip: Option<&ResourcePath>,
    ) -> EngineResult<()> {
        let target = tool.validation_target();
        let targets: Vec<ResourcePath> = self
            .cache
            .load(target.glob())
            .into_iter()
            .filter(|t| Some(t) != skip)
            .collect();
        if targets.is_empty() {
            return Ok(());
        }
        let inputs = self.resolve(tool.validation_context())?;
        let mut validated = 0;
        for path in &targets {
            let bytes = match self.workspace.tree().read(path) {
                Ok(bytes) => bytes,
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e.into()),
            };
            let artifact = match target.format().parse(path, &bytes) {
                Ok(artifact) => artifact,
                Err(error) => {
                    tracing::warn!(path = %path, tool = tool.id(), %error, "cascade skipped unparsable target");
                    continue;
                }
            };
            let diagnostics = tool.validate(artifact.as_ref(), &inputs);
            self.store_validation(path, tool.id(), &diagnostics)?;
            validated += 1;
        }
        tracing::debug!(trigger = %trigger, tool = tool.id(), targets = validated, "cascaded");
        self.emit(EngineEvent::Cascaded {
            path: trigger.clone(),
            tool: tool.id().to_string(),
            targets: validated,
        });
        Ok(())
    }

    fn cascade_standalone_tool(
        &self,
        tool: &dyn StandaloneTool,
        changed: &[ResourcePath],
    ) -> EngineResult<()> {
        let root = ResourcePath::root();
        let inputs = self.resolve(tool.validation_context())?;
        let diagnostics = tool.validate(&inputs);
        self.store_validation(&root, tool.id(), &diagnostics)?;
        if let Some(trigger) = changed.first() {
            self.emit(EngineEvent::Cascaded {
                path: trigger.clone(),
                tool: tool.id().to_string(),
                targets: 1,
            });
        }

        let reports_on_change = tool
            .reporting_context()
            .iter()
            .any(|input| changed.iter().any(|p| input.matches(p)));
        if has_errors(&diagnostics) || !reports_on_change {
            return Ok(());
        }
        self.reports.clear_tool(&root, tool.id())?;
        let inputs = self.resolve(tool.reporting_context())?;
        let output = self.reports.output_for(&root, tool.id());
        let build_diagnostics = tool.build_reports(&inputs, &output)?;
        if !build_diagnostics.is_empty() {
            self.diagnostics.append(&root, tool.id(), &build_diagnostics)?;
        }
        self.emit(EngineEvent::ReportsBuilt {
            path: root,
            tool: tool.id().to_string(),
        });
        Ok(())
    }

    /// Regenerate every report for `path`
    fn build(
        &self,
        path: &ResourcePath,
        artifact: &dyn Artifact,
        validated_by: &[String],
    ) -> EngineResult<()> {
        self.reports.clear(path)?;
        for tool in self.registry.reporters_of(path, artifact.artifact_type()) {
            let inputs = self.resolve(tool.reporting_context())?;
            let output = self.reports.output_for(path, tool.id());
            let build_diagnostics = tool.build_reports(artifact, &inputs, &output)?;
            if validated_by.iter().any(|id| id == tool.id()) {
                if !build_diagnostics.is_empty() {
                    self.diagnostics.append(path, tool.id(), &build_diagnostics)?;
                }
            } else if build_diagnostics.is_empty() {
                self.diagnostics.remove_tool(path, tool.id())?;
            } else {
                self.diagnostics.save(path, tool.id(), &build_diagnostics)?;
            }
            tracing::debug!(path = %path, tool = tool.id(), "reports built");
            self.emit(EngineEvent::ReportsBuilt {
                path: path.clone(),
                tool: tool.id().to_string(),
            });
        }
        Ok(())
    }

    /// Ask the artifact tools validating `path`, in registration order, to
    /// apply `code`. The first one that changes something wins.
    pub(crate) fn apply_suggestion(
        &self,
        path: &ResourcePath,
        code: &str,
        location: Option<&Location>,
    ) -> EngineResult<AppliedSuggestion> {
        let tools = self.registry.artifact_tools_for(path);
        if self.options.unique_suggestion_codes {
            let claimants: Vec<String> = tools
                .iter()
                .filter(|t| t.suggestion_codes().contains(&code))
                .map(|t| t.id().to_string())
                .collect();
            if claimants.len() > 1 {
                return Err(EngineError::AmbiguousSuggestion {
                    code: code.to_string(),
                    tools: claimants,
                });
            }
        }

        let resource = self.workspace.resource(path);
        for tool in tools {
            let bytes = resource.read()?;
            let artifact = tool.validation_target().format().parse(path, &bytes)?;
            let inputs = self.resolve(tool.validation_context())?;
            let applied =
                tool.apply_suggestion(artifact.as_ref(), code, location, &inputs, &resource)?;
            if applied.is_effective() {
                tracing::info!(path = %path, code, tool = tool.id(), changed = applied.changed_paths().len(), "suggestion applied");
                self.emit(EngineEvent::SuggestionApplied {
                    path: path.clone(),
                    code: code.to_string(),
                    changed: applied.changed_paths().len(),
                });
                return Ok(applied);
            }
        }
        tracing::debug!(path = %path, code, "suggestion had no effect");
        Ok(AppliedSuggestion::NoEffect)
    }

    /// Re-drive every tracked resource modified since its diagnostics were written
    pub(crate) fn reconcile(&self) -> EngineResult<usize> {
        let tracked = self.cache.tracked();
        self.emit(EngineEvent::ReconcileStarted {
            tracked: tracked.len(),
        });
        // Staleness is decided for every path before any is re-driven: a
        // cascade rewrites the diagnostics of other tracked resources.
        let mut stale = Vec::new();
        for path in &tracked {
            match self.is_stale(path) {
                Ok(true) => stale.push(path),
                Ok(false) => {}
                Err(e) => self.reconcile_failed(path, &e),
            }
        }
        tracing::debug!(stale = stale.len(), "stale artifacts found");

        let mut refreshed = 0;
        for path in stale {
            match self.redrive(path) {
                Ok(true) => refreshed += 1,
                Ok(false) => {}
                Err(e) => self.reconcile_failed(path, &e),
            }
        }
        for orphan in self.diagnostics.paths()? {
            if orphan.is_root() || tracked.contains(&orphan) || self.workspace.tree().exists(&orphan) {
                continue;
            }
            match self.forget(&orphan) {
                Ok(()) => refreshed += 1,
                Err(e) => {
                    tracing::error!(path = %orphan, error = %e, "could not remove stale diagnostics");
                    self.emit_error(&e);
                }
            }
        }
        tracing::info!(tracked = tracked.len(), refreshed, "reconciliation complete");
        self.emit(EngineEvent::ReconcileCompleted { refreshed });
        Ok(refreshed)
    }

    /// Modified at or after its newest diagnostics, or gone from the tree
    fn is_stale(&self, path: &ResourcePath) -> EngineResult<bool> {
        let modified = match self.workspace.tree().last_modified(path) {
            Ok(modified) => modified,
            Err(e) if e.is_not_found() => return Ok(true),
            Err(e) => return Err(e.into()),
        };
        Ok(self
            .diagnostics
            .newest_timestamp(path)?
            .map_or(true, |written| modified >= written))
    }

    fn redrive(&self, path: &ResourcePath) -> EngineResult<bool> {
        if !self.workspace.tree().exists(path) {
            self.deleted(path)?;
            return Ok(true);
        }
        match self.workspace.parse(path) {
            Ok(artifact) => self.changed(path, artifact.as_ref()).map(|_| true),
            Err(EngineError::Format(error)) => self.unparsable(path, &error).map(|_| true),
            Err(EngineError::NotAnArtifact { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn reconcile_failed(&self, path: &ResourcePath, error: &EngineError) {
        tracing::error!(path = %path, error = %error, "reconciliation failed");
        self.emit(EngineEvent::Error {
            message: format!("{path}: {error}"),
        });
    }

    pub(crate) fn emit_error(&self, error: &EngineError) {
        self.emit(EngineEvent::Error {
            message: error.to_string(),
        });
    }

    pub(crate) fn workspace(&self) -> &Arc<Workspace> {
        &self.workspace
    }
}

