//! Orchestrator facade
//!
//! All pipeline work happens on one worker thread draining a command
//! queue. The workspace handler, the startup reconciliation and blocking
//! callers are independent producers; nothing else ever touches the cache.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::application::registry::ToolRegistry;
use crate::application::workspace::{ArtifactDefinition, Workspace, WorkspaceHandler};
use crate::domain::entities::Artifact;
use crate::domain::ports::engine_events::EngineEvent;
use crate::domain::ports::format::FormatError;
use crate::domain::ports::tool::{AppliedSuggestion, Tool};
use crate::domain::value_objects::{Diagnostic, Location, ResourcePath};
use crate::error::{EngineError, EngineResult};

use super::cache::InputPathCache;
use super::options::OrchestratorOptions;
use super::pipeline::Pipeline;
use super::result::BuildOutcome;
use super::store::{DiagnosticsStore, ReportStore, ReportedDiagnostic};

type Reply<T> = Sender<EngineResult<T>>;

enum Command {
    Changed {
        path: ResourcePath,
        artifact: Arc<dyn Artifact>,
    },
    Unparsable {
        path: ResourcePath,
        error: FormatError,
    },
    Deleted {
        path: ResourcePath,
    },
    Validate {
        path: ResourcePath,
        reply: Reply<Vec<Diagnostic>>,
    },
    Build {
        path: ResourcePath,
        reply: Reply<BuildOutcome>,
    },
    ApplySuggestion {
        path: ResourcePath,
        code: String,
        location: Option<Location>,
        reply: Reply<AppliedSuggestion>,
    },
    Reconcile,
    Flush {
        reply: Sender<()>,
    },
    Shutdown,
}

/// Workspace handler feeding the queue
struct EventIntake {
    tx: Sender<Command>,
}

impl EventIntake {
    fn send(&self, command: Command) {
        if self.tx.send(command).is_err() {
            tracing::debug!("orchestrator stopped, dropping workspace event");
        }
    }
}

impl WorkspaceHandler for EventIntake {
    fn artifact_changed(&self, path: &ResourcePath, artifact: Arc<dyn Artifact>) {
        self.send(Command::Changed {
            path: path.clone(),
            artifact,
        });
    }

    fn artifact_unparsable(&self, path: &ResourcePath, error: FormatError) {
        self.send(Command::Unparsable {
            path: path.clone(),
            error,
        });
    }

    fn artifact_deleted(&self, path: &ResourcePath) {
        self.send(Command::Deleted { path: path.clone() });
    }
}

/// Incremental validation and build engine over a [`Workspace`]
pub struct Orchestrator {
    workspace: Arc<Workspace>,
    registry: ToolRegistry,
    diagnostics: DiagnosticsStore,
    reports: ReportStore,
    tx: Sender<Command>,
    worker: Option<JoinHandle<()>>,
}

impl Orchestrator {
    /// Register definitions for every declared input, index the tree, start
    /// the worker and install it as the workspace handler.
    ///
    /// Reconciliation, when enabled, is queued and does not block.
    pub fn new(
        workspace: Arc<Workspace>,
        registry: ToolRegistry,
        options: OrchestratorOptions,
    ) -> EngineResult<Self> {
        let inputs = registry.distinct_inputs();
        for input in &inputs {
            if !workspace.has_definition_for_glob(input.glob()) {
                workspace.register_artifact_definition(ArtifactDefinition::from(input));
            }
        }

        let tree = workspace.tree().clone();
        let internal = workspace.internal_root().clone();
        let cache = InputPathCache::new(
            tree.clone(),
            &internal,
            inputs.iter().map(|i| i.glob().clone()),
        );
        let tracked = cache.rebuild()?;
        tracing::debug!(tools = registry.len(), tracked, "orchestrator starting");

        let reconcile = options.reconcile_on_start;
        let pipeline = Pipeline::new(workspace.clone(), registry.clone(), cache, options);
        let (tx, rx) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("blueprint-orchestrator".to_string())
            .spawn(move || run_worker(pipeline, rx))?;

        workspace.set_handler(Some(Arc::new(EventIntake { tx: tx.clone() })));
        if reconcile {
            let _ = tx.send(Command::Reconcile);
        }

        Ok(Self {
            diagnostics: DiagnosticsStore::new(tree.clone(), &internal),
            reports: ReportStore::new(tree, &internal),
            workspace,
            registry,
            tx,
            worker: Some(worker),
        })
    }

    pub fn workspace(&self) -> &Arc<Workspace> {
        &self.workspace
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    fn send(&self, command: Command) -> EngineResult<()> {
        self.tx.send(command).map_err(|_| EngineError::EngineStopped)
    }

    fn request<T>(&self, make: impl FnOnce(Reply<T>) -> Command) -> EngineResult<T> {
        let (reply, rx) = mpsc::channel();
        self.send(make(reply))?;
        rx.recv().map_err(|_| EngineError::EngineStopped)?
    }

    /// Queue the changed pipeline for `path`
    pub fn artifact_changed(&self, path: &ResourcePath, artifact: Arc<dyn Artifact>) -> EngineResult<()> {
        self.send(Command::Changed {
            path: path.clone(),
            artifact,
        })
    }

    /// Queue the deletion pipeline for `path`
    pub fn artifact_deleted(&self, path: &ResourcePath) -> EngineResult<()> {
        self.send(Command::Deleted { path: path.clone() })
    }

    /// Queue a reconciliation pass
    pub fn reconcile(&self) -> EngineResult<()> {
        self.send(Command::Reconcile)
    }

    /// Validate `path` alone (no cascade, no build) and return its diagnostics
    pub fn validate(&self, path: &ResourcePath) -> EngineResult<Vec<Diagnostic>> {
        self.request(|reply| Command::Validate {
            path: path.clone(),
            reply,
        })
    }

    /// Run the full pipeline for `path` and wait for it
    pub fn build(&self, path: &ResourcePath) -> EngineResult<BuildOutcome> {
        self.request(|reply| Command::Build {
            path: path.clone(),
            reply,
        })
    }

    /// Apply suggestion `code` to `path`. Touched resources are re-validated afterwards.
    pub fn apply_suggestion(
        &self,
        path: &ResourcePath,
        code: &str,
        location: Option<&Location>,
    ) -> EngineResult<AppliedSuggestion> {
        self.request(|reply| Command::ApplySuggestion {
            path: path.clone(),
            code: code.to_string(),
            location: location.cloned(),
            reply,
        })
    }

    /// Block until every command queued before this call has been processed
    pub fn wait_idle(&self) -> EngineResult<()> {
        let (reply, rx) = mpsc::channel();
        self.send(Command::Flush { reply })?;
        rx.recv().map_err(|_| EngineError::EngineStopped)
    }

    /// Stored diagnostics for `path`, merged across tools
    pub fn diagnostics_for(&self, path: &ResourcePath) -> EngineResult<Vec<Diagnostic>> {
        self.diagnostics.for_path(path)
    }

    /// Every stored diagnostic
    pub fn diagnostics(&self) -> EngineResult<Vec<ReportedDiagnostic>> {
        self.diagnostics.all()
    }

    /// Stored diagnostics that offer at least one suggestion
    pub fn diagnostics_with_suggestions(&self) -> EngineResult<Vec<ReportedDiagnostic>> {
        Ok(self
            .diagnostics
            .all()?
            .into_iter()
            .filter(|d| !d.diagnostic.suggestions.is_empty())
            .collect())
    }

    /// Report resources generated for `path`.
    ///
    /// For the root this lists the reports of standalone tools.
    pub fn reports_for(&self, path: &ResourcePath) -> EngineResult<Vec<ResourcePath>> {
        if !path.is_root() {
            return self.reports.list(path);
        }
        let mut reports = Vec::new();
        for tool in self.registry.tools() {
            if let Tool::Standalone(tool) = tool {
                reports.extend(self.reports.list_tool(path, tool.id())?);
            }
        }
        Ok(reports)
    }

    /// The report editors should open for `path`: the first reporting tool's
    /// declared main report that was actually generated.
    pub fn main_report_for(&self, path: &ResourcePath) -> Option<ResourcePath> {
        if path.is_root() {
            return self.registry.tools().iter().find_map(|tool| match tool {
                Tool::Standalone(tool) => self
                    .reports
                    .existing(path, tool.id(), tool.main_report()?),
                Tool::Artifact(_) => None,
            });
        }
        let definition = self.workspace.definition_for(path)?;
        self.registry
            .reporters_of(path, definition.artifact_type)
            .into_iter()
            .find_map(|tool| self.reports.existing(path, tool.id(), tool.main_report()?))
    }

    /// Stop the worker after it drains the queue
    pub fn shutdown(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        self.workspace.set_handler(None);
        let _ = self.tx.send(Command::Shutdown);
        if worker.join().is_err() {
            tracing::error!("orchestrator worker panicked");
        }
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(pipeline: Pipeline, rx: Receiver<Command>) {
    while let Ok(command) = rx.recv() {
        match command {
            Command::Changed { path, artifact } => {
                report(&pipeline, pipeline.changed(&path, artifact.as_ref()).map(drop));
            }
            Command::Unparsable { path, error } => {
                report(&pipeline, pipeline.unparsable(&path, &error).map(drop));
            }
            Command::Deleted { path } => report(&pipeline, pipeline.deleted(&path)),
            Command::Reconcile => report(&pipeline, pipeline.reconcile().map(drop)),
            Command::Validate { path, reply } => {
                let _ = reply.send(validate(&pipeline, &path));
            }
            Command::Build { path, reply } => {
                let _ = reply.send(build(&pipeline, &path));
            }
            Command::ApplySuggestion {
                path,
                code,
                location,
                reply,
            } => {
                let result = pipeline.apply_suggestion(&path, &code, location.as_ref());
                if let Ok(applied) = &result {
                    for changed in applied.changed_paths() {
                        if let Err(e) = pipeline.workspace().notify_changed(changed) {
                            tracing::warn!(path = %changed, error = %e, "could not queue fixed resource");
                        }
                    }
                }
                let _ = reply.send(result);
            }
            Command::Flush { reply } => {
                let _ = reply.send(());
            }
            Command::Shutdown => break,
        }
    }
    tracing::debug!("orchestrator worker stopped");
}

fn validate(pipeline: &Pipeline, path: &ResourcePath) -> EngineResult<Vec<Diagnostic>> {
    match pipeline.workspace().parse(path) {
        Ok(artifact) => pipeline.validate_only(path, artifact.as_ref()),
        Err(EngineError::Format(error)) => Ok(vec![pipeline.record_parse_failure(path, &error)?]),
        Err(e) => Err(e),
    }
}

fn build(pipeline: &Pipeline, path: &ResourcePath) -> EngineResult<BuildOutcome> {
    match pipeline.workspace().parse(path) {
        Ok(artifact) => pipeline.changed(path, artifact.as_ref()),
        Err(EngineError::Format(error)) => pipeline.unparsable(path, &error),
        Err(e) => Err(e),
    }
}

/// Failures of queued work have no caller to return to
fn report(pipeline: &Pipeline, result: EngineResult<()>) {
    if let Err(e) = result {
        tracing::error!(error = %e, "queued orchestrator operation failed");
        pipeline.emit_error(&e);
    }
}
