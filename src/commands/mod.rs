//! CLI command handlers
//!
//! Each handler opens the workspace through [`Engine`], runs one operation
//! and prints either human-readable text or NDJSON (`--json`).

pub mod apply;
pub mod build;
pub mod check;
pub mod diagnostics;
mod project_root;
pub mod report;
pub mod watch;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use blueprint::application::{Orchestrator, OrchestratorOptions, Workspace};
use blueprint::config::Config;
use blueprint::domain::ports::engine_events::{EngineEventSink, NoopEventSink};
use blueprint::domain::value_objects::{Diagnostic, ResourcePath};
use blueprint::infrastructure::{builtin_registry, LocalTree, WorkspaceLock};

/// Workspace root from `--root`, or discovered from the current directory
pub fn resolve_root(root: Option<&Path>) -> Result<PathBuf> {
    let start = match root {
        Some(root) => root.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let start = start
        .canonicalize()
        .with_context(|| format!("workspace root {} does not exist", start.display()))?;
    Ok(match root {
        Some(_) => start,
        None => project_root::discover_workspace_root(&start),
    })
}

/// A locked, running engine over the workspace at `root`
pub(crate) struct Engine {
    pub orchestrator: Orchestrator,
    pub config: Config,
    pub root: PathBuf,
    tree: LocalTree,
    _lock: WorkspaceLock,
}

impl Engine {
    pub fn open(root: &Path) -> Result<Self> {
        Self::open_with_events(root, Arc::new(NoopEventSink))
    }

    pub fn open_with_events(root: &Path, events: Arc<dyn EngineEventSink>) -> Result<Self> {
        let (config, warnings) = Config::load_or_default(root)?;
        for warning in &warnings {
            eprintln!("Warning: {warning}");
        }

        let lock = WorkspaceLock::acquire(&root.join(&config.engine.internal_dir))?;
        let tree = LocalTree::new(root);
        let workspace = Arc::new(Workspace::with_internal_dir(
            Arc::new(tree.clone()),
            &config.engine.internal_dir,
        ));
        let registry = builtin_registry(&config)?;
        let options = OrchestratorOptions::new()
            .with_reconcile_on_start(config.engine.reconcile_on_start)
            .with_unique_suggestion_codes(config.engine.unique_suggestion_codes)
            .with_events(events);
        let orchestrator = Orchestrator::new(workspace, registry, options)?;

        Ok(Self {
            orchestrator,
            config,
            root: root.to_path_buf(),
            tree,
            _lock: lock,
        })
    }

    /// Interpret a CLI path argument: an existing file on disk, or a
    /// workspace-relative path
    pub fn resource_path(&self, arg: &str) -> Result<ResourcePath> {
        let on_disk = Path::new(arg);
        if let Ok(canonical) = on_disk.canonicalize() {
            if let Some(path) = self.tree.resource_path(&canonical) {
                return Ok(path);
            }
        }
        if on_disk.is_absolute() && !on_disk.starts_with(&self.root) {
            anyhow::bail!("{arg} is outside the workspace {}", self.root.display());
        }
        Ok(ResourcePath::parse(arg))
    }

    /// Every resource some tool treats as an artifact, in path order
    pub fn artifacts(&self) -> Result<Vec<ResourcePath>> {
        let workspace = self.orchestrator.workspace();
        Ok(workspace
            .tree()
            .walk(&ResourcePath::root())?
            .into_iter()
            .filter(|path| workspace.definition_for(path).is_some())
            .collect())
    }

    /// Drain queued work and stop the worker
    pub fn close(mut self) -> Result<()> {
        self.orchestrator.wait_idle()?;
        self.orchestrator.shutdown();
        Ok(())
    }
}

/// Write a single NDJSON event (one JSON object per line).
pub(crate) fn emit(event: serde_json::Value) -> io::Result<()> {
    let mut out = io::stdout().lock();
    let line = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")
}

/// `path: LEVEL [location] message (tool)`
pub(crate) fn format_diagnostic(path: &ResourcePath, tool: Option<&str>, diagnostic: &Diagnostic) -> String {
    let mut line = format!("{path}: {diagnostic}");
    if let Some(tool) = tool {
        line.push_str(&format!(" ({tool})"));
    }
    for suggestion in &diagnostic.suggestions {
        line.push_str(&format!("\n    fix: {} - {}", suggestion.code, suggestion.message));
    }
    line
}
