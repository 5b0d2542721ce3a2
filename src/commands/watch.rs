//! `blueprint watch`

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use blueprint::domain::ports::engine_events::{EngineEvent, EngineEventSink};
use blueprint::infrastructure::WorkspaceWatcher;

use super::{emit, Engine};

/// Prints engine events as they happen
struct ConsoleEventSink {
    json: bool,
}

impl EngineEventSink for ConsoleEventSink {
    fn on_event(&self, event: EngineEvent) {
        if self.json {
            println!("{}", event.to_json());
        } else if let Some(line) = describe(&event) {
            println!("{line}");
        }
    }
}

fn describe(event: &EngineEvent) -> Option<String> {
    Some(match event {
        EngineEvent::Validated {
            path,
            tool,
            errors,
            warnings,
        } => {
            let mark = if *errors > 0 { "x" } else { "ok" };
            format!("[{mark}] {path} ({tool}): {errors} errors, {warnings} warnings")
        }
        EngineEvent::ReportsBuilt { path, tool } => format!("      reports for {path} ({tool})"),
        EngineEvent::BuildSkipped { path } => format!("      {path} is invalid; reports kept"),
        EngineEvent::ParseFailed { path, message } => format!("[x] {path}: {message}"),
        EngineEvent::Removed { path } => format!("[-] {path}"),
        EngineEvent::SuggestionApplied {
            path,
            code,
            changed,
        } => format!("[+] {code} on {path} changed {changed} resources"),
        EngineEvent::ReconcileCompleted { refreshed } if *refreshed > 0 => {
            format!("Refreshed {refreshed} stale artifacts")
        }
        EngineEvent::Error { message } => format!("Error: {message}"),
        EngineEvent::Cascaded { .. }
        | EngineEvent::ReconcileStarted { .. }
        | EngineEvent::ReconcileCompleted { .. } => return None,
    })
}

pub fn cmd_watch(root: &Path, json: bool) -> Result<()> {
    let engine = Engine::open_with_events(root, Arc::new(ConsoleEventSink { json }))?;

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })?;

    if json {
        emit(serde_json::json!({
            "event": "watch_started",
            "root": root.display().to_string(),
        }))?;
    } else {
        println!("Watching {} (Ctrl+C to stop)", root.display());
    }

    let debounce = Duration::from_millis(engine.config.watch.debounce_ms);
    let mut watcher = WorkspaceWatcher::new(engine.orchestrator.workspace().clone(), root, debounce);
    let result = watcher.run(running);

    engine.close()?;
    if json {
        emit(serde_json::json!({ "event": "shutdown" }))?;
    } else {
        println!("Stopped");
    }
    Ok(result?)
}
