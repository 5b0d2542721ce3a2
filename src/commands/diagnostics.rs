//! `blueprint diagnostics [path]`

use std::path::Path;

use anyhow::Result;

use blueprint::application::ReportedDiagnostic;

use super::{emit, format_diagnostic, Engine};

pub fn cmd_diagnostics(root: &Path, path: Option<&str>, fixable: bool, json: bool) -> Result<()> {
    let engine = Engine::open(root)?;
    engine.orchestrator.wait_idle()?;

    let mut diagnostics: Vec<ReportedDiagnostic> = if fixable {
        engine.orchestrator.diagnostics_with_suggestions()?
    } else {
        engine.orchestrator.diagnostics()?
    };
    if let Some(path) = path {
        let path = engine.resource_path(path)?;
        diagnostics.retain(|d| d.path == path);
    }

    if json {
        for reported in &diagnostics {
            emit(serde_json::json!({ "event": "diagnostic", "diagnostic": reported }))?;
        }
    } else if diagnostics.is_empty() {
        println!("No diagnostics");
    } else {
        for reported in &diagnostics {
            println!(
                "{}",
                format_diagnostic(&reported.path, Some(&reported.tool), &reported.diagnostic)
            );
        }
    }

    engine.close()
}
