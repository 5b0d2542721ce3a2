//! `blueprint build <path>`

use std::path::Path;

use anyhow::Result;

use super::{emit, format_diagnostic, Engine};

pub fn cmd_build(root: &Path, path: &str, json: bool) -> Result<()> {
    let engine = Engine::open(root)?;
    let path = engine.resource_path(path)?;
    let outcome = engine.orchestrator.build(&path)?;
    engine.orchestrator.wait_idle()?;

    if json {
        emit(serde_json::json!({
            "event": "complete",
            "command": "build",
            "outcome": outcome,
        }))?;
    } else {
        for diagnostic in &outcome.diagnostics {
            println!("{}", format_diagnostic(&outcome.path, None, diagnostic));
        }
        if outcome.valid {
            println!("Built {} ({} reports)", outcome.path, outcome.reports.len());
            for report in &outcome.reports {
                println!("  {report}");
            }
        } else {
            println!(
                "{} has {} errors; reports were not rebuilt",
                outcome.path,
                outcome.error_count()
            );
        }
    }

    engine.close()?;
    if !outcome.valid {
        std::process::exit(1);
    }
    Ok(())
}
