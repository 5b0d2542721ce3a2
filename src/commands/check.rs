//! `blueprint check`

use std::path::Path;

use anyhow::Result;

use blueprint::domain::value_objects::Level;

use super::{emit, format_diagnostic, Engine};

pub fn cmd_check(root: &Path, strict_warnings: bool, json: bool) -> Result<()> {
    let engine = Engine::open(root)?;
    if json {
        emit(serde_json::json!({
            "event": "start",
            "command": "check",
            "root": root.display().to_string(),
            "strict_warnings": strict_warnings,
        }))?;
    }

    let artifacts = engine.artifacts()?;
    let mut invalid = 0;
    for path in &artifacts {
        let outcome = engine.orchestrator.build(path)?;
        if !outcome.valid {
            invalid += 1;
        }
        if json {
            emit(serde_json::json!({
                "event": "artifact",
                "path": path,
                "valid": outcome.valid,
                "errors": outcome.error_count(),
                "reports": outcome.reports.len(),
            }))?;
        }
    }
    engine.orchestrator.wait_idle()?;

    let diagnostics = engine.orchestrator.diagnostics()?;
    let errors = diagnostics
        .iter()
        .filter(|d| d.diagnostic.level == Level::Error)
        .count();
    let warnings = diagnostics
        .iter()
        .filter(|d| d.diagnostic.level == Level::Warn)
        .count();
    let failed = errors > 0 || (strict_warnings && warnings > 0);

    if json {
        for reported in &diagnostics {
            emit(serde_json::json!({ "event": "diagnostic", "diagnostic": reported }))?;
        }
        emit(serde_json::json!({
            "event": "complete",
            "command": "check",
            "artifacts": artifacts.len(),
            "invalid": invalid,
            "errors": errors,
            "warnings": warnings,
            "success": !failed,
        }))?;
    } else {
        for reported in &diagnostics {
            println!(
                "{}",
                format_diagnostic(&reported.path, Some(&reported.tool), &reported.diagnostic)
            );
        }
        if !diagnostics.is_empty() {
            println!();
        }
        println!(
            "Checked {} artifacts: {} errors, {} warnings",
            artifacts.len(),
            errors,
            warnings
        );
    }

    engine.close()?;
    if failed {
        std::process::exit(1);
    }
    Ok(())
}
