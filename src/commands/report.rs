//! `blueprint report [path]`

use std::path::Path;

use anyhow::Result;

use blueprint::domain::value_objects::ResourcePath;

use super::{emit, Engine};

pub fn cmd_report(root: &Path, path: Option<&str>, open: bool, json: bool) -> Result<()> {
    let engine = Engine::open(root)?;
    engine.orchestrator.wait_idle()?;

    let path = match path {
        Some(path) => engine.resource_path(path)?,
        None => ResourcePath::root(),
    };
    let reports = engine.orchestrator.reports_for(&path)?;
    let main = engine.orchestrator.main_report_for(&path);

    if open {
        let Some(main) = main else {
            engine.close()?;
            anyhow::bail!("no report has been generated for {path}");
        };
        let content = engine.orchestrator.workspace().tree().read_to_string(&main)?;
        if json {
            emit(serde_json::json!({
                "event": "report",
                "path": path,
                "report": main,
                "content": content,
            }))?;
        } else {
            print!("{content}");
        }
    } else if json {
        emit(serde_json::json!({
            "event": "reports",
            "path": path,
            "main": main,
            "reports": reports,
        }))?;
    } else if reports.is_empty() {
        println!("No reports for {path}");
    } else {
        for report in &reports {
            let marker = if Some(report) == main.as_ref() { "*" } else { " " };
            println!("{marker} {report}");
        }
    }

    engine.close()
}
