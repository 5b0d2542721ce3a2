//! `blueprint apply <path> <code>`

use std::path::Path;

use anyhow::Result;

use blueprint::domain::value_objects::Location;

use super::{emit, Engine};

pub fn cmd_apply(
    root: &Path,
    path: &str,
    code: &str,
    location: Option<&str>,
    json: bool,
) -> Result<()> {
    let engine = Engine::open(root)?;
    engine.orchestrator.wait_idle()?;

    let path = engine.resource_path(path)?;
    let location = location.map(Location::parse);
    let applied = engine
        .orchestrator
        .apply_suggestion(&path, code, location.as_ref())?;
    engine.orchestrator.wait_idle()?;

    if !applied.is_effective() {
        engine.close()?;
        anyhow::bail!("suggestion '{code}' had no effect on {path}");
    }

    let changed = applied.changed_paths();
    if json {
        emit(serde_json::json!({
            "event": "complete",
            "command": "apply",
            "path": path,
            "code": code,
            "changed": changed,
        }))?;
    } else {
        println!("Applied '{code}' to {path}");
        for changed in changed {
            println!("  changed {changed}");
        }
    }

    engine.close()
}
