//! Input resolution
//!
//! Turns a tool's declared inputs into a [`ResolvedInputs`] snapshot using
//! the input path cache. Resources that fail to parse are skipped with a
//! warning; one malformed file never stops a validation pass.

use std::collections::BTreeMap;

use crate::application::orchestrator::InputPathCache;
use crate::domain::entities::{Input, ResolvedArtifact, ResolvedInputs};
use crate::domain::ports::resource_tree::ResourceTree;
use crate::error::EngineResult;

/// Parse every cached resource of every input
pub fn resolve_inputs(
    tree: &dyn ResourceTree,
    cache: &InputPathCache,
    inputs: &[Input],
) -> EngineResult<ResolvedInputs> {
    let mut by_name: BTreeMap<&str, Vec<ResolvedArtifact>> = BTreeMap::new();
    for input in inputs {
        let resolved = by_name.entry(input.name()).or_default();
        for path in cache.load(input.glob()) {
            if resolved.iter().any(|r| r.path == path) {
                continue;
            }
            let bytes = match tree.read(&path) {
                Ok(bytes) => bytes,
                Err(e) if e.is_not_found() => {
                    tracing::debug!(path = %path, "cached input no longer exists");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            match input.format().parse(&path, &bytes) {
                Ok(artifact) => resolved.push(ResolvedArtifact { path, artifact }),
                Err(error) => {
                    tracing::warn!(input = input.name(), path = %path, %error, "skipping unparsable input");
                }
            }
        }
    }
    Ok(by_name
        .into_iter()
        .fold(ResolvedInputs::new(), |inputs, (name, artifacts)| {
            inputs.with(name, artifacts)
        }))
}
