//! Tool inputs and resolved input snapshots

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::artifact::{Artifact, ArtifactType, Link};
use crate::domain::ports::format::Format;
use crate::domain::value_objects::{Glob, ResourcePath};

/// Declares one set of artifacts a tool reads
#[derive(Clone)]
pub struct Input {
    name: String,
    artifact_type: ArtifactType,
    glob: Glob,
    format: Arc<dyn Format>,
}

impl Input {
    pub fn new(
        name: impl Into<String>,
        artifact_type: ArtifactType,
        glob: Glob,
        format: Arc<dyn Format>,
    ) -> Self {
        Self {
            name: name.into(),
            artifact_type,
            glob,
            format,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn artifact_type(&self) -> ArtifactType {
        self.artifact_type
    }

    pub fn glob(&self) -> &Glob {
        &self.glob
    }

    pub fn format(&self) -> &Arc<dyn Format> {
        &self.format
    }

    pub fn matches(&self, path: &ResourcePath) -> bool {
        self.glob.matches(path)
    }
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Input")
            .field("name", &self.name)
            .field("type", &self.artifact_type)
            .field("glob", &self.glob)
            .field("format", &self.format.name())
            .finish()
    }
}

/// One parsed artifact and the resource it came from
#[derive(Debug, Clone)]
pub struct ResolvedArtifact {
    pub path: ResourcePath,
    pub artifact: Arc<dyn Artifact>,
}

impl ResolvedArtifact {
    /// Typed view of the artifact
    pub fn downcast<T: Artifact>(&self) -> Option<&T> {
        self.artifact.downcast_ref::<T>()
    }
}

/// Immutable snapshot: input name -> artifacts in path order.
///
/// Built once per validation or build pass. Link resolution always goes
/// through a snapshot, never through live storage.
#[derive(Debug, Clone, Default)]
pub struct ResolvedInputs {
    inputs: BTreeMap<String, Vec<ResolvedArtifact>>,
}

impl ResolvedInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used by the resolver and by tests
    pub fn with(mut self, name: impl Into<String>, artifacts: Vec<ResolvedArtifact>) -> Self {
        self.inputs.insert(name.into(), artifacts);
        self
    }

    /// Artifacts resolved for input `name`; empty if the input is unknown
    pub fn get(&self, name: &str) -> &[ResolvedArtifact] {
        self.inputs.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Typed artifacts of input `name`, skipping any of another concrete type
    pub fn artifacts<'a, T: Artifact>(&'a self, name: &str) -> impl Iterator<Item = &'a T> + 'a {
        self.get(name).iter().filter_map(ResolvedArtifact::downcast::<T>)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inputs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inputs.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find the artifact a link points to, searching inputs in name order
    pub fn resolve(&self, link: &Link) -> Option<&ResolvedArtifact> {
        self.inputs
            .values()
            .flatten()
            .find(|resolved| link.points_to(resolved.artifact.as_ref()))
    }
}
