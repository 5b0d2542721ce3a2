//! Workspace
//!
//! Owns the resource tree, the artifact definitions that turn paths into
//! typed artifacts, and the single handler change notifications go to.
//! Paths under the internal cache subtree never reach the handler, so the
//! engine's own bookkeeping writes cannot re-trigger it.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::entities::{Artifact, ArtifactType, Input, Resource};
use crate::domain::ports::format::{Format, FormatError};
use crate::domain::ports::resource_tree::ResourceTree;
use crate::domain::value_objects::{Glob, ResourcePath};
use crate::error::{EngineError, EngineResult};

/// Default name of the internal cache subtree
pub const DEFAULT_INTERNAL_DIR: &str = ".internal";

/// Binds an artifact type to the resources it lives in and the format that reads them
#[derive(Clone)]
pub struct ArtifactDefinition {
    pub artifact_type: ArtifactType,
    pub glob: Glob,
    pub format: Arc<dyn Format>,
}

impl ArtifactDefinition {
    pub fn new(artifact_type: ArtifactType, glob: Glob, format: Arc<dyn Format>) -> Self {
        Self {
            artifact_type,
            glob,
            format,
        }
    }
}

impl From<&Input> for ArtifactDefinition {
    fn from(input: &Input) -> Self {
        Self::new(
            input.artifact_type(),
            input.glob().clone(),
            input.format().clone(),
        )
    }
}

impl std::fmt::Debug for ArtifactDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactDefinition")
            .field("type", &self.artifact_type)
            .field("glob", &self.glob)
            .field("format", &self.format.name())
            .finish()
    }
}

/// Receiver of workspace notifications
pub trait WorkspaceHandler: Send + Sync {
    fn artifact_changed(&self, path: &ResourcePath, artifact: Arc<dyn Artifact>);

    /// A resource matching a definition changed but does not parse
    fn artifact_unparsable(&self, path: &ResourcePath, error: FormatError);

    /// A resource (or a whole directory) went away
    fn artifact_deleted(&self, path: &ResourcePath);
}

pub struct Workspace {
    tree: Arc<dyn ResourceTree>,
    internal_root: ResourcePath,
    definitions: RwLock<Vec<ArtifactDefinition>>,
    handler: RwLock<Option<Arc<dyn WorkspaceHandler>>>,
}

impl Workspace {
    pub fn new(tree: Arc<dyn ResourceTree>) -> Self {
        Self::with_internal_dir(tree, DEFAULT_INTERNAL_DIR)
    }

    pub fn with_internal_dir(tree: Arc<dyn ResourceTree>, internal_dir: &str) -> Self {
        let internal_root = ResourcePath::parse(internal_dir);
        let internal_root = if internal_root.is_root() {
            ResourcePath::parse(DEFAULT_INTERNAL_DIR)
        } else {
            internal_root
        };
        Self {
            tree,
            internal_root,
            definitions: RwLock::new(Vec::new()),
            handler: RwLock::new(None),
        }
    }

    pub fn tree(&self) -> &Arc<dyn ResourceTree> {
        &self.tree
    }

    pub fn root(&self) -> Resource {
        Resource::root(self.tree.clone())
    }

    pub fn resource(&self, path: &ResourcePath) -> Resource {
        Resource::new(self.tree.clone(), path.clone())
    }

    /// Root of the reserved cache subtree, e.g. `/.internal`
    pub fn internal_root(&self) -> &ResourcePath {
        &self.internal_root
    }

    pub fn is_internal(&self, path: &ResourcePath) -> bool {
        path.is_under(&self.internal_root)
    }

    /// Register a definition. A definition with the same glob is replaced.
    pub fn register_artifact_definition(&self, definition: ArtifactDefinition) {
        let mut definitions = self.definitions_mut();
        match definitions.iter_mut().find(|d| d.glob == definition.glob) {
            Some(existing) => *existing = definition,
            None => definitions.push(definition),
        }
    }

    pub fn has_definition_for_glob(&self, glob: &Glob) -> bool {
        self.definitions().iter().any(|d| &d.glob == glob)
    }

    /// First registered definition whose glob matches `path`
    pub fn definition_for(&self, path: &ResourcePath) -> Option<ArtifactDefinition> {
        if self.is_internal(path) {
            return None;
        }
        self.definitions()
            .iter()
            .find(|d| d.glob.matches(path))
            .cloned()
    }

    pub fn artifact_definitions(&self) -> Vec<ArtifactDefinition> {
        self.definitions().clone()
    }

    /// Read and parse the artifact stored at `path`
    pub fn parse(&self, path: &ResourcePath) -> EngineResult<Arc<dyn Artifact>> {
        let definition = self
            .definition_for(path)
            .ok_or_else(|| EngineError::NotAnArtifact { path: path.clone() })?;
        let bytes = self.tree.read(path)?;
        Ok(definition.format.parse(path, &bytes)?)
    }

    /// Install (or with `None`, remove) the handler
    pub fn set_handler(&self, handler: Option<Arc<dyn WorkspaceHandler>>) {
        *self.handler.write().unwrap_or_else(PoisonError::into_inner) = handler;
    }

    fn handler(&self) -> Option<Arc<dyn WorkspaceHandler>> {
        self.handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Tell the workspace `path` changed on the underlying tree.
    ///
    /// Internal paths and paths no definition matches are ignored. A path
    /// that no longer exists is reported as deleted.
    pub fn notify_changed(&self, path: &ResourcePath) -> EngineResult<()> {
        if self.is_internal(path) {
            return Ok(());
        }
        let Some(definition) = self.definition_for(path) else {
            tracing::trace!(path = %path, "ignoring change outside artifact definitions");
            return Ok(());
        };
        if self.tree.is_dir(path) {
            return Ok(());
        }
        let bytes = match self.tree.read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.is_not_found() => return self.notify_deleted(path),
            Err(e) => return Err(e.into()),
        };
        let Some(handler) = self.handler() else {
            return Ok(());
        };
        match definition.format.parse(path, &bytes) {
            Ok(artifact) => handler.artifact_changed(path, artifact),
            Err(error) => {
                tracing::debug!(path = %path, %error, "changed resource does not parse");
                handler.artifact_unparsable(path, error);
            }
        }
        Ok(())
    }

    /// Tell the workspace `path` (a file or a directory) was deleted
    pub fn notify_deleted(&self, path: &ResourcePath) -> EngineResult<()> {
        if self.is_internal(path) {
            return Ok(());
        }
        if let Some(handler) = self.handler() {
            handler.artifact_deleted(path);
        }
        Ok(())
    }

    /// Write `content` to `path` and notify
    pub fn write(&self, path: &ResourcePath, content: &[u8]) -> EngineResult<()> {
        self.tree.write(path, content)?;
        self.notify_changed(path)
    }

    /// Delete `path` and notify
    pub fn delete(&self, path: &ResourcePath) -> EngineResult<()> {
        self.tree.delete(path)?;
        self.notify_deleted(path)
    }

    fn definitions(&self) -> RwLockReadGuard<'_, Vec<ArtifactDefinition>> {
        self.definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn definitions_mut(&self) -> RwLockWriteGuard<'_, Vec<ArtifactDefinition>> {
        self.definitions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("internal_root", &self.internal_root)
            .field("definitions", &*self.definitions())
            .finish()
    }
}
