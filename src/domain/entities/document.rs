//! Typed document artifacts
//!
//! `Document<B>` pairs an identity with a typed body. Formats decode bytes
//! straight into a concrete `B`, so the mapping from artifact type tag to
//! decoder is fixed at compile time.

use std::any::Any;
use std::fmt;

use super::artifact::{Artifact, ArtifactType, FullyQualifiedName};

/// An artifact whose content is a typed body `B`
#[derive(Clone, PartialEq)]
pub struct Document<B> {
    name: FullyQualifiedName,
    artifact_type: ArtifactType,
    pub body: B,
}

impl<B> Document<B> {
    pub fn new(artifact_type: ArtifactType, name: FullyQualifiedName, body: B) -> Self {
        Self {
            name,
            artifact_type,
            body,
        }
    }

    pub fn name(&self) -> &FullyQualifiedName {
        &self.name
    }
}

impl<B: fmt::Debug> fmt::Debug for Document<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("type", &self.artifact_type)
            .field("name", &self.name.to_string())
            .field("body", &self.body)
            .finish()
    }
}

impl<B> Artifact for Document<B>
where
    B: fmt::Debug + Send + Sync + 'static,
{
    fn fully_qualified_name(&self) -> &FullyQualifiedName {
        &self.name
    }

    fn artifact_type(&self) -> ArtifactType {
        self.artifact_type
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
