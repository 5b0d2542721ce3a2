//! Format port - parser/builder pair for one artifact format
//!
//! The orchestrator only ever decodes artifacts through the format declared
//! by an `Input` or an `ArtifactDefinition`.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::entities::artifact::Artifact;
use crate::domain::value_objects::ResourcePath;

/// Format operation errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("cannot parse {path}: {message}")]
    Decode { path: ResourcePath, message: String },

    #[error("cannot encode {name}: {message}")]
    Encode { name: String, message: String },

    #[error("format expects a {expected} artifact, got {found}")]
    WrongType { expected: String, found: String },
}

/// Parser/builder for one artifact format
pub trait Format: Send + Sync {
    /// Short name used in logs (`toml`, `json`, ...)
    fn name(&self) -> &str;

    /// Decode a resource into an artifact. `path` names the artifact.
    fn parse(&self, path: &ResourcePath, bytes: &[u8]) -> Result<Arc<dyn Artifact>, FormatError>;

    /// Encode an artifact back into bytes
    fn build(&self, artifact: &dyn Artifact) -> Result<Vec<u8>, FormatError>;
}
