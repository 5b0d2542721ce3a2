//! Domain Entities
//!
//! Artifacts, links, resources and the input snapshots tools work on.

pub mod artifact;
pub mod document;
pub mod input;
pub mod resource;

pub use artifact::{Artifact, ArtifactType, FullyQualifiedName, Link};
pub use document::Document;
pub use input::{Input, ResolvedArtifact, ResolvedInputs};
pub use resource::Resource;
