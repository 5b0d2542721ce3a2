//! Typed document formats
//!
//! Each format decodes bytes straight into a concrete body type `B` and wraps
//! it in a [`Document<B>`]. The artifact name comes from the resource path
//! relative to the format's root, so `decisions/infra/0002.decision` becomes
//! `infra.0002`.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::entities::{Artifact, ArtifactType, Document, FullyQualifiedName};
use crate::domain::ports::format::{Format, FormatError};
use crate::domain::value_objects::ResourcePath;

/// Serialization backend for [`DocumentFormat`]
pub trait Codec: Send + Sync + 'static {
    const NAME: &'static str;

    fn decode<B: DeserializeOwned>(bytes: &[u8]) -> Result<B, String>;

    fn encode<B: Serialize>(body: &B) -> Result<Vec<u8>, String>;
}

/// TOML codec
pub struct Toml;

impl Codec for Toml {
    const NAME: &'static str = "toml";

    fn decode<B: DeserializeOwned>(bytes: &[u8]) -> Result<B, String> {
        let text = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;
        toml::from_str(text).map_err(|e| e.to_string())
    }

    fn encode<B: Serialize>(body: &B) -> Result<Vec<u8>, String> {
        toml::to_string_pretty(body)
            .map(String::into_bytes)
            .map_err(|e| e.to_string())
    }
}

/// JSON codec
pub struct Json;

impl Codec for Json {
    const NAME: &'static str = "json";

    fn decode<B: DeserializeOwned>(bytes: &[u8]) -> Result<B, String> {
        serde_json::from_slice(bytes).map_err(|e| e.to_string())
    }

    fn encode<B: Serialize>(body: &B) -> Result<Vec<u8>, String> {
        let mut out = serde_json::to_vec_pretty(body).map_err(|e| e.to_string())?;
        out.push(b'\n');
        Ok(out)
    }
}

/// YAML codec
pub struct Yaml;

impl Codec for Yaml {
    const NAME: &'static str = "yaml";

    fn decode<B: DeserializeOwned>(bytes: &[u8]) -> Result<B, String> {
        serde_yaml_ng::from_slice(bytes).map_err(|e| e.to_string())
    }

    fn encode<B: Serialize>(body: &B) -> Result<Vec<u8>, String> {
        serde_yaml_ng::to_string(body)
            .map(String::into_bytes)
            .map_err(|e| e.to_string())
    }
}

/// Format decoding `Document<B>` artifacts with codec `C`
pub struct DocumentFormat<B, C> {
    artifact_type: ArtifactType,
    root: ResourcePath,
    _marker: PhantomData<fn() -> (B, C)>,
}

pub type TomlFormat<B> = DocumentFormat<B, Toml>;
pub type JsonFormat<B> = DocumentFormat<B, Json>;
pub type YamlFormat<B> = DocumentFormat<B, Yaml>;

impl<B, C> DocumentFormat<B, C>
where
    B: Serialize + DeserializeOwned + fmt::Debug + Send + Sync + 'static,
    C: Codec,
{
    /// Format for artifacts of `artifact_type` stored below `root`
    pub fn new(artifact_type: ArtifactType, root: &str) -> Self {
        Self {
            artifact_type,
            root: ResourcePath::parse(root),
            _marker: PhantomData,
        }
    }

    pub fn shared(artifact_type: ArtifactType, root: &str) -> Arc<dyn Format> {
        Arc::new(Self::new(artifact_type, root))
    }

    /// Decode into the concrete document type
    pub fn decode(&self, path: &ResourcePath, bytes: &[u8]) -> Result<Document<B>, FormatError> {
        let body = C::decode::<B>(bytes).map_err(|message| FormatError::Decode {
            path: path.clone(),
            message,
        })?;
        let name = FullyQualifiedName::from_path(path, &self.root);
        Ok(Document::new(self.artifact_type, name, body))
    }
}

impl<B, C> Format for DocumentFormat<B, C>
where
    B: Serialize + DeserializeOwned + fmt::Debug + Send + Sync + 'static,
    C: Codec,
{
    fn name(&self) -> &str {
        C::NAME
    }

    fn parse(&self, path: &ResourcePath, bytes: &[u8]) -> Result<Arc<dyn Artifact>, FormatError> {
        Ok(Arc::new(self.decode(path, bytes)?))
    }

    fn build(&self, artifact: &dyn Artifact) -> Result<Vec<u8>, FormatError> {
        let document =
            artifact
                .downcast_ref::<Document<B>>()
                .ok_or_else(|| FormatError::WrongType {
                    expected: self.artifact_type.to_string(),
                    found: artifact.artifact_type().to_string(),
                })?;
        C::encode(&document.body).map_err(|message| FormatError::Encode {
            name: artifact.fully_qualified_name().to_string(),
            message,
        })
    }
}
