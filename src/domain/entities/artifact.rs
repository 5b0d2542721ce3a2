//! Artifact Entity
//!
//! An artifact is a named, typed, package-scoped value parsed from a
//! resource. Artifacts are never stored: they are rebuilt from their resource
//! each time a pipeline pass needs them.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ResourcePath;

/// Tag naming a concrete artifact kind (`decision`, `usecase`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactType(&'static str);

impl ArtifactType {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Package plus name; the identity of an artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FullyQualifiedName {
    pub package: String,
    pub name: String,
}

impl FullyQualifiedName {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }

    /// Split a dotted name: everything before the last dot is the package
    pub fn parse(dotted: &str) -> Self {
        match dotted.rsplit_once('.') {
            Some((package, name)) => Self::new(package, name),
            None => Self::new("", dotted),
        }
    }

    /// Derive a name from a resource path below `root`:
    /// directories become the dotted package, the file stem becomes the name.
    pub fn from_path(path: &ResourcePath, root: &ResourcePath) -> Self {
        let package = path
            .parent()
            .and_then(|parent| parent.strip_prefix(root).map(|rest| rest.replace('/', ".")))
            .unwrap_or_default();
        Self::new(package, path.stem())
    }

    /// True if `id` names this artifact, either fully qualified or by bare name
    pub fn is_named(&self, id: &str) -> bool {
        id == self.name || id == self.to_string()
    }
}

impl fmt::Display for FullyQualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.package.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.package, self.name)
        }
    }
}

/// A parsed artifact
pub trait Artifact: Any + Send + Sync + fmt::Debug {
    fn fully_qualified_name(&self) -> &FullyQualifiedName;

    fn artifact_type(&self) -> ArtifactType;

    fn as_any(&self) -> &dyn Any;
}

impl dyn Artifact {
    /// Typed view of an artifact
    pub fn downcast_ref<T: Artifact>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Typed, possibly attributed reference from one artifact to another.
///
/// Links are resolved lazily by id against a `ResolvedInputs` snapshot.
/// In documents a link may be written as a bare id string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LinkRepr")]
pub struct Link {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
    pub id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Vec<Link>>,
}

impl Link {
    pub fn to(id: impl Into<String>) -> Self {
        Self {
            link_type: None,
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn typed(link_type: ArtifactType, id: impl Into<String>) -> Self {
        Self {
            link_type: Some(link_type.name().to_string()),
            ..Self::to(id)
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, links: Vec<Link>) -> Self {
        self.attributes.insert(name.into(), links);
        self
    }

    /// True if this link points at `artifact`
    pub fn points_to(&self, artifact: &dyn Artifact) -> bool {
        let type_ok = self
            .link_type
            .as_deref()
            .map_or(true, |t| t == artifact.artifact_type().name());
        type_ok && artifact.fully_qualified_name().is_named(&self.id)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LinkRepr {
    Id(String),
    Full {
        #[serde(rename = "type", default)]
        link_type: Option<String>,
        id: String,
        #[serde(default)]
        attributes: BTreeMap<String, Vec<Link>>,
    },
}

impl From<LinkRepr> for Link {
    fn from(repr: LinkRepr) -> Self {
        match repr {
            LinkRepr::Id(id) => Link::to(id),
            LinkRepr::Full {
                link_type,
                id,
                attributes,
            } => Link {
                link_type,
                id,
                attributes,
            },
        }
    }
}
