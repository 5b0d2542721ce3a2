//! Decision record artifact
//!
//! A decision lives in a TOML file below the decisions root:
//!
//! ```toml
//! title = "Use PostgreSQL for persistence"
//! status = "accepted"
//! context = "We need transactions."
//! decision = "Adopt PostgreSQL 16."
//! supersedes = ["0001"]
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{ArtifactType, Document, Input, Link};
use crate::domain::value_objects::Glob;
use crate::infrastructure::formats::TomlFormat;

pub const DECISION: ArtifactType = ArtifactType::new("decision");

/// File extension of decision records
pub const DECISION_EXTENSION: &str = "decision";

/// Lifecycle state of a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Proposed,
    Accepted,
    Superseded,
    Deprecated,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Proposed => "proposed",
            Status::Accepted => "accepted",
            Status::Superseded => "superseded",
            Status::Deprecated => "deprecated",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionBody {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supersedes: Vec<Link>,
}

impl DecisionBody {
    /// Placeholder written when a missing decision is created
    pub fn stub(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

pub type Decision = Document<DecisionBody>;

/// Input covering every decision below `root`
pub fn decisions_input(root: &str) -> Input {
    Input::new(
        "decisions",
        DECISION,
        Glob::new(root, &format!("**/*.{DECISION_EXTENSION}")),
        TomlFormat::<DecisionBody>::shared(DECISION, root),
    )
}
