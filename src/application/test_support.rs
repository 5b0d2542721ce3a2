//! Counting fake tools shared by application tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Artifact, ArtifactType, Document, Input, Link, Resource, ResolvedInputs};
use crate::domain::ports::engine_events::{EngineEvent, EngineEventSink};
use crate::domain::ports::tool::{AppliedSuggestion, ArtifactTool, StandaloneTool, ToolDescriptor};
use crate::domain::value_objects::{Diagnostic, Glob, Location};
use crate::error::EngineResult;
use crate::infrastructure::formats::TomlFormat;

pub const MAIN: ArtifactType = ArtifactType::new("mainArtifact");
pub const OTHER: ArtifactType = ArtifactType::new("otherArtifact");

/// Body of both test artifact types
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(default)]
    pub refs: Vec<Link>,
    #[serde(default)]
    pub invalid: bool,
}

pub type SampleDoc = Document<Sample>;

pub fn main_input() -> Input {
    Input::new(
        "main",
        MAIN,
        Glob::new("main", "**/*.mainArtifact"),
        TomlFormat::<Sample>::shared(MAIN, "main"),
    )
}

pub fn other_input() -> Input {
    Input::new(
        "other",
        OTHER,
        Glob::new("other", "**/*.otherArtifact"),
        TomlFormat::<Sample>::shared(OTHER, "other"),
    )
}

/// What `apply_suggestion` does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fix {
    /// Create the artifact a dangling ref points at
    CreateMissing,
    /// Never recognizes any code
    Ignore,
}

/// Artifact tool counting every call it receives.
///
/// Reports `invalid = true` as an ERROR and every unresolved ref as an
/// ERROR carrying a `create-missing` suggestion.
pub struct CountingTool {
    id: String,
    target: Input,
    context: Vec<Input>,
    reporting: Option<Input>,
    fix: Fix,
    pub validated: AtomicUsize,
    pub built: AtomicUsize,
    pub applied: AtomicUsize,
}

impl CountingTool {
    fn new(id: &str, target: Input, context: Vec<Input>) -> Self {
        Self {
            id: id.to_string(),
            reporting: Some(target.clone()),
            target,
            context,
            fix: Fix::CreateMissing,
            validated: AtomicUsize::new(0),
            built: AtomicUsize::new(0),
            applied: AtomicUsize::new(0),
        }
    }

    /// Validates and reports on `mainArtifact`, reading only `mainArtifact`
    pub fn main() -> Self {
        Self::new("main", main_input(), vec![main_input()])
    }

    /// Validates and reports on `otherArtifact`, also reading `mainArtifact`
    pub fn other() -> Self {
        Self::new("other", other_input(), vec![main_input(), other_input()])
    }

    /// Like [`main`](Self::main) under another id
    pub fn with_id(id: &str) -> Self {
        Self::new(id, main_input(), vec![main_input()])
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = fix;
        self
    }

    pub fn without_reports(mut self) -> Self {
        self.reporting = None;
        self
    }

    pub fn validated(&self) -> usize {
        self.validated.load(Ordering::SeqCst)
    }

    pub fn built(&self) -> usize {
        self.built.load(Ordering::SeqCst)
    }

    pub fn applied(&self) -> usize {
        self.applied.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.validated.store(0, Ordering::SeqCst);
        self.built.store(0, Ordering::SeqCst);
        self.applied.store(0, Ordering::SeqCst);
    }
}

impl ToolDescriptor for CountingTool {
    fn id(&self) -> &str {
        &self.id
    }

    fn validation_context(&self) -> &[Input] {
        &self.context
    }
}

impl ArtifactTool for CountingTool {
    fn validation_target(&self) -> &Input {
        &self.target
    }

    fn reporting_target(&self) -> Option<&Input> {
        self.reporting.as_ref()
    }

    fn validate(&self, artifact: &dyn Artifact, inputs: &ResolvedInputs) -> Vec<Diagnostic> {
        self.validated.fetch_add(1, Ordering::SeqCst);
        let Some(doc) = artifact.downcast_ref::<SampleDoc>() else {
            return vec![Diagnostic::error("unexpected artifact")];
        };
        let mut diagnostics = Vec::new();
        if doc.body.invalid {
            diagnostics.push(Diagnostic::error("marked invalid").at(Location::parse("invalid")));
        }
        for (i, link) in doc.body.refs.iter().enumerate() {
            if inputs.resolve(link).is_none() {
                diagnostics.push(
                    Diagnostic::error(format!("unknown ref '{}'", link.id))
                        .at(Location::new(["refs".to_string(), i.to_string()]))
                        .with_suggestion("create-missing", "Create the missing artifact"),
                );
            }
        }
        diagnostics
    }

    fn build_reports(
        &self,
        artifact: &dyn Artifact,
        inputs: &ResolvedInputs,
        output: &Resource,
    ) -> EngineResult<Vec<Diagnostic>> {
        self.built.fetch_add(1, Ordering::SeqCst);
        let summary = format!(
            "{} ({} known)\n",
            artifact.fully_qualified_name(),
            inputs.len()
        );
        if let Some(report) = output.select("summary.txt") {
            report.write_str(&summary)?;
        }
        Ok(Vec::new())
    }

    fn main_report(&self) -> Option<&str> {
        Some("summary.txt")
    }

    fn suggestion_codes(&self) -> &[&str] {
        match self.fix {
            Fix::CreateMissing => &["create-missing"],
            Fix::Ignore => &[],
        }
    }

    fn apply_suggestion(
        &self,
        artifact: &dyn Artifact,
        code: &str,
        location: Option<&Location>,
        _inputs: &ResolvedInputs,
        resource: &Resource,
    ) -> EngineResult<AppliedSuggestion> {
        self.applied.fetch_add(1, Ordering::SeqCst);
        if self.fix != Fix::CreateMissing || code != "create-missing" {
            return Ok(AppliedSuggestion::NoEffect);
        }
        let Some(doc) = artifact.downcast_ref::<SampleDoc>() else {
            return Ok(AppliedSuggestion::NoEffect);
        };
        let index = location
            .and_then(|l| l.segments().get(1))
            .and_then(|i| i.parse::<usize>().ok())
            .unwrap_or(0);
        let Some(link) = doc.body.refs.get(index) else {
            return Ok(AppliedSuggestion::NoEffect);
        };
        let Some(created) = resource.select(&format!("../{}.mainArtifact", link.id)) else {
            return Ok(AppliedSuggestion::NoEffect);
        };
        created.write_str("refs = []\n")?;
        Ok(AppliedSuggestion::changed(vec![created.path().clone()]))
    }
}

/// Standalone tool reading every `mainArtifact`
pub struct IndexTool {
    context: Vec<Input>,
    pub validated: AtomicUsize,
    pub built: AtomicUsize,
}

impl IndexTool {
    pub fn new() -> Self {
        Self {
            context: vec![main_input()],
            validated: AtomicUsize::new(0),
            built: AtomicUsize::new(0),
        }
    }

    pub fn validated(&self) -> usize {
        self.validated.load(Ordering::SeqCst)
    }

    pub fn built(&self) -> usize {
        self.built.load(Ordering::SeqCst)
    }
}

impl ToolDescriptor for IndexTool {
    fn id(&self) -> &str {
        "index"
    }

    fn validation_context(&self) -> &[Input] {
        &self.context
    }
}

impl StandaloneTool for IndexTool {
    fn validate(&self, inputs: &ResolvedInputs) -> Vec<Diagnostic> {
        self.validated.fetch_add(1, Ordering::SeqCst);
        if inputs.get("main").is_empty() {
            vec![Diagnostic::warn("no main artifacts")]
        } else {
            Vec::new()
        }
    }

    fn build_reports(
        &self,
        inputs: &ResolvedInputs,
        output: &Resource,
    ) -> EngineResult<Vec<Diagnostic>> {
        self.built.fetch_add(1, Ordering::SeqCst);
        let mut listing = String::new();
        for resolved in inputs.get("main") {
            listing.push_str(resolved.path.as_str());
            listing.push('\n');
        }
        if let Some(report) = output.select("index.txt") {
            report.write_str(&listing)?;
        }
        Ok(Vec::new())
    }

    fn main_report(&self) -> Option<&str> {
        Some("index.txt")
    }
}

/// Event sink remembering everything it receives
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingSink {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl EngineEventSink for RecordingSink {
    fn on_event(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}
