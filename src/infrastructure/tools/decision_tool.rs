//! Decision validator and renderer

use std::fmt::Write as _;

use crate::domain::entities::{
    Artifact, Document, FullyQualifiedName, Input, Link, Resource, ResolvedArtifact,
    ResolvedInputs,
};
use crate::domain::ports::tool::{AppliedSuggestion, ArtifactTool, ToolDescriptor};
use crate::domain::value_objects::{Diagnostic, Location, ResourcePath};
use crate::error::EngineResult;

use super::decision::{decisions_input, Decision, DecisionBody, Status, DECISION, DECISION_EXTENSION};

pub const CREATE_MISSING: &str = "create-missing";

const MAIN_REPORT: &str = "index.md";

/// Artifact tool for decision records
pub struct DecisionTool {
    root: ResourcePath,
    target: Input,
    context: Vec<Input>,
}

impl DecisionTool {
    pub const ID: &'static str = "decisions";

    /// Tool for decisions stored below `root`
    pub fn new(root: &str) -> Self {
        let target = decisions_input(root);
        Self {
            root: ResourcePath::parse(root),
            context: vec![target.clone()],
            target,
        }
    }

    /// Where the decision `link` names should live.
    ///
    /// Dotted ids map to directories below the root; bare ids land next to `resource`.
    fn missing_decision_path(&self, link: &Link, resource: &Resource) -> Option<ResourcePath> {
        let fqn = FullyQualifiedName::parse(&link.id);
        if fqn.name.is_empty() {
            return None;
        }
        let file = format!("{}.{DECISION_EXTENSION}", fqn.name);
        if fqn.package.is_empty() {
            resource.select(&format!("../{file}")).map(|r| r.path().clone())
        } else {
            self.root
                .select(&format!("{}/{file}", fqn.package.replace('.', "/")))
        }
    }
}

/// Decisions whose `supersedes` list points at `decision`
fn superseded_by<'a>(
    decision: &'a Decision,
    inputs: &'a ResolvedInputs,
) -> impl Iterator<Item = &'a ResolvedArtifact> + 'a {
    inputs.get("decisions").iter().filter(move |resolved| {
        resolved
            .downcast::<Decision>()
            .is_some_and(|other| {
                other.name() != decision.name()
                    && other.body.supersedes.iter().any(|l| l.points_to(decision))
            })
    })
}

fn title_of(resolved: &ResolvedArtifact) -> String {
    match resolved.downcast::<Decision>() {
        Some(d) if !d.body.title.trim().is_empty() => d.body.title.clone(),
        _ => resolved.artifact.fully_qualified_name().to_string(),
    }
}

fn render(decision: &Decision, inputs: &ResolvedInputs) -> String {
    let body = &decision.body;
    let mut out = String::new();
    let title = if body.title.trim().is_empty() {
        decision.name().to_string()
    } else {
        body.title.clone()
    };
    let _ = writeln!(out, "# {title}\n");
    let _ = writeln!(out, "- **Id:** {}", decision.name());
    let _ = writeln!(out, "- **Status:** {}", body.status);

    for (heading, text) in [("Context", &body.context), ("Decision", &body.decision)] {
        if let Some(text) = text {
            let _ = writeln!(out, "\n## {heading}\n\n{}", text.trim_end());
        }
    }

    if !body.supersedes.is_empty() {
        let _ = writeln!(out, "\n## Supersedes\n");
        for link in &body.supersedes {
            match inputs.resolve(link) {
                Some(resolved) => {
                    let _ = writeln!(out, "- {}: {}", link.id, title_of(resolved));
                }
                None => {
                    let _ = writeln!(out, "- {} (missing)", link.id);
                }
            }
        }
    }

    let successors: Vec<_> = superseded_by(decision, inputs).collect();
    if !successors.is_empty() {
        let _ = writeln!(out, "\n## Superseded by\n");
        for resolved in successors {
            let _ = writeln!(
                out,
                "- {}: {}",
                resolved.artifact.fully_qualified_name(),
                title_of(resolved)
            );
        }
    }
    out
}

impl ToolDescriptor for DecisionTool {
    fn id(&self) -> &str {
        Self::ID
    }

    fn validation_context(&self) -> &[Input] {
        &self.context
    }
}

impl ArtifactTool for DecisionTool {
    fn validation_target(&self) -> &Input {
        &self.target
    }

    fn reporting_target(&self) -> Option<&Input> {
        Some(&self.target)
    }

    fn validate(&self, artifact: &dyn Artifact, inputs: &ResolvedInputs) -> Vec<Diagnostic> {
        let Some(decision) = artifact.downcast_ref::<Decision>() else {
            return vec![Diagnostic::error(format!(
                "expected a decision, got a {}",
                artifact.artifact_type()
            ))];
        };
        let body = &decision.body;
        let mut diagnostics = Vec::new();

        if body.title.trim().is_empty() {
            diagnostics
                .push(Diagnostic::error("decision has no title").at(Location::parse("title")));
        }

        for (i, link) in body.supersedes.iter().enumerate() {
            if inputs.resolve(link).is_none() {
                diagnostics.push(
                    Diagnostic::error(format!("superseded decision '{}' does not exist", link.id))
                        .at(Location::new(["supersedes".to_string(), i.to_string()]))
                        .with_suggestion(CREATE_MISSING, "Create the missing decision"),
                );
            }
        }

        if body.status == Status::Superseded && superseded_by(decision, inputs).next().is_none() {
            diagnostics.push(
                Diagnostic::warn("decision is marked superseded but no decision supersedes it")
                    .at(Location::parse("status")),
            );
        }
        diagnostics
    }

    fn build_reports(
        &self,
        artifact: &dyn Artifact,
        inputs: &ResolvedInputs,
        output: &Resource,
    ) -> EngineResult<Vec<Diagnostic>> {
        let Some(decision) = artifact.downcast_ref::<Decision>() else {
            return Ok(Vec::new());
        };
        if let Some(report) = output.select(MAIN_REPORT) {
            report.write_str(&render(decision, inputs))?;
        }
        Ok(Vec::new())
    }

    fn main_report(&self) -> Option<&str> {
        Some(MAIN_REPORT)
    }

    fn suggestion_codes(&self) -> &[&str] {
        &[CREATE_MISSING]
    }

    fn apply_suggestion(
        &self,
        artifact: &dyn Artifact,
        code: &str,
        location: Option<&Location>,
        inputs: &ResolvedInputs,
        resource: &Resource,
    ) -> EngineResult<AppliedSuggestion> {
        if code != CREATE_MISSING {
            return Ok(AppliedSuggestion::NoEffect);
        }
        let Some(decision) = artifact.downcast_ref::<Decision>() else {
            return Ok(AppliedSuggestion::NoEffect);
        };

        let missing: Vec<&Link> = match location.map(Location::segments) {
            Some([field, index]) if field == "supersedes" => index
                .parse::<usize>()
                .ok()
                .and_then(|i| decision.body.supersedes.get(i))
                .into_iter()
                .collect(),
            _ => decision.body.supersedes.iter().collect(),
        };

        let mut changed = Vec::new();
        for link in missing {
            if inputs.resolve(link).is_some() {
                continue;
            }
            let Some(path) = self.missing_decision_path(link, resource) else {
                continue;
            };
            let stub = Resource::new(resource.tree().clone(), path.clone());
            if stub.exists() || changed.contains(&path) {
                continue;
            }
            let document = Document::new(
                DECISION,
                FullyQualifiedName::parse(&link.id),
                DecisionBody::stub(link.id.clone()),
            );
            let bytes = self.target.format().build(&document)?;
            stub.write(&bytes)?;
            tracing::info!(path = %path, id = %link.id, "created missing decision");
            changed.push(path);
        }
        Ok(AppliedSuggestion::changed(changed))
    }
}
