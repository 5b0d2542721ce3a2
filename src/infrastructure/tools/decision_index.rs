//! Cross-decision checks and the decision log

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::domain::entities::{Input, Resource, ResolvedInputs};
use crate::domain::ports::tool::{StandaloneTool, ToolDescriptor};
use crate::domain::value_objects::Diagnostic;
use crate::error::EngineResult;

use super::decision::{decisions_input, Decision};

const MAIN_REPORT: &str = "index.md";

/// Standalone tool looking at every decision at once
pub struct DecisionIndexTool {
    context: Vec<Input>,
}

impl DecisionIndexTool {
    pub const ID: &'static str = "decision-index";

    pub fn new(root: &str) -> Self {
        Self {
            context: vec![decisions_input(root)],
        }
    }
}

impl ToolDescriptor for DecisionIndexTool {
    fn id(&self) -> &str {
        Self::ID
    }

    fn validation_context(&self) -> &[Input] {
        &self.context
    }
}

impl StandaloneTool for DecisionIndexTool {
    fn validate(&self, inputs: &ResolvedInputs) -> Vec<Diagnostic> {
        let mut by_title: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for decision in inputs.artifacts::<Decision>("decisions") {
            let title = decision.body.title.trim();
            if title.is_empty() {
                continue;
            }
            by_title
                .entry(title.to_lowercase())
                .or_default()
                .push(decision.name().to_string());
        }
        by_title
            .into_iter()
            .filter(|(_, names)| names.len() > 1)
            .map(|(title, names)| {
                Diagnostic::warn(format!(
                    "title '{title}' is used by several decisions: {}",
                    names.join(", ")
                ))
            })
            .collect()
    }

    fn build_reports(
        &self,
        inputs: &ResolvedInputs,
        output: &Resource,
    ) -> EngineResult<Vec<Diagnostic>> {
        let mut out = String::from("# Decisions\n\n| Id | Title | Status |\n|---|---|---|\n");
        for decision in inputs.artifacts::<Decision>("decisions") {
            let _ = writeln!(
                out,
                "| {} | {} | {} |",
                decision.name(),
                decision.body.title.replace('|', "\\|"),
                decision.body.status
            );
        }
        if let Some(report) = output.select(MAIN_REPORT) {
            report.write_str(&out)?;
        }
        Ok(Vec::new())
    }

    fn main_report(&self) -> Option<&str> {
        Some(MAIN_REPORT)
    }
}
