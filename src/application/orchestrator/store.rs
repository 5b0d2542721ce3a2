//! Diagnostics and report persistence
//!
//! ```text
//! diagnostics<artifact path>/<tool id>.json
//! reports<artifact path>/<tool id>/...
//! ```
//!
//! Standalone tools have no target resource and use the root mirror
//! (`diagnostics/<tool id>.json`, `reports/<tool id>/`).

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Resource;
use crate::domain::ports::resource_tree::ResourceTree;
use crate::domain::value_objects::{Diagnostic, DiagnosticsDocument, ResourcePath};
use crate::error::EngineResult;

const DIAGNOSTICS_DIR: &str = "diagnostics";
const REPORTS_DIR: &str = "reports";
const DIAGNOSTICS_EXT: &str = "json";

/// A stored diagnostic with the resource and tool it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedDiagnostic {
    pub path: ResourcePath,
    pub tool: String,
    #[serde(flatten)]
    pub diagnostic: Diagnostic,
}

#[derive(Clone)]
pub struct DiagnosticsStore {
    tree: Arc<dyn ResourceTree>,
    root: ResourcePath,
}

impl DiagnosticsStore {
    pub fn new(tree: Arc<dyn ResourceTree>, internal_root: &ResourcePath) -> Self {
        Self {
            tree,
            root: internal_root.join(DIAGNOSTICS_DIR),
        }
    }

    fn mirror(&self, path: &ResourcePath) -> ResourcePath {
        path.rebase(&self.root)
    }

    /// File holding the diagnostics of `tool` for `path`
    pub fn file_for(&self, path: &ResourcePath, tool: &str) -> ResourcePath {
        self.mirror(path)
            .join(&format!("{tool}.{DIAGNOSTICS_EXT}"))
    }

    /// Overwrite the diagnostics of `(path, tool)`
    pub fn save(&self, path: &ResourcePath, tool: &str, diagnostics: &[Diagnostic]) -> EngineResult<()> {
        let document = DiagnosticsDocument::new(diagnostics.to_vec());
        let mut bytes = serde_json::to_vec_pretty(&document)?;
        bytes.push(b'\n');
        self.tree.write(&self.file_for(path, tool), &bytes)?;
        Ok(())
    }

    /// Append to the diagnostics of `(path, tool)`
    pub fn append(&self, path: &ResourcePath, tool: &str, diagnostics: &[Diagnostic]) -> EngineResult<()> {
        let mut existing = self.load(path, tool);
        existing.extend_from_slice(diagnostics);
        self.save(path, tool, &existing)
    }

    /// Diagnostics of `(path, tool)`; empty if missing or unreadable
    pub fn load(&self, path: &ResourcePath, tool: &str) -> Vec<Diagnostic> {
        self.read_document(&self.file_for(path, tool))
    }

    pub fn remove_tool(&self, path: &ResourcePath, tool: &str) -> EngineResult<()> {
        self.tree.delete(&self.file_for(path, tool))?;
        Ok(())
    }

    /// Remove the diagnostics of every tool for `path`
    pub fn remove_all(&self, path: &ResourcePath) -> EngineResult<()> {
        for file in self.files_of(path)? {
            self.tree.delete(&file)?;
        }
        Ok(())
    }

    /// Merge of every tool's diagnostics for `path`, in tool id order
    pub fn for_path(&self, path: &ResourcePath) -> EngineResult<Vec<Diagnostic>> {
        let mut merged = Vec::new();
        for file in self.files_of(path)? {
            merged.extend(self.read_document(&file));
        }
        Ok(merged)
    }

    /// Every stored diagnostic in the workspace, in storage order
    pub fn all(&self) -> EngineResult<Vec<ReportedDiagnostic>> {
        let mut all = Vec::new();
        for file in self.tree.walk(&self.root)? {
            if file.extension() != Some(DIAGNOSTICS_EXT) {
                continue;
            }
            let Some(mirror) = file.parent() else { continue };
            let Some(relative) = mirror.strip_prefix(&self.root) else {
                continue;
            };
            let path = ResourcePath::parse(relative);
            let tool = file.stem().to_string();
            all.extend(self.read_document(&file).into_iter().map(|diagnostic| {
                ReportedDiagnostic {
                    path: path.clone(),
                    tool: tool.clone(),
                    diagnostic,
                }
            }));
        }
        Ok(all)
    }

    /// Resources that have at least one diagnostics file
    pub fn paths(&self) -> EngineResult<BTreeSet<ResourcePath>> {
        Ok(self
            .tree
            .walk(&self.root)?
            .into_iter()
            .filter(|file| file.extension() == Some(DIAGNOSTICS_EXT))
            .filter_map(|file| {
                let mirror = file.parent()?;
                mirror.strip_prefix(&self.root).map(ResourcePath::parse)
            })
            .collect())
    }

    /// Newest modification time across the diagnostics files of `path`
    pub fn newest_timestamp(&self, path: &ResourcePath) -> EngineResult<Option<DateTime<Utc>>> {
        let mut newest = None;
        for file in self.files_of(path)? {
            let modified = self.tree.last_modified(&file)?;
            newest = newest.max(Some(modified));
        }
        Ok(newest)
    }

    /// Diagnostics files directly in the mirror of `path`
    fn files_of(&self, path: &ResourcePath) -> EngineResult<Vec<ResourcePath>> {
        let mirror = self.mirror(path);
        Ok(self
            .tree
            .children(&mirror)?
            .into_iter()
            .filter(|child| child.extension() == Some(DIAGNOSTICS_EXT) && !self.tree.is_dir(child))
            .collect())
    }

    fn read_document(&self, file: &ResourcePath) -> Vec<Diagnostic> {
        let bytes = match self.tree.read(file) {
            Ok(bytes) => bytes,
            Err(e) if e.is_not_found() => return Vec::new(),
            Err(e) => {
                tracing::warn!(file = %file, error = %e, "unreadable diagnostics file");
                return Vec::new();
            }
        };
        match serde_json::from_slice::<DiagnosticsDocument>(&bytes) {
            Ok(document) => document.diagnostics,
            Err(e) => {
                tracing::warn!(file = %file, error = %e, "corrupt diagnostics file ignored");
                Vec::new()
            }
        }
    }
}

#[derive(Clone)]
pub struct ReportStore {
    tree: Arc<dyn ResourceTree>,
    root: ResourcePath,
}

impl ReportStore {
    pub fn new(tree: Arc<dyn ResourceTree>, internal_root: &ResourcePath) -> Self {
        Self {
            tree,
            root: internal_root.join(REPORTS_DIR),
        }
    }

    /// Output directory of `tool` for `path`
    pub fn dir_for(&self, path: &ResourcePath, tool: &str) -> ResourcePath {
        path.rebase(&self.root).join(tool)
    }

    /// Output resource handed to a tool's build
    pub fn output_for(&self, path: &ResourcePath, tool: &str) -> Resource {
        Resource::new(self.tree.clone(), self.dir_for(path, tool))
    }

    /// Delete every report generated for artifact `path`
    pub fn clear(&self, path: &ResourcePath) -> EngineResult<()> {
        if path.is_root() {
            return Ok(());
        }
        self.tree.delete(&path.rebase(&self.root))?;
        Ok(())
    }

    pub fn clear_tool(&self, path: &ResourcePath, tool: &str) -> EngineResult<()> {
        self.tree.delete(&self.dir_for(path, tool))?;
        Ok(())
    }

    /// Report resources generated for artifact `path`
    pub fn list(&self, path: &ResourcePath) -> EngineResult<Vec<ResourcePath>> {
        if path.is_root() {
            return Ok(Vec::new());
        }
        Ok(self.tree.walk(&path.rebase(&self.root))?)
    }

    /// Report resources generated by `tool` for `path`
    pub fn list_tool(&self, path: &ResourcePath, tool: &str) -> EngineResult<Vec<ResourcePath>> {
        Ok(self.tree.walk(&self.dir_for(path, tool))?)
    }

    /// `name` inside the output of `tool` for `path`, if it was generated
    pub fn existing(&self, path: &ResourcePath, tool: &str, name: &str) -> Option<ResourcePath> {
        let report = self.dir_for(path, tool).select(name)?;
        (self.tree.exists(&report) && !self.tree.is_dir(&report)).then_some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::fs::MemoryTree;

    fn p(s: &str) -> ResourcePath {
        ResourcePath::parse(s)
    }

    fn stores() -> (Arc<MemoryTree>, DiagnosticsStore, ReportStore) {
        let tree = Arc::new(MemoryTree::new());
        let internal = p("/.internal");
        (
            tree.clone(),
            DiagnosticsStore::new(tree.clone(), &internal),
            ReportStore::new(tree, &internal),
        )
    }

    #[test]
    fn save_uses_the_documented_layout() {
        let (tree, diagnostics, _) = stores();
        let bear = p("/main/Bear.mainArtifact");
        diagnostics
            .save(&bear, "main", &[Diagnostic::error("broken")])
            .unwrap();
        let text = tree
            .read_to_string(&p("/.internal/diagnostics/main/Bear.mainArtifact/main.json"))
            .unwrap();
        assert!(text.contains("\"level\": \"ERROR\""));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn for_path_merges_tools_in_id_order() {
        let (_, diagnostics, _) = stores();
        let bear = p("/main/Bear.mainArtifact");
        diagnostics.save(&bear, "zeta", &[Diagnostic::warn("z")]).unwrap();
        diagnostics.save(&bear, "alpha", &[Diagnostic::info("a")]).unwrap();
        let merged: Vec<_> = diagnostics
            .for_path(&bear)
            .unwrap()
            .into_iter()
            .map(|d| d.message)
            .collect();
        assert_eq!(merged, vec!["a", "z"]);
    }

    #[test]
    fn root_mirror_does_not_swallow_artifact_diagnostics() {
        let (_, diagnostics, _) = stores();
        diagnostics
            .save(&ResourcePath::root(), "index", &[Diagnostic::warn("dup")])
            .unwrap();
        diagnostics
            .save(&p("/main/Bear.mainArtifact"), "main", &[Diagnostic::error("x")])
            .unwrap();

        assert_eq!(diagnostics.for_path(&ResourcePath::root()).unwrap().len(), 1);
        diagnostics.remove_all(&ResourcePath::root()).unwrap();
        assert_eq!(
            diagnostics.for_path(&p("/main/Bear.mainArtifact")).unwrap().len(),
            1
        );
    }

    #[test]
    fn all_reports_path_and_tool() {
        let (_, diagnostics, _) = stores();
        diagnostics
            .save(&p("/main/Bear.mainArtifact"), "main", &[Diagnostic::error("x")])
            .unwrap();
        diagnostics
            .save(&ResourcePath::root(), "index", &[Diagnostic::warn("y")])
            .unwrap();
        let all = diagnostics.all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].path, ResourcePath::root());
        assert_eq!(all[0].tool, "index");
        assert_eq!(all[1].path, p("/main/Bear.mainArtifact"));
        assert_eq!(all[1].tool, "main");
    }

    #[test]
    fn corrupt_documents_read_as_empty() {
        let (tree, diagnostics, _) = stores();
        let bear = p("/main/Bear.mainArtifact");
        tree.write(&diagnostics.file_for(&bear, "main"), b"{ nope").unwrap();
        assert!(diagnostics.for_path(&bear).unwrap().is_empty());
        assert!(diagnostics.newest_timestamp(&bear).unwrap().is_some());
    }

    #[test]
    fn append_keeps_existing_entries() {
        let (_, diagnostics, _) = stores();
        let bear = p("/main/Bear.mainArtifact");
        diagnostics.save(&bear, "main", &[Diagnostic::warn("a")]).unwrap();
        diagnostics.append(&bear, "main", &[Diagnostic::info("b")]).unwrap();
        assert_eq!(diagnostics.load(&bear, "main").len(), 2);
    }

    #[test]
    fn newest_timestamp_is_none_without_diagnostics() {
        let (_, diagnostics, _) = stores();
        assert_eq!(
            diagnostics
                .newest_timestamp(&p("/main/Bear.mainArtifact"))
                .unwrap(),
            None
        );
    }

    #[test]
    fn reports_are_namespaced_by_tool_and_cleared_per_path() {
        let (tree, _, reports) = stores();
        let bear = p("/main/Bear.mainArtifact");
        reports
            .output_for(&bear, "main")
            .select("summary.txt")
            .unwrap()
            .write_str("x")
            .unwrap();
        reports
            .output_for(&bear, "docs")
            .select("page/index.md")
            .unwrap()
            .write_str("y")
            .unwrap();
        assert_eq!(
            reports.list(&bear).unwrap(),
            vec![
                p("/.internal/reports/main/Bear.mainArtifact/docs/page/index.md"),
                p("/.internal/reports/main/Bear.mainArtifact/main/summary.txt"),
            ]
        );
        assert!(reports.existing(&bear, "main", "summary.txt").is_some());
        assert!(reports.existing(&bear, "main", "missing.txt").is_none());

        reports.clear(&bear).unwrap();
        assert!(reports.list(&bear).unwrap().is_empty());
        assert!(!tree.exists(&p("/.internal/reports/main")));
    }
}
