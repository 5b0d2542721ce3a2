//! Resource Entity
//!
//! A `Resource` is a handle on one node of a [`ResourceTree`]: a path plus
//! the tree it lives in. Handles are cheap to clone and carry no cached
//! content; every read goes to the tree.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::ports::resource_tree::{ResourceTree, TreeResult};
use crate::domain::value_objects::{Glob, ResourcePath};

#[derive(Clone)]
pub struct Resource {
    tree: Arc<dyn ResourceTree>,
    path: ResourcePath,
}

impl Resource {
    pub fn new(tree: Arc<dyn ResourceTree>, path: ResourcePath) -> Self {
        Self { tree, path }
    }

    /// Root node of `tree`
    pub fn root(tree: Arc<dyn ResourceTree>) -> Self {
        Self::new(tree, ResourcePath::root())
    }

    pub fn path(&self) -> &ResourcePath {
        &self.path
    }

    pub fn name(&self) -> &str {
        self.path.name()
    }

    pub fn tree(&self) -> &Arc<dyn ResourceTree> {
        &self.tree
    }

    /// `None` only for the root
    pub fn parent(&self) -> Option<Resource> {
        self.path.parent().map(|p| self.at(p))
    }

    pub fn children(&self) -> TreeResult<Vec<Resource>> {
        Ok(self
            .tree
            .children(&self.path)?
            .into_iter()
            .map(|p| self.at(p))
            .collect())
    }

    /// Navigate relative to this resource; `None` if the path climbs above the root.
    ///
    /// The returned handle may point at a resource that does not exist yet.
    pub fn select(&self, relative: &str) -> Option<Resource> {
        self.path.select(relative).map(|p| self.at(p))
    }

    pub fn exists(&self) -> bool {
        self.tree.exists(&self.path)
    }

    pub fn is_dir(&self) -> bool {
        self.tree.is_dir(&self.path)
    }

    pub fn read(&self) -> TreeResult<Vec<u8>> {
        self.tree.read(&self.path)
    }

    pub fn read_to_string(&self) -> TreeResult<String> {
        self.tree.read_to_string(&self.path)
    }

    pub fn write(&self, content: &[u8]) -> TreeResult<()> {
        self.tree.write(&self.path, content)
    }

    pub fn write_str(&self, content: &str) -> TreeResult<()> {
        self.write(content.as_bytes())
    }

    /// Delete this resource and everything below it
    pub fn delete(&self) -> TreeResult<()> {
        self.tree.delete(&self.path)
    }

    pub fn last_modified_at(&self) -> TreeResult<DateTime<Utc>> {
        self.tree.last_modified(&self.path)
    }

    /// Files below this resource matching `glob`
    pub fn find(&self, glob: &Glob) -> TreeResult<Vec<Resource>> {
        Ok(self
            .tree
            .walk(&self.path)?
            .into_iter()
            .filter(|p| glob.matches(p))
            .map(|p| self.at(p))
            .collect())
    }

    fn at(&self, path: ResourcePath) -> Resource {
        Resource::new(self.tree.clone(), path)
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Resource").field(&self.path.as_str()).finish()
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tree, &other.tree) && self.path == other.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::fs::MemoryTree;

    fn tree() -> Arc<dyn ResourceTree> {
        let tree = MemoryTree::new();
        tree.write(&ResourcePath::parse("/main/Bear.mainArtifact"), b"bear")
            .unwrap();
        tree.write(&ResourcePath::parse("/main/zoo/Fox.mainArtifact"), b"fox")
            .unwrap();
        tree.write(&ResourcePath::parse("/notes.txt"), b"n").unwrap();
        Arc::new(tree)
    }

    #[test]
    fn navigation_between_parent_and_children() {
        let root = Resource::root(tree());
        assert!(root.parent().is_none());

        let names: Vec<_> = root
            .children()
            .unwrap()
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(names, vec!["main", "notes.txt"]);

        let bear = root.select("main/Bear.mainArtifact").unwrap();
        assert_eq!(bear.read_to_string().unwrap(), "bear");
        assert_eq!(bear.parent().unwrap().path().as_str(), "/main");
    }

    #[test]
    fn select_above_root_is_none() {
        let main = Resource::root(tree()).select("main").unwrap();
        assert!(main.select("../..").is_none());
        assert!(main.select("..").is_some());
    }

    #[test]
    fn find_filters_by_glob() {
        let root = Resource::root(tree());
        let found = root
            .find(&Glob::new("main", "**/*.mainArtifact"))
            .unwrap();
        let paths: Vec<_> = found.iter().map(|r| r.path().to_string()).collect();
        assert_eq!(
            paths,
            vec!["/main/Bear.mainArtifact", "/main/zoo/Fox.mainArtifact"]
        );
    }

    #[test]
    fn delete_removes_subtree() {
        let root = Resource::root(tree());
        root.select("main").unwrap().delete().unwrap();
        assert!(!root.select("main/Bear.mainArtifact").unwrap().exists());
        assert!(root.select("notes.txt").unwrap().exists());
    }
}
