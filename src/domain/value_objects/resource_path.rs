//! Resource Path Value Object
//!
//! A normalized, slash-separated path inside a resource tree:
//! - Always absolute (`/` is the root)
//! - No empty, `.` or `..` segments
//! - No trailing slash (except the root itself)
//!
//! Navigation with `..` only happens through [`ResourcePath::select`], which
//! refuses to climb above the root.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized path of a resource within a tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ResourcePath(String);

impl ResourcePath {
    /// The root path `/`
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Parse a path string.
    ///
    /// Empty, `.` and `..` segments are dropped rather than navigated, so the
    /// result always stays inside the tree. Use [`select`](Self::select) for
    /// relative navigation.
    pub fn parse(raw: &str) -> Self {
        let segments: Vec<&str> = raw
            .split(['/', '\\'])
            .filter(|s| !s.is_empty() && *s != "." && *s != "..")
            .collect();
        Self::from_segments(&segments)
    }

    fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        if segments.is_empty() {
            return Self::root();
        }
        let mut path = String::new();
        for segment in segments {
            path.push('/');
            path.push_str(segment.as_ref());
        }
        Self(path)
    }

    /// Full path string, starting with `/`
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path without the leading slash (empty for the root)
    pub fn relative(&self) -> &str {
        &self.0[1..]
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Last segment; empty for the root
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or("")
    }

    /// File name without its extension
    pub fn stem(&self) -> &str {
        let name = self.name();
        match name.rfind('.') {
            Some(0) | None => name,
            Some(idx) => &name[..idx],
        }
    }

    /// Extension of the last segment, if any
    pub fn extension(&self) -> Option<&str> {
        let name = self.name();
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.relative().split('/').filter(|s| !s.is_empty())
    }

    /// Parent path; `None` only for the root
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) | None => Some(Self::root()),
            Some(idx) => Some(Self(self.0[..idx].to_string())),
        }
    }

    /// Append a relative path. Dot segments are dropped, as in [`parse`](Self::parse).
    pub fn join(&self, relative: &str) -> Self {
        let segments: Vec<&str> = self
            .segments()
            .chain(
                relative
                    .split(['/', '\\'])
                    .filter(|s| !s.is_empty() && *s != "." && *s != ".."),
            )
            .collect();
        Self::from_segments(&segments)
    }

    /// Navigate relative to this path.
    ///
    /// A leading `/` starts from the root. `..` moves up one level; climbing
    /// above the root yields `None`, never a path outside the tree.
    pub fn select(&self, relative: &str) -> Option<Self> {
        let mut segments: Vec<&str> = if relative.starts_with('/') {
            Vec::new()
        } else {
            self.segments().collect()
        };
        for segment in relative.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop()?;
                }
                other => segments.push(other),
            }
        }
        Some(Self::from_segments(&segments))
    }

    /// True if `self` equals `ancestor` or lies somewhere below it
    pub fn is_under(&self, ancestor: &ResourcePath) -> bool {
        if ancestor.is_root() || self == ancestor {
            return true;
        }
        self.0.len() > ancestor.0.len()
            && self.0.starts_with(&ancestor.0)
            && self.0.as_bytes()[ancestor.0.len()] == b'/'
    }

    /// Remainder of `self` below `ancestor`, without a leading slash
    pub fn strip_prefix(&self, ancestor: &ResourcePath) -> Option<&str> {
        if !self.is_under(ancestor) {
            return None;
        }
        if ancestor.is_root() {
            return Some(self.relative());
        }
        Some(self.0[ancestor.0.len()..].trim_start_matches('/'))
    }

    /// Re-root `self` below `base`: `/a/b` rebased on `/x` is `/x/a/b`
    pub fn rebase(&self, base: &ResourcePath) -> Self {
        base.join(self.relative())
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourcePath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for ResourcePath {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<ResourcePath> for String {
    fn from(p: ResourcePath) -> Self {
        p.0
    }
}

impl AsRef<str> for ResourcePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
