//! Glob Value Object
//!
//! A `(path, pattern)` pair recognizing which resources belong to an artifact
//! type. The pattern is compiled once into an anchored regular expression:
//! `**/` matches any number of directories (including none), `**` matches
//! anything, `*` and `?` stay within one path segment.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use regex::Regex;

use super::ResourcePath;

/// Path-prefix plus pattern rule
#[derive(Clone)]
pub struct Glob {
    path: String,
    pattern: String,
    root: ResourcePath,
    regex: Option<Regex>,
}

impl Glob {
    /// Create a glob rooted at `path` (may be empty) matching `pattern`
    pub fn new(path: &str, pattern: &str) -> Self {
        let root = ResourcePath::parse(path);
        let regex = match Regex::new(&translate(pattern)) {
            Ok(regex) => Some(regex),
            Err(err) => {
                tracing::warn!(pattern, error = %err, "glob pattern does not compile; it will match nothing");
                None
            }
        };
        Self {
            path: root.relative().to_string(),
            pattern: pattern.to_string(),
            root,
            regex,
        }
    }

    /// Glob matching `pattern` anywhere in the tree
    pub fn anywhere(pattern: &str) -> Self {
        Self::new("", pattern)
    }

    /// Subtree root, relative, possibly empty
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Subtree root as a resource path
    pub fn root(&self) -> &ResourcePath {
        &self.root
    }

    /// True iff `path` lies under the glob root and the remainder matches the pattern.
    pub fn matches(&self, path: &ResourcePath) -> bool {
        let Some(regex) = &self.regex else {
            return false;
        };
        match path.strip_prefix(&self.root) {
            Some(rest) if !rest.is_empty() => regex.is_match(rest),
            _ => false,
        }
    }

    /// Extension named by the pattern's last segment, e.g. `decision` for `**/*.decision`
    pub fn extension(&self) -> Option<&str> {
        let last = self.pattern.rsplit('/').next().unwrap_or("");
        let idx = last.rfind('.')?;
        let ext = &last[idx + 1..];
        if ext.is_empty() || ext.contains(['*', '?']) {
            None
        } else {
            Some(ext)
        }
    }
}

/// Translate a glob pattern into an anchored regex source
fn translate(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2 + 2);
    out.push('^');
    let chars: Vec<char> = pattern.trim_start_matches('/').chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                if chars.get(i + 2) == Some(&'/') {
                    out.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    out.push_str(".*");
                    i += 2;
                }
            }
            '*' => {
                out.push_str("[^/]*");
                i += 1;
            }
            '?' => {
                out.push_str("[^/]");
                i += 1;
            }
            c => {
                let mut buf = [0u8; 4];
                out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
                i += 1;
            }
        }
    }
    out.push('$');
    out
}

impl PartialEq for Glob {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.pattern == other.pattern
    }
}

impl Eq for Glob {}

impl Hash for Glob {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
        self.pattern.hash(state);
    }
}

impl PartialOrd for Glob {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Glob {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.path, &self.pattern).cmp(&(&other.path, &other.pattern))
    }
}

impl fmt::Debug for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Glob")
            .field("path", &self.path)
            .field("pattern", &self.pattern)
            .finish()
    }
}

impl fmt::Display for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.pattern)
        } else {
            write!(f, "{}/{}", self.path, self.pattern)
        }
    }
}
