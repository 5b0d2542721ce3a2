//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Resource tree implementations (Local, Memory)
//! - `formats` - Typed TOML/JSON/YAML document formats
//! - `tools/` - Built-in decision record tools
//! - `watcher/` - File system watcher feeding the workspace
//! - `lock` - Cross-process workspace lock

pub mod formats;
pub mod fs;
pub mod lock;
pub mod tools;
pub mod watcher;

// Re-export for convenience
pub use formats::{JsonFormat, TomlFormat, YamlFormat};
pub use fs::{LocalTree, MemoryTree};
pub use lock::WorkspaceLock;
pub use tools::{builtin_registry, DecisionIndexTool, DecisionTool};
pub use watcher::WorkspaceWatcher;
