//! Domain Layer
//!
//! Pure types and the ports the rest of Blueprint plugs into.
//!
//! ## Structure
//!
//! - `entities/` - Artifacts, links, resources, tool inputs
//! - `value_objects/` - Immutable value types (ResourcePath, Glob, Diagnostic)
//! - `ports/` - Interface definitions for resource trees, formats, tools and events
//!
//! ## Design Principles
//!
//! 1. **No direct I/O** - Storage is only reached through the `ResourceTree` port
//! 2. **Tools are plugins** - What an artifact means is decided by a `Tool`, not here
//! 3. **Ports & Adapters** - Backends live in `infrastructure/`

pub mod entities;
pub mod ports;
pub mod value_objects;
