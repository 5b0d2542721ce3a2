//! Resource Tree Implementations
//!
//! Concrete implementations of the ResourceTree port.

mod local;
mod memory;

pub use local::LocalTree;
pub use memory::MemoryTree;
