//! Discovery scopes.
//!
//! Concrete [`DiscoveryScope`](provscope_api::DiscoveryScope) implementations:
//! - [`MemoryScope`] - resources held in memory
//! - [`DirectoryScope`] - an exploded class-path directory
//! - [`JarScope`] - a JAR/ZIP archive
//! - [`ClassPath`] - an ordered chain of the above with an optional parent
//!
//! ## Resolution order
//!
//! ```text
//! ClassPath.resources(name)
//!     │
//!     ├── parent.resources(name)      ← installed providers first
//!     │
//!     └── entries[0..n].resources(name)
//! ```

pub mod classpath;
pub mod dir;
pub mod jar;
pub mod memory;

pub use classpath::ClassPath;
pub use dir::{DirectoryScope, FileResource};
pub use jar::{JarEntryResource, JarScope};
pub use memory::{MemoryResource, MemoryScope};
