//! Provider discovery and lazy instantiation.
//!
//! ## Architecture
//!
//! ```text
//! ServiceLoader<S>          ← facade: cache + cursor + captured privilege
//!     │
//! CandidateCursor           ← dedup across resources, lazy per resource
//!     │
//! parser                    ← META-INF/services line format
//!     │
//! ResourceLocator           ← capability id → resources, scope order
//!     │
//! DiscoveryScope            ← MemoryScope, DirectoryScope, JarScope, ClassPath
//! ```
//!
//! Accepted names are turned into instances by the [`Instantiator`] through
//! a [`TypeResolver`](provscope_api::TypeResolver) such as [`TypeRegistry`].

pub mod cache;
pub mod config;
pub mod cursor;
pub mod instantiate;
pub mod loader;
pub mod locator;
pub mod logging;
pub mod parser;
pub mod privilege;
pub mod registry;
pub mod scope;

pub use cache::ProviderCache;
pub use config::ClassPathConfig;
pub use cursor::{Candidate, CandidateCursor};
pub use instantiate::Instantiator;
pub use loader::{Providers, ServiceLoader, ServiceLoaderBuilder};
pub use locator::ResourceLocator;
pub use privilege::Propagator;
pub use registry::TypeRegistry;
pub use scope::{ClassPath, DirectoryScope, JarScope, MemoryScope};

pub use provscope_api as api;
