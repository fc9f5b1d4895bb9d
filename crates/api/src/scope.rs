//! Discovery scope abstractions.
//!
//! A scope is the resolvable universe of configuration resources, the way a
//! class path is for a JVM. Scopes only enumerate; reading happens through
//! [`ConfigResource::open`] when the parser reaches a resource.

use crate::error::ScopeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::BufRead;
use std::sync::Arc;

/// Printable identity of a configuration resource
/// (e.g. `jar:file:/libs/a.jar!/META-INF/services/com.acme.Codec`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One configuration resource found in a scope.
pub trait ConfigResource: Send + Sync {
    fn id(&self) -> &ResourceId;

    /// Open the resource for line-oriented reading.
    fn open(&self) -> std::io::Result<Box<dyn BufRead + Send + '_>>;
}

/// Ordered resolver of configuration resources.
pub trait DiscoveryScope: Send + Sync {
    /// Enumerate every resource called `name`, in resolution order.
    ///
    /// The order must be deterministic for a fixed scope state; it decides
    /// provider order.
    fn resources(&self, name: &str) -> Result<Vec<Box<dyn ConfigResource>>, ScopeError>;

    /// Scope name (for logging/debugging)
    fn name(&self) -> &str;

    /// Enclosing scope consulted before this one, if any.
    fn parent(&self) -> Option<Arc<dyn DiscoveryScope>> {
        None
    }

    /// Capability identifiers that have a configuration resource in this scope.
    fn service_names(&self) -> Result<Vec<String>, ScopeError> {
        Ok(Vec::new())
    }
}

/// Walk `parent()` links up to the outermost scope.
pub fn root_scope(scope: Arc<dyn DiscoveryScope>) -> Arc<dyn DiscoveryScope> {
    let mut current = scope;
    while let Some(parent) = current.parent() {
        current = parent;
    }
    current
}
