//! Capability contracts.
//!
//! A capability pairs the fully-qualified name providers are registered under
//! with the Rust type (usually `dyn Trait`) instances are handed out as.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Directory that holds provider-configuration files inside a scope.
pub const SERVICES_PREFIX: &str = "META-INF/services/";

/// Fully-qualified capability identifier, e.g. `com.acme.Codec`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityId(String);

impl CapabilityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Name of the configuration resource listing providers of this capability.
    pub fn resource_name(&self) -> String {
        format!("{SERVICES_PREFIX}{}", self.0)
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CapabilityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CapabilityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A named contract `S` that discovered providers must satisfy.
///
/// `S` is only used at the type level; providers are produced as `Arc<S>`.
pub struct Capability<S: ?Sized> {
    id: CapabilityId,
    _contract: PhantomData<fn() -> Box<S>>,
}

impl<S: ?Sized + 'static> Capability<S> {
    pub fn new(id: impl Into<CapabilityId>) -> Self {
        Self {
            id: id.into(),
            _contract: PhantomData,
        }
    }

    pub fn id(&self) -> &CapabilityId {
        &self.id
    }

    /// Short type name of the contract, for diagnostics.
    pub fn contract_name(&self) -> &'static str {
        std::any::type_name::<S>()
    }
}

impl<S: ?Sized> Clone for Capability<S> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            _contract: PhantomData,
        }
    }
}

impl<S: ?Sized> fmt::Debug for Capability<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability").field("id", &self.id).finish()
    }
}
