//! Type resolution: turning a candidate name into something constructible.
//!
//! Providers are not loaded by reflection. A resolver maps names to
//! [`ResolvedType`]s, each carrying one zero-argument factory per capability
//! contract the type implements.

use crate::error::BoxError;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Zero-argument constructor producing a provider as its contract type.
pub type ProviderFactory<S> = Arc<dyn Fn() -> Result<Arc<S>, BoxError> + Send + Sync>;

/// Resolves candidate names to constructible types.
pub trait TypeResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<ResolvedType>;
}

/// A concrete type known to a resolver.
#[derive(Clone)]
pub struct ResolvedType {
    name: Arc<str>,
    bindings: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl ResolvedType {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            bindings: HashMap::new(),
        }
    }

    /// Record that this type implements contract `S`.
    pub fn bind<S: ?Sized + 'static>(&mut self, factory: ProviderFactory<S>) {
        self.bindings
            .insert(TypeId::of::<S>(), Arc::new(factory) as Arc<dyn Any + Send + Sync>);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn implements<S: ?Sized + 'static>(&self) -> bool {
        self.bindings.contains_key(&TypeId::of::<S>())
    }

    /// Factory for contract `S`, or `None` when the type does not implement it.
    pub fn factory<S: ?Sized + 'static>(&self) -> Option<ProviderFactory<S>> {
        self.bindings
            .get(&TypeId::of::<S>())?
            .downcast_ref::<ProviderFactory<S>>()
            .cloned()
    }
}

impl fmt::Debug for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedType")
            .field("name", &self.name)
            .field("contracts", &self.bindings.len())
            .finish()
    }
}
