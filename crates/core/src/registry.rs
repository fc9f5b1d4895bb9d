//! In-memory type registry.
//!
//! Provides thread-safe storage for `name -> ResolvedType` mappings. Types
//! are registered explicitly, typically once at start-up by each provider
//! crate, instead of being loaded by name at run time.

use dashmap::DashMap;
use provscope_api::{BoxError, ProviderFactory, ResolvedType, TypeResolver};
use std::sync::Arc;
use tracing::debug;

/// Thread-safe in-memory type registry
#[derive(Default)]
pub struct TypeRegistry {
    types: DashMap<String, ResolvedType>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` as an implementation of contract `S`.
    ///
    /// A type may implement several contracts; call once per contract.
    pub fn register<S, F>(&self, name: impl Into<String>, factory: F) -> &Self
    where
        S: ?Sized + 'static,
        F: Fn() -> Result<Arc<S>, BoxError> + Send + Sync + 'static,
    {
        let name = name.into();
        let factory: ProviderFactory<S> = Arc::new(factory);
        debug!("Registering {} as {}", name, std::any::type_name::<S>());
        self.types
            .entry(name.clone())
            .or_insert_with(|| ResolvedType::new(name))
            .bind(factory);
        self
    }

    /// Make `name` resolvable without binding it to any contract.
    pub fn declare(&self, name: impl Into<String>) -> &Self {
        let name = name.into();
        self.types
            .entry(name.clone())
            .or_insert_with(|| ResolvedType::new(name));
        self
    }

    /// Register multiple types at once
    pub fn register_batch(&self, types: impl IntoIterator<Item = ResolvedType>) {
        for ty in types {
            self.types.insert(ty.name().to_string(), ty);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeResolver for TypeRegistry {
    fn resolve(&self, name: &str) -> Option<ResolvedType> {
        self.types.get(name).map(|entry| entry.value().clone())
    }
}
