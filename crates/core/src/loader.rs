//! Service loader facade.
//!
//! A [`ServiceLoader`] is the discovery context for one capability. It owns
//! the provider cache and the candidate cursor of the current generation.
//!
//! ## Iteration
//!
//! ```text
//! iter()  ──▶ cached providers (insertion order, replayed)
//!              │
//!              ▼ exhausted
//!             cursor ──▶ locator ──▶ parser        (lazy, per resource)
//!              │
//!              ▼ accepted name
//!             instantiator ──▶ cache (write-through) ──▶ caller
//! ```
//!
//! Every view returned by [`ServiceLoader::iter`] starts from the head of the
//! cache, so providers are instantiated at most once per generation no
//! matter how many times the loader is iterated. `iter` and `reload` borrow
//! the loader mutably: one pass at a time, and never a reload mid-pass.

use crate::cache::ProviderCache;
use crate::cursor::CandidateCursor;
use crate::instantiate::Instantiator;
use crate::locator::ResourceLocator;
use crate::privilege::Propagator;
use crate::registry::TypeRegistry;
use crate::scope::ClassPath;
use provscope_api::{
    Capability, DiscoveryError, DiscoveryScope, PrivilegeContext, TypeResolver, root_scope,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

pub struct ServiceLoader<S: ?Sized + 'static> {
    capability: Capability<S>,
    scope: Arc<dyn DiscoveryScope>,
    instantiator: Instantiator,
    privilege: Propagator,
    cache: ProviderCache<S>,
    cursor: CandidateCursor,
}

impl<S: ?Sized + 'static> ServiceLoader<S> {
    /// Create a loader for `capability` over `scope`.
    ///
    /// No I/O happens until the loader is iterated.
    pub fn load(
        capability: Capability<S>,
        scope: Arc<dyn DiscoveryScope>,
        resolver: Arc<dyn TypeResolver>,
    ) -> Self {
        Self::with_propagator(capability, scope, resolver, Propagator::unrestricted())
    }

    /// Like [`ServiceLoader::load`], but only sees the outermost ancestor of
    /// `scope`, i.e. installed providers.
    pub fn load_installed(
        capability: Capability<S>,
        scope: Arc<dyn DiscoveryScope>,
        resolver: Arc<dyn TypeResolver>,
    ) -> Self {
        Self::load(capability, root_scope(scope), resolver)
    }

    pub fn builder(capability: Capability<S>) -> ServiceLoaderBuilder<S> {
        ServiceLoaderBuilder::new(capability)
    }

    fn with_propagator(
        capability: Capability<S>,
        scope: Arc<dyn DiscoveryScope>,
        resolver: Arc<dyn TypeResolver>,
        privilege: Propagator,
    ) -> Self {
        let cursor = CandidateCursor::new(
            capability.id().clone(),
            ResourceLocator::new(scope.clone()),
        );
        Self {
            capability,
            scope,
            instantiator: Instantiator::new(resolver),
            privilege,
            cache: ProviderCache::new(),
            cursor,
        }
    }

    /// Lazily discover and instantiate providers.
    ///
    /// Already-cached providers are replayed first, then discovery resumes
    /// where the previous pass left off.
    pub fn iter(&mut self) -> Providers<'_, S> {
        Providers {
            loader: self,
            position: 0,
            done: false,
        }
    }

    /// Discard cached providers and restart discovery from scratch.
    ///
    /// Old instances are not released explicitly; they live as long as the
    /// caller keeps them.
    pub fn reload(&mut self) {
        self.cache.clear();
        self.cursor = CandidateCursor::new(
            self.capability.id().clone(),
            ResourceLocator::new(self.scope.clone()),
        );
        info!(
            "Reloaded {} (generation {})",
            self.capability.id(),
            self.cache.generation()
        );
    }

    pub fn capability(&self) -> &Capability<S> {
        &self.capability
    }

    /// Advance discovery by one provider.
    fn discover_next(&mut self) -> Result<Option<Arc<S>>, DiscoveryError> {
        let ServiceLoader {
            capability,
            instantiator,
            privilege,
            cache,
            cursor,
            ..
        } = self;
        let id = capability.id();

        let candidate = privilege.run(id, || cursor.next(|name| cache.contains(name)))??;
        let Some(candidate) = candidate else {
            debug!("Discovery of {} complete: {} providers", id, cache.len());
            return Ok(None);
        };

        debug!("Accepting {} from {}", candidate.name, candidate.resource);
        let provider = privilege.run(id, || instantiator.accept(capability, &candidate.name, cache))??;
        Ok(Some(provider))
    }
}

impl<S: ?Sized + 'static> fmt::Display for ServiceLoader<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "provscope::ServiceLoader[{}]", self.capability.id())
    }
}

impl<S: ?Sized + 'static> fmt::Debug for ServiceLoader<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceLoader")
            .field("capability", self.capability.id())
            .field("scope", &self.scope.name())
            .field("cached", &self.cache.len())
            .finish()
    }
}

impl<'a, S: ?Sized + 'static> IntoIterator for &'a mut ServiceLoader<S> {
    type Item = Result<Arc<S>, DiscoveryError>;
    type IntoIter = Providers<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One logical pass over a loader's providers.
///
/// Yields `Err` at most once; the pass ends after an error. Providers
/// discovered before the error stay cached.
pub struct Providers<'a, S: ?Sized + 'static> {
    loader: &'a mut ServiceLoader<S>,
    position: usize,
    done: bool,
}

impl<S: ?Sized + 'static> Providers<'_, S> {
    /// Providers are derived from configuration; they cannot be removed.
    pub fn remove(&mut self) -> Result<(), DiscoveryError> {
        self.loader.cursor.remove()
    }
}

impl<S: ?Sized + 'static> Iterator for Providers<'_, S> {
    type Item = Result<Arc<S>, DiscoveryError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if let Some((_, provider)) = self.loader.cache.get_index(self.position) {
            self.position += 1;
            return Some(Ok(provider.clone()));
        }

        match self.loader.discover_next() {
            Ok(Some(provider)) => {
                self.position = self.loader.cache.len();
                Some(Ok(provider))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Builder for [`ServiceLoader`] with an explicit scope, resolver and
/// privilege context.
pub struct ServiceLoaderBuilder<S: ?Sized + 'static> {
    capability: Capability<S>,
    scope: Option<Arc<dyn DiscoveryScope>>,
    resolver: Option<Arc<dyn TypeResolver>>,
    privilege_context: Option<Arc<dyn PrivilegeContext>>,
}

impl<S: ?Sized + 'static> ServiceLoaderBuilder<S> {
    pub fn new(capability: Capability<S>) -> Self {
        Self {
            capability,
            scope: None,
            resolver: None,
            privilege_context: None,
        }
    }

    pub fn scope(mut self, scope: Arc<dyn DiscoveryScope>) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn resolver(mut self, resolver: Arc<dyn TypeResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Context whose current authority is captured by `build()`.
    pub fn privilege_context(mut self, context: Arc<dyn PrivilegeContext>) -> Self {
        self.privilege_context = Some(context);
        self
    }

    /// Missing parts default to an empty class path and an empty registry.
    pub fn build(self) -> ServiceLoader<S> {
        let scope = self
            .scope
            .unwrap_or_else(|| Arc::new(ClassPath::new("empty")) as Arc<dyn DiscoveryScope>);
        let resolver = self
            .resolver
            .unwrap_or_else(|| Arc::new(TypeRegistry::new()) as Arc<dyn TypeResolver>);
        let privilege = self
            .privilege_context
            .map(Propagator::capture)
            .unwrap_or_default();
        ServiceLoader::with_propagator(self.capability, scope, resolver, privilege)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::MemoryScope;

    trait Greeter {
        fn greet(&self) -> String;
    }

    struct Hello;
    impl Greeter for Hello {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    fn registry() -> Arc<TypeRegistry> {
        let registry = TypeRegistry::new();
        registry.register::<dyn Greeter, _>("a.Hello", || Ok(Arc::new(Hello) as Arc<dyn Greeter>));
        registry.register::<dyn Greeter, _>("b.Hello", || Ok(Arc::new(Hello) as Arc<dyn Greeter>));
        Arc::new(registry)
    }

    #[test]
    fn test_display() {
        let loader: ServiceLoader<dyn Greeter> = ServiceLoader::builder(Capability::new("x.Greeter")).build();
        assert_eq!(loader.to_string(), "provscope::ServiceLoader[x.Greeter]");
    }

    #[test]
    fn test_interrupted_pass_resumes_from_cache() {
        let scope = Arc::new(MemoryScope::new("m").with_service("x.Greeter", "a.Hello\nb.Hello"));
        let mut loader = ServiceLoader::load(Capability::<dyn Greeter>::new("x.Greeter"), scope, registry());

        let first = loader.iter().next().unwrap().unwrap();
        let all: Vec<_> = loader.iter().map(Result::unwrap).collect();
        assert_eq!(all.len(), 2);
        assert!(Arc::ptr_eq(&first, &all[0]));
        assert_eq!(all[1].greet(), "hello");
    }

    #[test]
    fn test_remove_not_supported() {
        let mut loader: ServiceLoader<dyn Greeter> = ServiceLoader::builder(Capability::new("x.Greeter")).build();
        let mut providers = loader.iter();
        assert!(matches!(
            providers.remove(),
            Err(DiscoveryError::NotSupported { .. })
        ));
        assert!(providers.next().is_none());
    }

    #[test]
    fn test_into_iterator_for_mut_ref() {
        let scope = Arc::new(MemoryScope::new("m").with_service("x.Greeter", "a.Hello"));
        let mut loader = ServiceLoader::load(Capability::<dyn Greeter>::new("x.Greeter"), scope, registry());
        let mut count = 0;
        for provider in &mut loader {
            assert_eq!(provider.unwrap().greet(), "hello");
            count += 1;
        }
        assert_eq!(count, 1);
    }
}
