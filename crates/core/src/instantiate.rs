//! Turns accepted candidate names into cached provider instances.

use crate::cache::ProviderCache;
use provscope_api::{BoxError, Capability, DiscoveryError, TypeResolver};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct Instantiator {
    resolver: Arc<dyn TypeResolver>,
}

impl Instantiator {
    pub fn new(resolver: Arc<dyn TypeResolver>) -> Self {
        Self { resolver }
    }

    /// Resolve, type-check and construct `name`, then cache the instance.
    pub fn accept<S: ?Sized + 'static>(
        &self,
        capability: &Capability<S>,
        name: &str,
        cache: &mut ProviderCache<S>,
    ) -> Result<Arc<S>, DiscoveryError> {
        let id = capability.id();
        let Some(ty) = self.resolver.resolve(name) else {
            warn!("{}: provider {} not found", id, name);
            return Err(DiscoveryError::ProviderNotFound {
                capability: id.clone(),
                name: name.to_string(),
            });
        };

        let Some(factory) = ty.factory::<S>() else {
            warn!(
                "{}: provider {} does not implement {}",
                id,
                name,
                capability.contract_name()
            );
            return Err(DiscoveryError::ProviderNotAssignable {
                capability: id.clone(),
                name: name.to_string(),
            });
        };

        let provider = match catch_unwind(AssertUnwindSafe(|| factory())) {
            Ok(Ok(provider)) => provider,
            Ok(Err(source)) => return Err(self.instantiation_failed(capability, name, source)),
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "provider constructor panicked".to_string());
                return Err(self.instantiation_failed(capability, name, message.into()));
            }
        };

        debug!("Instantiated provider {} for {}", name, id);
        Ok(cache.insert(name.to_string(), provider))
    }

    fn instantiation_failed<S: ?Sized + 'static>(
        &self,
        capability: &Capability<S>,
        name: &str,
        source: BoxError,
    ) -> DiscoveryError {
        warn!("{}: provider {} could not be instantiated: {}", capability.id(), name, source);
        DiscoveryError::ProviderInstantiationFailed {
            capability: capability.id().clone(),
            name: name.to_string(),
            source,
        }
    }
}
