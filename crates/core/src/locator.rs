//! Resource locator: finds the configuration resources for a capability.

use crate::parser::is_qualified_name;
use provscope_api::{CapabilityId, ConfigResource, DiscoveryScope, ScopeError};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct ResourceLocator {
    scope: Arc<dyn DiscoveryScope>,
}

impl ResourceLocator {
    pub fn new(scope: Arc<dyn DiscoveryScope>) -> Self {
        Self { scope }
    }

    pub fn scope(&self) -> &Arc<dyn DiscoveryScope> {
        &self.scope
    }

    /// Enumerate `META-INF/services/<capability>` across the scope.
    ///
    /// Nothing is read here; the returned resources are opened by the parser.
    /// The id must be a qualified name, so it can never address a path
    /// outside the scope.
    pub fn locate(
        &self,
        capability: &CapabilityId,
    ) -> Result<Vec<Box<dyn ConfigResource>>, ScopeError> {
        if !is_qualified_name(capability.as_str()) {
            return Err(ScopeError::InvalidIdentifier(capability.to_string()));
        }
        let resources = self.scope.resources(&capability.resource_name())?;
        debug!(
            "Located {} configuration resources for {} in {}",
            resources.len(),
            capability,
            self.scope.name()
        );
        Ok(resources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::MemoryScope;

    #[test]
    fn test_locate_uses_services_prefix() {
        let scope = Arc::new(MemoryScope::new("m").with_service("com.acme.Codec", "a.B"));
        let locator = ResourceLocator::new(scope);

        let found = locator.locate(&CapabilityId::new("com.acme.Codec")).unwrap();
        assert_eq!(found.len(), 1);
        assert!(locator.locate(&CapabilityId::new("com.acme.Other")).unwrap().is_empty());
    }

    #[test]
    fn test_locate_rejects_empty_identifier() {
        let locator = ResourceLocator::new(Arc::new(MemoryScope::new("m")));
        let Err(err) = locator.locate(&CapabilityId::new("")) else {
            panic!("empty identifier should be rejected");
        };
        assert!(matches!(err, ScopeError::InvalidIdentifier(_)));
    }

    #[test]
    fn test_locate_rejects_malformed_identifiers() {
        let scope = Arc::new(MemoryScope::new("m").with_service("com.acme.Codec", "a.B"));
        let locator = ResourceLocator::new(scope);

        for id in ["com acme.Codec", "../../../secret.txt", "a/b", " com.acme.Codec", "1st.Codec"] {
            let Err(err) = locator.locate(&CapabilityId::new(id)) else {
                panic!("{id:?} should be rejected");
            };
            assert!(matches!(err, ScopeError::InvalidIdentifier(ref bad) if bad == id));
        }
        assert!(locator.locate(&CapabilityId::new("com.acme.Codec$Inner")).is_ok());
    }
}
