//! In-memory scope, for embedded configuration and tests.

use indexmap::IndexMap;
use provscope_api::{
    ConfigResource, DiscoveryScope, ResourceId, SERVICES_PREFIX, ScopeError,
};
use std::io::{BufRead, Cursor};
use std::sync::Arc;

/// A configuration resource whose bytes are already loaded.
#[derive(Debug, Clone)]
pub struct MemoryResource {
    id: ResourceId,
    bytes: Arc<[u8]>,
}

impl MemoryResource {
    pub fn new(id: impl Into<String>, contents: &str) -> Self {
        Self::from_bytes(id, contents.as_bytes().to_vec())
    }

    pub fn from_bytes(id: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            id: ResourceId::new(id),
            bytes: bytes.into(),
        }
    }
}

impl ConfigResource for MemoryResource {
    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn open(&self) -> std::io::Result<Box<dyn BufRead + Send + '_>> {
        Ok(Box::new(Cursor::new(&self.bytes[..])))
    }
}

/// Scope backed by a map of resource name to resources, in insertion order.
#[derive(Default)]
pub struct MemoryScope {
    name: String,
    resources: IndexMap<String, Vec<MemoryResource>>,
    parent: Option<Arc<dyn DiscoveryScope>>,
}

impl MemoryScope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resources: IndexMap::new(),
            parent: None,
        }
    }

    /// Add a provider-configuration file for `capability`.
    ///
    /// Several files per capability are allowed; they are enumerated in the
    /// order they were added.
    pub fn with_service(mut self, capability: &str, contents: &str) -> Self {
        self.add_service(capability, contents);
        self
    }

    pub fn add_service(&mut self, capability: &str, contents: &str) {
        let resource_name = format!("{SERVICES_PREFIX}{capability}");
        let files = self.resources.entry(resource_name.clone()).or_default();
        let id = format!("mem:{}/{}#{}", self.name, resource_name, files.len());
        files.push(MemoryResource::new(id, contents));
    }

    pub fn with_parent(mut self, parent: Arc<dyn DiscoveryScope>) -> Self {
        self.parent = Some(parent);
        self
    }
}

impl DiscoveryScope for MemoryScope {
    fn resources(&self, name: &str) -> Result<Vec<Box<dyn ConfigResource>>, ScopeError> {
        let mut found: Vec<Box<dyn ConfigResource>> = Vec::new();
        if let Some(parent) = &self.parent {
            found.extend(parent.resources(name)?);
        }
        if let Some(files) = self.resources.get(name) {
            found.extend(
                files
                    .iter()
                    .cloned()
                    .map(|r| Box::new(r) as Box<dyn ConfigResource>),
            );
        }
        Ok(found)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parent(&self) -> Option<Arc<dyn DiscoveryScope>> {
        self.parent.clone()
    }

    fn service_names(&self) -> Result<Vec<String>, ScopeError> {
        Ok(self
            .resources
            .keys()
            .filter_map(|k| k.strip_prefix(SERVICES_PREFIX))
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resources_in_insertion_order() {
        let scope = MemoryScope::new("test")
            .with_service("a.Codec", "x.One")
            .with_service("a.Codec", "x.Two")
            .with_service("b.Sink", "y.One");

        let found = scope.resources("META-INF/services/a.Codec").unwrap();
        let ids: Vec<_> = found.iter().map(|r| r.id().to_string()).collect();
        assert_eq!(
            ids,
            vec![
                "mem:test/META-INF/services/a.Codec#0",
                "mem:test/META-INF/services/a.Codec#1"
            ]
        );
        assert!(scope.resources("META-INF/services/none").unwrap().is_empty());
        assert_eq!(scope.service_names().unwrap(), vec!["a.Codec", "b.Sink"]);
    }

    #[test]
    fn test_parent_resources_come_first() {
        let parent = Arc::new(MemoryScope::new("parent").with_service("a.Codec", "p.One"));
        let scope = MemoryScope::new("child")
            .with_service("a.Codec", "c.One")
            .with_parent(parent);

        let found = scope.resources("META-INF/services/a.Codec").unwrap();
        assert_eq!(found.len(), 2);
        assert!(found[0].id().as_str().starts_with("mem:parent/"));
        assert!(found[1].id().as_str().starts_with("mem:child/"));
    }
}
