//! Ordered chain of class-path entries with parent delegation.

use provscope_api::{ConfigResource, DiscoveryScope, ScopeError};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::trace;

/// Composite scope: parent first, then each entry in order.
pub struct ClassPath {
    name: String,
    entries: Vec<Arc<dyn DiscoveryScope>>,
    parent: Option<Arc<dyn DiscoveryScope>>,
}

impl ClassPath {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            parent: None,
        }
    }

    /// Add an entry
    pub fn add_entry(mut self, entry: Arc<dyn DiscoveryScope>) -> Self {
        self.entries.push(entry);
        self
    }

    /// Add multiple entries
    pub fn with_entries(mut self, entries: impl IntoIterator<Item = Arc<dyn DiscoveryScope>>) -> Self {
        self.entries.extend(entries);
        self
    }

    pub fn with_parent(mut self, parent: Arc<dyn DiscoveryScope>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn entries(&self) -> &[Arc<dyn DiscoveryScope>] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.parent.is_none()
    }
}

impl DiscoveryScope for ClassPath {
    fn resources(&self, name: &str) -> Result<Vec<Box<dyn ConfigResource>>, ScopeError> {
        let mut found = Vec::new();
        if let Some(parent) = &self.parent {
            found.extend(parent.resources(name)?);
        }
        for entry in &self.entries {
            let before = found.len();
            found.extend(entry.resources(name)?);
            trace!("{} yielded {} resources for {}", entry.name(), found.len() - before, name);
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
        let mut names = BTreeSet::new();
        if let Some(parent) = &self.parent {
            names.extend(parent.service_names()?);
        }
        for entry in &self.entries {
            names.extend(entry.service_names()?);
        }
        Ok(names.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::MemoryScope;

    fn ids(scope: &dyn DiscoveryScope, name: &str) -> Vec<String> {
        scope
            .resources(name)
            .unwrap()
            .iter()
            .map(|r| r.id().to_string())
            .collect()
    }

    #[test]
    fn test_parent_then_entries_in_order() {
        let parent: Arc<dyn DiscoveryScope> =
            Arc::new(MemoryScope::new("sys").with_service("a.C", "p.P"));
        let cp = ClassPath::new("app")
            .add_entry(Arc::new(MemoryScope::new("one").with_service("a.C", "x.X")))
            .add_entry(Arc::new(MemoryScope::new("two").with_service("b.D", "y.Y")))
            .add_entry(Arc::new(MemoryScope::new("three").with_service("a.C", "z.Z")))
            .with_parent(parent);

        assert_eq!(
            ids(&cp, "META-INF/services/a.C"),
            vec![
                "mem:sys/META-INF/services/a.C#0",
                "mem:one/META-INF/services/a.C#0",
                "mem:three/META-INF/services/a.C#0",
            ]
        );
        assert_eq!(cp.service_names().unwrap(), vec!["a.C", "b.D"]);
    }

    #[test]
    fn test_empty_classpath() {
        let cp = ClassPath::new("empty");
        assert!(cp.is_empty());
        assert!(ids(&cp, "META-INF/services/a.C").is_empty());
    }
}
