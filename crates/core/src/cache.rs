//! Insertion-ordered cache of instantiated providers.

use indexmap::IndexMap;
use std::sync::Arc;

/// `name -> provider`, append-only within a generation.
pub struct ProviderCache<S: ?Sized> {
    providers: IndexMap<String, Arc<S>>,
    generation: u64,
}

impl<S: ?Sized> ProviderCache<S> {
    pub fn new() -> Self {
        Self {
            providers: IndexMap::new(),
            generation: 0,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Append a provider. A name that is already cached keeps its original
    /// instance and position; the existing instance is returned.
    pub fn insert(&mut self, name: String, provider: Arc<S>) -> Arc<S> {
        self.providers.entry(name).or_insert(provider).clone()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<S>> {
        self.providers.get(name)
    }

    /// Provider at `index` in insertion order.
    pub fn get_index(&self, index: usize) -> Option<(&str, &Arc<S>)> {
        self.providers
            .get_index(index)
            .map(|(name, provider)| (name.as_str(), provider))
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    /// Drop every provider and start a new generation.
    pub fn clear(&mut self) {
        self.providers.clear();
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<S: ?Sized> Default for ProviderCache<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_and_no_duplicates() {
        let mut cache: ProviderCache<str> = ProviderCache::new();
        cache.insert("b".to_string(), Arc::from("B"));
        cache.insert("a".to_string(), Arc::from("A"));
        let kept = cache.insert("b".to_string(), Arc::from("B2"));

        assert_eq!(&*kept, "B");
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(cache.get_index(1).map(|(n, _)| n), Some("a"));
        assert!(cache.contains("a"));
    }

    #[test]
    fn test_clear_starts_new_generation() {
        let mut cache: ProviderCache<str> = ProviderCache::new();
        cache.insert("a".to_string(), Arc::from("A"));
        assert_eq!(cache.generation(), 0);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.generation(), 1);
        assert!(cache.get("a").is_none());
    }
}
