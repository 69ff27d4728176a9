//! Keyword-search result cache.
//!
//! Search results are kept in a host-provided key-value store (browser local
//! storage in the dashboard, a map in tests) keyed by the normalized query.
//! The engine itself never touches the store.

use research_core::{ProductRecord, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Prefix for all search cache keys.
const KEY_PREFIX: &str = "search:";

/// Minimal string key-value storage capability.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;
    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: String);
}

/// In-memory key-value store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

/// Cached payload for one search.
#[derive(Debug, Serialize, Deserialize)]
struct CachedSearch {
    query: String,
    records: Vec<ProductRecord>,
}

/// Typed search cache over a [`KeyValueStore`].
pub struct SearchCache<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SearchCache<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Cache key for a query: trimmed, lowercased, under a fixed prefix.
    pub fn key_for(query: &str) -> String {
        format!("{}{}", KEY_PREFIX, query.trim().to_lowercase())
    }

    /// Load cached records for a query.
    ///
    /// Returns `Ok(None)` on a miss and an error if the cached value is corrupt.
    pub fn load(&self, query: &str) -> Result<Option<Vec<ProductRecord>>> {
        let key = Self::key_for(query);
        let Some(raw) = self.store.get(&key) else {
            debug!(%key, "search cache miss");
            return Ok(None);
        };
        let cached: CachedSearch = serde_json::from_str(&raw)?;
        debug!(query = %cached.query, records = cached.records.len(), "search cache hit");
        Ok(Some(cached.records))
    }

    /// Cache records for a query.
    pub fn store(&mut self, query: &str, records: &[ProductRecord]) -> Result<()> {
        let key = Self::key_for(query);
        let payload = CachedSearch {
            query: query.trim().to_string(),
            records: records.to_vec(),
        };
        self.store.set(&key, serde_json::to_string(&payload)?);
        debug!(%key, records = records.len(), "cached search results");
        Ok(())
    }

    /// Access the underlying store.
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Consume the cache and return the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use research_core::Error;

    fn record(asin: &str, price: f64) -> ProductRecord {
        ProductRecord {
            asin: asin.to_string(),
            title: format!("Product {}", asin),
            price,
            sales: 10,
            revenue: price * 10.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_miss_then_hit() {
        let mut cache = SearchCache::new(MemoryStore::new());
        assert!(cache.load("water bottle").unwrap().is_none());

        let records = vec![record("A", 12.0), record("B", 7.5)];
        cache.store("water bottle", &records).unwrap();

        let loaded = cache.load("water bottle").unwrap().unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_query_key_is_normalized() {
        let mut cache = SearchCache::new(MemoryStore::new());
        cache.store("  Water Bottle ", &[record("A", 12.0)]).unwrap();

        assert!(cache.load("water bottle").unwrap().is_some());
        assert_eq!(SearchCache::<MemoryStore>::key_for(" Yoga MAT"), "search:yoga mat");
        assert_eq!(cache.inner().len(), 1);
    }

    #[test]
    fn test_overwrite() {
        let mut cache = SearchCache::new(MemoryStore::new());
        cache.store("mat", &[record("A", 1.0)]).unwrap();
        cache.store("mat", &[record("B", 2.0), record("C", 3.0)]).unwrap();

        let loaded = cache.load("mat").unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(cache.into_inner().len(), 1);
    }

    #[test]
    fn test_corrupt_entry_is_an_error() {
        let mut store = MemoryStore::new();
        store.set("search:mat", "{not json".to_string());
        let cache = SearchCache::new(store);

        let err = cache.load("mat").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
