//! In-memory factor store
//!
//! Lock-free reads via DashMap, so a single store can serve concurrent
//! rescore invocations without external locking.

use dashmap::DashMap;
use rescore_core::{FactorStore, StoreError};

/// Key → raw factor string, held in memory
#[derive(Debug, Default)]
pub struct InMemoryFactorStore {
    entries: DashMap<String, String>,
}

impl InMemoryFactorStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Remove `key`, returning its value
    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries.remove(key).map(|(_, v)| v)
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for InMemoryFactorStore
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let store = InMemoryFactorStore::new();
        for (k, v) in iter {
            store.put(k, v);
        }
        store
    }
}

impl FactorStore for InMemoryFactorStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }
}
