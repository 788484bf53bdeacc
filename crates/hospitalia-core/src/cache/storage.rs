use std::collections::HashMap;
use std::future::Future;

use tokio::sync::RwLock;

use super::{CacheError, CachedResponse};

/// Named cache stores of path → response, as provided by the host.
pub trait CacheStorage: Send + Sync {
    /// Create the store if it does not exist yet.
    fn open(&self, name: &str) -> impl Future<Output = Result<(), CacheError>> + Send;

    /// Insert every entry into the store, or none of them.
    fn put_all(
        &self,
        name: &str,
        entries: Vec<(String, CachedResponse)>,
    ) -> impl Future<Output = Result<(), CacheError>> + Send;

    /// Look the key up in every store, in [`CacheStorage::keys`] order.
    fn match_any(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<CachedResponse>, CacheError>> + Send;

    /// Names of all existing stores. The order is up to the implementation
    /// and is the order [`CacheStorage::match_any`] searches in.
    fn keys(&self) -> impl Future<Output = Result<Vec<String>, CacheError>> + Send;

    /// Delete a store. Returns false if it did not exist.
    fn delete(&self, name: &str) -> impl Future<Output = Result<bool, CacheError>> + Send;
}

/// In-memory storage, kept in store creation order.
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    stores: RwLock<Vec<(String, HashMap<String, CachedResponse>)>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in a store, None if the store does not exist.
    pub async fn len(&self, name: &str) -> Option<usize> {
        let stores = self.stores.read().await;
        stores
            .iter()
            .find(|(store, _)| store == name)
            .map(|(_, entries)| entries.len())
    }
}

impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, name: &str) -> Result<(), CacheError> {
        let mut stores = self.stores.write().await;
        if !stores.iter().any(|(store, _)| store == name) {
            stores.push((name.to_string(), HashMap::new()));
        }
        Ok(())
    }

    async fn put_all(
        &self,
        name: &str,
        entries: Vec<(String, CachedResponse)>,
    ) -> Result<(), CacheError> {
        let mut stores = self.stores.write().await;
        let idx = match stores.iter().position(|(store, _)| store == name) {
            Some(idx) => idx,
            None => {
                stores.push((name.to_string(), HashMap::new()));
                stores.len() - 1
            }
        };
        stores[idx].1.extend(entries);
        Ok(())
    }

    async fn match_any(&self, key: &str) -> Result<Option<CachedResponse>, CacheError> {
        let stores = self.stores.read().await;
        Ok(stores
            .iter()
            .find_map(|(_, entries)| entries.get(key))
            .cloned())
    }

    async fn keys(&self) -> Result<Vec<String>, CacheError> {
        let stores = self.stores.read().await;
        Ok(stores.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn delete(&self, name: &str) -> Result<bool, CacheError> {
        let mut stores = self.stores.write().await;
        let before = stores.len();
        stores.retain(|(store, _)| store != name);
        Ok(stores.len() != before)
    }
}
