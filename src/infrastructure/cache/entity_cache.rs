use std::{
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use dashmap::DashMap;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::errors::AppError;

pub trait Identified {
    fn id(&self) -> Uuid;
}

/// Admin-side cache of one entity kind, keyed by id.
///
/// The cache is only ever replaced wholesale from a fresh listing; entries
/// are never patched in place after a write.
pub struct EntityCache<T> {
    entries: DashMap<Uuid, Arc<T>>,
    order: RwLock<Vec<Uuid>>,
    loaded: AtomicBool,
    name: &'static str,
}

impl<T> EntityCache<T>
where
    T: Identified + Clone + Send + Sync,
{
    pub fn new(name: &'static str) -> Self {
        EntityCache {
            entries: DashMap::new(),
            order: RwLock::new(Vec::new()),
            loaded: AtomicBool::new(false),
            name,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Swaps in a complete listing, keeping its order.
    pub fn replace_all(&self, items: Vec<T>) {
        let mut order = self.order.write();
        self.entries.clear();
        order.clear();
        for item in items {
            let id = item.id();
            order.push(id);
            self.entries.insert(id, Arc::new(item));
        }
        self.loaded.store(true, Ordering::Release);
    }

    pub fn snapshot(&self) -> Vec<T> {
        let order = self.order.read();
        order
            .iter()
            .filter_map(|id| self.entries.get(id).map(|entry| entry.value().as_ref().clone()))
            .collect()
    }

    pub fn invalidate(&self) {
        let mut order = self.order.write();
        self.entries.clear();
        order.clear();
        self.loaded.store(false, Ordering::Release);
    }

    /// Serves the cached listing, fetching it first when the cache is cold
    /// or a refresh is forced.
    pub async fn list_or_load<F, Fut>(&self, refresh: bool, loader: F) -> Result<Vec<T>, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, AppError>>,
    {
        if !refresh && self.is_loaded() {
            return Ok(self.snapshot());
        }

        match loader().await {
            Ok(items) => {
                self.replace_all(items.clone());
                tracing::debug!(cache = self.name, count = items.len(), "Cache loaded");
                Ok(items)
            }
            Err(e) => {
                self.invalidate();
                Err(e)
            }
        }
    }

    /// Re-fetch after a successful write. A failed re-fetch leaves the cache
    /// cold so the next read goes back to the store.
    pub async fn refresh_with<F, Fut>(&self, loader: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, AppError>>,
    {
        match loader().await {
            Ok(items) => self.replace_all(items),
            Err(e) => {
                tracing::warn!(cache = self.name, error = %e, "Cache refresh failed; cache cleared");
                self.invalidate();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(Uuid, &'static str);

    impl Identified for Item {
        fn id(&self) -> Uuid {
            self.0
        }
    }

    #[tokio::test]
    async fn loads_once_until_refreshed() {
        let cache = EntityCache::new("items");
        let first = Item(Uuid::new_v4(), "first");

        let items = cache.list_or_load(false, || async { Ok(vec![first.clone()]) }).await.unwrap();
        assert_eq!(items, vec![first.clone()]);

        // Warm cache: the loader is not consulted.
        let items = cache
            .list_or_load(false, || async { Err(AppError::Store("unreachable".into())) })
            .await
            .unwrap();
        assert_eq!(items, vec![first]);
    }

    #[tokio::test]
    async fn failed_refresh_clears_cache() {
        let cache = EntityCache::new("items");
        cache.replace_all(vec![Item(Uuid::new_v4(), "a"), Item(Uuid::new_v4(), "b")]);
        assert_eq!(cache.snapshot().len(), 2);

        cache.refresh_with(|| async { Err(AppError::Store("down".into())) }).await;
        assert!(!cache.is_loaded());
        assert!(cache.snapshot().is_empty());
    }

    #[test]
    fn snapshot_keeps_listing_order() {
        let cache = EntityCache::new("items");
        let items: Vec<_> = ["c", "a", "b"].into_iter().map(|n| Item(Uuid::new_v4(), n)).collect();
        cache.replace_all(items.clone());
        assert_eq!(cache.snapshot(), items);
    }
}
