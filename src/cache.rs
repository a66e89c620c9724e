use std::sync::{Arc, RwLock};

use lru::LruCache;

use crate::config::CacheConfig;
use crate::models::CacheEntry;

/// In-process cache of paste projections, keyed by public id.
///
/// Every operation is best-effort: a disabled cache or a poisoned lock
/// behaves like a miss, and write failures are never surfaced to
/// callers. The store stays the source of truth.
#[derive(Clone)]
pub struct PasteCache {
    entries: Option<Arc<RwLock<LruCache<String, CacheEntry>>>>,
}

impl PasteCache {
    pub fn new(config: &CacheConfig) -> Self {
        let entries = config
            .enabled
            .then(|| Arc::new(RwLock::new(LruCache::new(config.capacity_non_zero()))));
        PasteCache { entries }
    }

    /// Look up a cached projection. `None` is a miss.
    pub fn read(&self, id: &str) -> Option<CacheEntry> {
        // LruCache::get updates recency, so reads take the write lock.
        let mut guard = self.entries.as_ref()?.write().ok()?;
        guard.get(id).cloned()
    }

    /// Insert a projection unless one is already cached under `id`.
    /// Used on create; fire-and-forget.
    pub fn add(&self, id: &str, entry: CacheEntry) {
        if let Some(mut guard) = self.lock_for_write() {
            if !guard.contains(id) {
                guard.put(id.to_owned(), entry);
            }
        }
    }

    /// Insert a projection, replacing any cached value under `id`.
    /// Used to repopulate after a store lookup; fire-and-forget.
    pub fn set(&self, id: &str, entry: CacheEntry) {
        if let Some(mut guard) = self.lock_for_write() {
            guard.put(id.to_owned(), entry);
        }
    }

    /// Drop the cached projection for `id`. Absence is not an error.
    pub fn invalidate(&self, id: &str) {
        if let Some(mut guard) = self.lock_for_write() {
            guard.pop(id);
        }
    }

    fn lock_for_write(
        &self,
    ) -> Option<std::sync::RwLockWriteGuard<'_, LruCache<String, CacheEntry>>> {
        self.entries.as_ref().and_then(|entries| entries.write().ok())
    }
}
