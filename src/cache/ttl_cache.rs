//! TTL-LRU Cache Module
//!
//! Thread-safe cache handle: one lock over the whole store, plus the
//! background reaper tied to the handle's lifetime.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::cache::{CacheStats, CacheValue, LruStore};
use crate::error::{CacheError, Result};
use crate::tasks::Reaper;

// == TTL-LRU Cache ==
/// Bounded key/value cache with LRU eviction and uniform TTL expiry.
///
/// Every operation, reads included, serializes through a single mutex:
/// `get` promotes the entry it finds, so there is no shared read path.
/// Share one instance behind an `Arc`; dropping the last handle stops
/// the reaper.
///
/// # Example
/// ```ignore
/// let cache = TtlLruCache::new(2, Duration::from_secs(60));
/// cache.set("a", 1).await?;
/// cache.set("b", 2).await?;
/// cache.get("a").await?;
/// cache.set("c", 3).await?; // evicts "b"
/// ```
pub struct TtlLruCache<V> {
    store: Arc<Mutex<LruStore<V>>>,
    reaper: Reaper,
    capacity: usize,
    ttl: Duration,
}

impl<V: CacheValue> TtlLruCache<V> {
    // == Constructor ==
    /// Creates the cache and starts its reaper with period `ttl`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Panics
    /// Panics if `capacity` is 0 or `ttl` is zero.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        assert!(capacity > 0, "TtlLruCache capacity must be > 0");
        assert!(!ttl.is_zero(), "TtlLruCache ttl must be > 0");
        Self::start(capacity, ttl)
    }

    /// Like [`new`](Self::new), but reports bad parameters as
    /// `CacheError::InvalidArgument` instead of panicking.
    pub fn try_new(capacity: usize, ttl: Duration) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidArgument(
                "capacity must be a positive integer".to_string(),
            ));
        }
        if ttl.is_zero() {
            return Err(CacheError::InvalidArgument(
                "ttl must be a positive duration".to_string(),
            ));
        }
        Ok(Self::start(capacity, ttl))
    }

    fn start(capacity: usize, ttl: Duration) -> Self {
        let store = Arc::new(Mutex::new(LruStore::new(capacity, ttl)));
        let reaper = Reaper::spawn(Arc::downgrade(&store), ttl);
        Self {
            store,
            reaper,
            capacity,
            ttl,
        }
    }

    // == Set ==
    /// Inserts or refreshes `key`, evicting the LRU entry if needed.
    pub async fn set(&self, key: impl Into<String>, value: V) -> Result<()> {
        self.store.lock().await.set(key.into(), value, Instant::now())
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    ///
    /// Expired entries are removed and reported as `CacheError::Miss`.
    pub async fn get(&self, key: &str) -> Result<V> {
        self.store.lock().await.get(key, Instant::now())
    }

    // == Delete ==
    pub async fn delete(&self, key: &str) -> Result<()> {
        self.store.lock().await.delete(key)
    }

    // == Delete All ==
    pub async fn delete_all(&self) {
        self.store.lock().await.clear();
    }

    // == Exists ==
    /// Presence check that neither promotes nor looks at expiry.
    ///
    /// May return true for a key that `get` would then report as a miss.
    pub async fn exists(&self, key: &str) -> bool {
        self.store.lock().await.contains(key)
    }

    // == Get All Keys ==
    /// Snapshot of every stored key, unordered and unfiltered by expiry.
    pub async fn get_all_keys(&self) -> Vec<String> {
        self.store.lock().await.keys()
    }

    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.lock().await.is_empty()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.lock().await.stats()
    }

    /// Audits index/list consistency under the lock.
    pub async fn check_invariants(&self) -> std::result::Result<(), String> {
        self.store.lock().await.check_invariants()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Shutdown ==
    /// Stops the reaper. The cache stays usable; expiry is then lazy only.
    pub fn shutdown(&self) {
        self.reaper.stop();
    }

    pub fn reaper_running(&self) -> bool {
        self.reaper.is_running()
    }
}

impl<V> std::fmt::Debug for TtlLruCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlLruCache")
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const LONG_TTL: Duration = Duration::from_secs(300);

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = TtlLruCache::new(3, LONG_TTL);

        cache.set("key1", 100i64).await.unwrap();
        assert_eq!(cache.get("key1").await.unwrap(), 100);
        assert!(cache.get("nonexistent").await.unwrap_err().is_miss());
    }

    #[tokio::test]
    async fn test_reject_invalid_input() {
        let cache: TtlLruCache<serde_json::Value> = TtlLruCache::new(3, LONG_TTL);
        cache.set("present", serde_json::json!(1)).await.unwrap();

        let empty_key = cache.set("", serde_json::json!(200)).await;
        let null_value = cache.set("key2", serde_json::Value::Null).await;

        assert!(matches!(empty_key, Err(CacheError::InvalidArgument(_))));
        assert!(matches!(null_value, Err(CacheError::InvalidArgument(_))));
        assert_eq!(cache.get_all_keys().await, vec!["present".to_string()]);
    }

    #[tokio::test]
    async fn test_lru_order() {
        let cache = TtlLruCache::new(2, LONG_TTL);

        cache.set("a", 1i64).await.unwrap();
        cache.set("b", 2i64).await.unwrap();
        cache.set("c", 3i64).await.unwrap();

        assert!(cache.get("a").await.unwrap_err().is_miss());
        assert_eq!(cache.get("b").await.unwrap(), 2);
        assert_eq!(cache.get("c").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_recency_promotion() {
        let cache = TtlLruCache::new(2, LONG_TTL);

        cache.set("a", 1i64).await.unwrap();
        cache.set("b", 2i64).await.unwrap();
        cache.get("a").await.unwrap();
        cache.set("c", 3i64).await.unwrap();

        assert!(cache.get("b").await.unwrap_err().is_miss());
        assert_eq!(cache.get("a").await.unwrap(), 1);
        assert_eq!(cache.get("c").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_delete_of_absent_is_miss() {
        let cache: TtlLruCache<String> = TtlLruCache::new(3, LONG_TTL);

        let result = cache.delete("nope").await;
        assert_eq!(result, Err(CacheError::Miss("nope".to_string())));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_all_clears_fully() {
        let cache = TtlLruCache::new(3, LONG_TTL);
        cache.set("key1", 100i64).await.unwrap();
        cache.set("key2", 200i64).await.unwrap();

        cache.delete_all().await;

        assert!(cache.get_all_keys().await.is_empty());
        assert_eq!(cache.len().await, 0);
        assert!(cache.check_invariants().await.is_ok());
    }

    #[tokio::test]
    async fn test_exists() {
        let cache = TtlLruCache::new(3, LONG_TTL);
        cache.set("key1", 100i64).await.unwrap();

        assert!(cache.exists("key1").await);
        assert!(!cache.exists("nonexistent").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_expiry_on_get() {
        let cache = TtlLruCache::new(3, Duration::from_secs(1));
        cache.shutdown();
        cache.set("k", 1i64).await.unwrap();

        tokio::time::sleep(Duration::from_secs(2)).await;

        // Without the reaper the stale key is still indexed
        assert!(cache.exists("k").await);
        assert!(cache.get("k").await.unwrap_err().is_miss());
        assert!(!cache.exists("k").await);
        assert_eq!(cache.stats().await.expirations, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaper_removes_unread_entries() {
        let cache = TtlLruCache::new(3, Duration::from_secs(1));
        cache.set("k1", 1i64).await.unwrap();
        cache.set("k2", 2i64).await.unwrap();

        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert!(cache.get_all_keys().await.is_empty());
        assert_eq!(cache.stats().await.expirations, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaper_keeps_fresh_entries() {
        let cache = TtlLruCache::new(3, Duration::from_secs(10));
        cache.set("k", 1i64).await.unwrap();

        tokio::time::sleep(Duration::from_secs(5)).await;
        cache.set("k", 2i64).await.unwrap();
        tokio::time::sleep(Duration::from_secs(7)).await;

        // Refreshed at 5s, so alive at 12s past the 10s sweep
        assert_eq!(cache.get("k").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_shutdown_stops_reaper() {
        let cache: TtlLruCache<String> = TtlLruCache::new(3, LONG_TTL);
        assert!(cache.reaper_running());

        cache.shutdown();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!cache.reaper_running());
    }

    #[tokio::test]
    async fn test_try_new_rejects_bad_parameters() {
        assert!(matches!(
            TtlLruCache::<String>::try_new(0, LONG_TTL),
            Err(CacheError::InvalidArgument(_))
        ));
        assert!(matches!(
            TtlLruCache::<String>::try_new(1, Duration::ZERO),
            Err(CacheError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    #[should_panic(expected = "capacity must be > 0")]
    async fn test_new_panics_on_zero_capacity() {
        let _ = TtlLruCache::<String>::new(0, LONG_TTL);
    }

    #[tokio::test]
    #[should_panic(expected = "ttl must be > 0")]
    async fn test_new_panics_on_zero_ttl() {
        let _ = TtlLruCache::<String>::new(1, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_reaper() {
        let cache = TtlLruCache::new(3, Duration::from_secs(1));
        cache.set("k", 1i64).await.unwrap();

        // Keep the store alive so only the cancellation can stop the sweep
        let store = Arc::clone(&cache.store);
        drop(cache);
        tokio::time::sleep(Duration::from_secs(3)).await;

        let guard = store.lock().await;
        assert!(guard.contains("k"), "no sweep should run after the cache is dropped");
        assert_eq!(guard.stats().expirations, 0);
    }

    #[tokio::test]
    async fn test_round_trip_json_values() {
        let cache = TtlLruCache::new(4, LONG_TTL);
        let value = serde_json::json!({"name": "widget", "tags": [1, 2]});

        cache.set("obj", value.clone()).await.unwrap();
        assert_eq!(cache.get("obj").await.unwrap(), value);
    }
}
