//! LRU Store Module
//!
//! Unguarded cache state: a key index kept in lock-step with the recency list.
//! Every method takes the current instant so expiry is decided by the caller's clock.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::cache::{CacheStats, CacheValue, Entry, NodeId, RecencyList};
use crate::error::{CacheError, Result};

// == LRU Store ==
/// Bounded key/value storage with LRU ordering and TTL expiry.
///
/// Not synchronized; [`TtlLruCache`](crate::cache::TtlLruCache) wraps it in a lock.
#[derive(Debug)]
pub struct LruStore<V> {
    /// Key to list position
    index: HashMap<String, NodeId>,
    /// Entries ordered most to least recently used
    list: RecencyList<Entry<V>>,
    stats: CacheStats,
    capacity: usize,
    ttl: Duration,
}

impl<V: CacheValue> LruStore<V> {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries the store can hold
    /// * `ttl` - Lifetime given to every entry on insert or overwrite
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            list: RecencyList::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
            ttl,
        }
    }

    // == Set ==
    /// Stores a key-value pair that expires at `now + ttl`.
    ///
    /// If the key already exists, the value is overwritten, the expiry reset
    /// and the entry promoted. Otherwise, if the store is at capacity, the
    /// least recently used entry is evicted first.
    pub fn set(&mut self, key: String, value: V, now: Instant) -> Result<()> {
        if key.is_empty() {
            return Err(CacheError::InvalidArgument("key cannot be empty".to_string()));
        }
        if value.is_absent() {
            return Err(CacheError::InvalidArgument("value cannot be empty".to_string()));
        }

        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.list.get_mut(id) {
                entry.refresh(value, now, self.ttl);
            }
            self.list.move_to_front(id);
            return Ok(());
        }

        if self.index.len() >= self.capacity {
            self.evict();
        }

        let id = self.list.push_front(Entry::new(key.clone(), value, now, self.ttl));
        self.index.insert(key, id);
        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key and promotes it to most recently used.
    ///
    /// An entry whose expiry is not in the future is removed and reported
    /// as a miss.
    pub fn get(&mut self, key: &str, now: Instant) -> Result<V> {
        let Some(&id) = self.index.get(key) else {
            self.stats.record_miss();
            return Err(CacheError::Miss(key.to_string()));
        };

        let expired = self
            .list
            .get(id)
            .map_or(true, |entry| entry.is_expired_at(now));
        if expired {
            self.remove_node(id);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            debug!(key, "expired entry removed on read");
            return Err(CacheError::Miss(key.to_string()));
        }

        self.list.move_to_front(id);
        self.stats.record_hit();
        self.list
            .get(id)
            .map(|entry| entry.value.clone())
            .ok_or_else(|| CacheError::Miss(key.to_string()))
    }

    // == Delete ==
    /// Removes an entry by key.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        match self.index.get(key).copied() {
            Some(id) => {
                self.remove_node(id);
                Ok(())
            }
            None => Err(CacheError::Miss(key.to_string())),
        }
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }

    /// Reports whether `key` is indexed, expired or not.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Snapshot of every indexed key, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.index.keys().cloned().collect()
    }

    // == Purge Expired ==
    /// Removes all entries expired as of `now`.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let expired: Vec<NodeId> = self
            .list
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(id, _)| id)
            .collect();

        let count = expired.len();
        for id in expired {
            self.remove_node(id);
        }

        self.stats.record_expirations(count);
        count
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats;
        stats.set_total_entries(self.index.len());
        stats
    }

    // == Invariant Audit ==
    /// Checks that the index and list describe the same set of entries.
    ///
    /// Fails if the list is structurally broken, if the sizes differ or
    /// exceed capacity, or if any index slot points at a node holding a
    /// different key.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        self.list.check_links()?;

        if self.index.len() != self.list.len() {
            return Err(format!(
                "index has {} keys but list has {} nodes",
                self.index.len(),
                self.list.len()
            ));
        }
        if self.index.len() > self.capacity {
            return Err(format!(
                "{} entries exceed capacity {}",
                self.index.len(),
                self.capacity
            ));
        }
        for (key, &id) in &self.index {
            match self.list.get(id) {
                Some(entry) if entry.key == *key => {}
                Some(entry) => {
                    return Err(format!("key '{}' points at node for '{}'", key, entry.key))
                }
                None => return Err(format!("key '{}' points at a vacant node", key)),
            }
        }
        Ok(())
    }

    fn evict(&mut self) {
        if let Some(entry) = self.list.pop_back() {
            self.index.remove(&entry.key);
            self.stats.record_eviction();
            debug!(key = %entry.key, "evicted least recently used entry");
        }
    }

    fn remove_node(&mut self, id: NodeId) -> Option<Entry<V>> {
        let entry = self.list.remove(id)?;
        self.index.remove(&entry.key);
        Some(entry)
    }
}
