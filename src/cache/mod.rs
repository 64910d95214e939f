//! Cache Module
//!
//! Provides a bounded in-memory cache with TTL expiration and LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;
mod ttl_cache;
mod value;


// Re-export public types
pub use entry::Entry;
pub use lru::{NodeId, RecencyList};
pub use stats::CacheStats;
pub use store::LruStore;
pub use ttl_cache::TtlLruCache;
pub use value::CacheValue;
