//! TTL LRU Cache - A bounded in-memory key/value cache
//!
//! Fixed-capacity storage with least-recently-used eviction, uniform
//! time-to-live expiry and a background reaper, safe to share across tasks.
//! A thin axum adapter exposes it over HTTP.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::{create_router, AppState};
pub use cache::{CacheStats, CacheValue, TtlLruCache};
pub use config::Config;
pub use error::{ApiError, CacheError};
