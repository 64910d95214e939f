//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside a cache.
//!
//! # Tasks
//! - Reaper: Removes expired cache entries once per TTL period

mod reaper;

pub use reaper::Reaper;
