//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// TTL in seconds, applied uniformly to every entry
    pub ttl_secs: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL_SECS` - Entry TTL and reaper period in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 8081)
    ///
    /// Unset variables take their default. A variable that is set but does
    /// not parse (e.g. `CACHE_CAPACITY=-3`) is an error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable source.
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            capacity: parse_var(&lookup, "CACHE_CAPACITY")?.unwrap_or(defaults.capacity),
            ttl_secs: parse_var(&lookup, "CACHE_TTL_SECS")?.unwrap_or(defaults.ttl_secs),
            server_port: parse_var(&lookup, "SERVER_PORT")?.unwrap_or(defaults.server_port),
        })
    }

    /// Rejects values the cache cannot be constructed with.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            bail!("CACHE_CAPACITY must be a positive integer");
        }
        if self.ttl_secs == 0 {
            bail!("CACHE_TTL_SECS must be a positive number of seconds");
        }
        Ok(())
    }

    /// Entry TTL as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            ttl_secs: 300,
            server_port: 8081,
        }
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("invalid {name}: {raw:?}")),
    }
}
