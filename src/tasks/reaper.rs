//! TTL Reaper Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Weak;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::{CacheValue, LruStore};

/// Handle to a running sweep loop.
///
/// The loop holds only a weak reference to the store, so it exits on its
/// own once the cache is dropped. Dropping the handle cancels it too.
#[derive(Debug)]
pub struct Reaper {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Reaper {
    /// Spawns a task that purges expired entries every `period`.
    ///
    /// The first sweep runs one full period after spawning. The sweep
    /// takes the store's lock like any other operation.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn spawn<V: CacheValue>(store: Weak<Mutex<LruStore<V>>>, period: Duration) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let start = Instant::now() + period;

        let handle = tokio::spawn(async move {
            debug!(period_ms = period.as_millis() as u64, "reaper started");

            let mut ticker = interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let Some(store) = store.upgrade() else {
                    break;
                };

                let (removed, remaining) = {
                    let mut guard = store.lock().await;
                    let removed = guard.purge_expired(Instant::now());
                    (removed, guard.len())
                };

                if removed > 0 {
                    info!(removed, remaining, "TTL sweep removed expired entries");
                } else {
                    debug!(remaining, "TTL sweep found no expired entries");
                }
            }

            debug!("reaper stopped");
        });

        Self { cancel, handle }
    }

    /// Signals the loop to exit after any sweep in progress.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
