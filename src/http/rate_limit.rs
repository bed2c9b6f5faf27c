//! Minimum-interval rate gate
//!
//! Katana allows 5 requests/second and 300/minute. The gate spaces dispatches
//! at least `min_interval` apart. Reading the last dispatch time, sleeping and
//! stamping the new time all happen under one async lock, so overlapping
//! callers queue up instead of racing on a stale timestamp.

use crate::config::DEFAULT_MIN_INTERVAL;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

/// Serializes outbound requests to a minimum spacing
///
/// Share one gate (behind an `Arc`) between every client that should count
/// against the same quota.
pub struct RateGate {
    min_interval: Duration,
    last_dispatch: Mutex<Option<Instant>>,
}

impl RateGate {
    /// Create a gate with the given minimum spacing
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_dispatch: Mutex::new(None),
        }
    }

    /// Create a gate allowing at most `requests` dispatches per second
    pub fn per_second(requests: u32) -> Self {
        Self::new(Duration::from_secs(1) / requests.max(1))
    }

    /// A gate that never waits
    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Minimum spacing enforced by this gate
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait for the next dispatch slot and claim it.
    ///
    /// Returns the instant recorded as the new dispatch time.
    pub async fn acquire(&self) -> Instant {
        let mut last = self.last_dispatch.lock().await;

        if let Some(previous) = *last {
            let ready_at = previous + self.min_interval;
            let now = Instant::now();
            if ready_at > now {
                trace!(wait_ms = (ready_at - now).as_millis() as u64, "Rate gate waiting");
                tokio::time::sleep_until(ready_at).await;
            }
        }

        let stamp = Instant::now();
        *last = Some(stamp);
        stamp
    }

    /// Time of the most recent dispatch, if any
    pub async fn last_dispatch(&self) -> Option<Instant> {
        *self.last_dispatch.lock().await
    }
}

impl Default for RateGate {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

impl std::fmt::Debug for RateGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateGate")
            .field("min_interval", &self.min_interval)
            .finish_non_exhaustive()
    }
}
