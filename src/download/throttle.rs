//! Fixed pause between successive page fetches.
//!
//! Unlike a rate limiter, [`Throttle`] keeps no timing state: every call to
//! [`Throttle::pause`] sleeps for the full configured delay. The pipeline calls
//! it between pages and never after the last one.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use manga_dl_core::download::Throttle;
//!
//! # async fn example() {
//! let throttle = Throttle::new(Duration::from_millis(10));
//! throttle.pause().await;
//! assert_eq!(throttle.pause_count(), 1);
//! # }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::trace;

/// Unconditional inter-request delay with a pause counter.
#[derive(Debug, Default)]
pub struct Throttle {
    delay: Duration,
    pauses: AtomicU64,
}

impl Throttle {
    /// Creates a throttle that sleeps `delay` per pause. A zero delay still
    /// counts pauses but does not sleep.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pauses: AtomicU64::new(0),
        }
    }

    /// Returns the configured delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleeps for the configured delay.
    pub async fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::Relaxed);
        if self.delay.is_zero() {
            return;
        }
        trace!(delay_ms = self.delay.as_millis(), "throttling");
        tokio::time::sleep(self.delay).await;
    }

    /// Number of pauses taken since creation.
    #[must_use]
    pub fn pause_count(&self) -> u64 {
        self.pauses.load(Ordering::Relaxed)
    }
}
