//! Polite random delays between requests.

use std::thread;
use std::time::Duration;

use rand::Rng;
use tracing::trace;

use crate::io::config::PacingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    min: Duration,
    max: Duration,
}

impl Pacer {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            min: min.min(max),
            max,
        }
    }

    pub fn from_config(config: &PacingConfig) -> Self {
        Self::new(
            Duration::from_millis(config.min_delay_ms),
            Duration::from_millis(config.max_delay_ms),
        )
    }

    /// A pacer that never sleeps.
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Pick the next delay uniformly from `[min, max]`.
    pub fn next_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max.is_zero() {
            return Duration::ZERO;
        }
        let ms = rng.gen_range(self.min.as_millis()..=self.max.as_millis());
        Duration::from_millis(u64::try_from(ms).unwrap_or(u64::MAX))
    }

    pub fn pause(&self) {
        let delay = self.next_delay(&mut rand::thread_rng());
        if !delay.is_zero() {
            trace!(delay_ms = delay.as_millis() as u64, "pausing");
            thread::sleep(delay);
        }
    }
}
