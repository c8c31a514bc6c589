//! Randomized inter-iteration delay

use crate::config::PacingConfig;
use rand::Rng;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Sleeps a uniformly random duration between iterations
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    min_ms: u64,
    max_ms: u64,
}

impl Pacer {
    pub fn new(config: PacingConfig) -> Self {
        let min_ms = config.min_delay_secs.saturating_mul(1000);
        let max_ms = config.max_delay_secs.saturating_mul(1000).max(min_ms);
        Self { min_ms, max_ms }
    }

    /// Draw the next delay, uniform over `[min, max]` at millisecond resolution
    pub fn next_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        Duration::from_millis(rng.gen_range(self.min_ms..=self.max_ms))
    }

    /// Sleep for a random delay; returns early if `shutdown` is cancelled
    pub async fn pace<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        shutdown: &CancellationToken,
    ) -> Duration {
        let delay = self.next_delay(rng);
        info!(
            delay_ms = delay.as_millis() as u64,
            "Waiting {} seconds",
            rounded_secs(delay)
        );

        tokio::select! {
            () = tokio::time::sleep(delay) => {}
            () = shutdown.cancelled() => {
                info!("Shutdown requested during delay");
            }
        }

        delay
    }
}

/// Whole seconds, rounded half up
fn rounded_secs(delay: Duration) -> u64 {
    (delay.as_millis() as u64 + 500) / 1000
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(PacingConfig::default())
    }
}
