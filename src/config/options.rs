// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// Directory holding `events.json`, `fighters.json`, `fights.json` and the debug log.
    pub data_dir: PathBuf,
    /// Worker threads per engine round. `0` spawns one thread per work item.
    pub workers: usize,
    /// Fighter detail pages are fetched in groups of this size (progress granularity only).
    pub fighter_batch: usize,
    pub retry: RetryPolicy,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DATA_DIR),
            workers: WORKERS,
            fighter_batch: FIGHTER_BATCH,
            retry: RetryPolicy::default(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            user_agent: s!(USER_AGENT),
        }
    }
}

/// Bounded retry with exponential backoff. Jitter is added by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total rounds, including the first. Always treated as at least 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_delay: Duration::from_millis(BACKOFF_BASE_MS),
            max_delay: Duration::from_millis(BACKOFF_MAX_MS),
        }
    }
}

impl RetryPolicy {
    /// No waiting between rounds. Handy for tests and local fixtures.
    pub fn immediate(max_attempts: u32) -> Self {
        Self { max_attempts, base_delay: Duration::ZERO, max_delay: Duration::ZERO }
    }

    /// Delay before round `round + 1`, i.e. after `round` rounds have run.
    pub fn backoff(&self, round: u32) -> Duration {
        let shift = round.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << shift).min(self.max_delay)
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_then_caps() {
        let p = RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(1_000),
        };
        assert_eq!(p.backoff(1), Duration::from_millis(100));
        assert_eq!(p.backoff(2), Duration::from_millis(200));
        assert_eq!(p.backoff(4), Duration::from_millis(800));
        assert_eq!(p.backoff(5), Duration::from_millis(1_000));
        assert_eq!(p.backoff(40), Duration::from_millis(1_000));
    }

    #[test]
    fn zero_attempts_still_runs_once() {
        assert_eq!(RetryPolicy::immediate(0).attempts(), 1);
    }
}
