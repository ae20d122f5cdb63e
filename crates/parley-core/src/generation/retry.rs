//! Retry policy for generation requests.
//!
//! Exponential backoff: after failed attempt `n` (1-based) the policy waits
//! `base_delay * 2^n`, so the default schedule is 10 s, 20 s, 40 s. The wait
//! also follows the final failed attempt.

use std::future::Future;
use std::time::Duration;

use parley_types::generation::GenerationError;
use tracing::warn;

/// Default number of attempts per request.
pub const MAX_ATTEMPTS: u32 = 3;

/// Default base delay between attempts.
pub const BASE_DELAY: Duration = Duration::from_secs(5);

/// Attempt budget and backoff schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_delay: BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// How long to wait after failed attempt `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        1u32.checked_shl(attempt)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .unwrap_or(Duration::MAX)
    }

    /// The full backoff schedule, one delay per attempt.
    pub fn schedule(&self) -> impl Iterator<Item = Duration> + '_ {
        (1..=self.max_attempts).map(|attempt| self.delay_after(attempt))
    }

    /// Run `operation` until it succeeds or the attempt budget is spent.
    ///
    /// `operation` receives the 1-based attempt number. Errors that are not
    /// transient are returned immediately. After exhaustion the last error is
    /// returned.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, GenerationError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, GenerationError>>,
    {
        let mut attempt = 1;
        loop {
            let err = match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if !err.is_transient() {
                return Err(err);
            }

            let delay = self.delay_after(attempt);
            warn!(attempt, ?delay, "Generation attempt failed: {err}");
            tokio::time::sleep(delay).await;

            if attempt >= self.max_attempts {
                return Err(err);
            }
            attempt += 1;
        }
    }
}
