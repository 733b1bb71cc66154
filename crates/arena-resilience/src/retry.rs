//! Bounded retry with capped exponential backoff.
//!
//! Used where waiting out a transient failure is the right call, such as a
//! data service waiting for its database at startup. Upstream fetches in
//! the fights service never go through here: a caller retrying through an
//! open circuit only adds load to a dependency that is already failing.
//!
//! Delays come from [`backoff::ExponentialBackoff`] and sleeping is done by
//! [`backoff::future::retry_notify`] on the tokio timer. The attempt cap is
//! enforced here by marking the last error permanent.

use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use tracing::warn;

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Values below 1 act as 1.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Backoff schedule for this policy.
    ///
    /// Doubles from `base_delay`, saturates at `max_delay` and never gives
    /// up on elapsed time; only `max_attempts` ends the loop. Jitter is
    /// disabled so the schedule is predictable in logs.
    pub fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.base_delay)
            .with_max_interval(self.max_delay)
            .with_multiplier(2.0)
            .with_randomization_factor(0.0)
            .with_max_elapsed_time(None)
            .build()
    }
}

/// Run `operation` until it succeeds or the policy is exhausted.
///
/// `operation` receives the 1-based attempt number. The last error is
/// returned when every attempt fails.
pub async fn with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let attempts = AtomicU32::new(0);

    backoff::future::retry_notify(
        policy.backoff(),
        || {
            let attempt = attempts.fetch_add(1, Ordering::Relaxed).saturating_add(1);
            let call = operation(attempt);
            async move {
                call.await.map_err(|e| {
                    if attempt >= max_attempts {
                        backoff::Error::permanent(e)
                    } else {
                        backoff::Error::transient(e)
                    }
                })
            }
        },
        |e: E, delay: Duration| {
            warn!(
                operation = operation_name,
                attempt = attempts.load(Ordering::Relaxed),
                max_attempts,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %e,
                "attempt failed, retrying"
            );
        },
    )
    .await
}
