//! Per-dependency circuit breaker.
//!
//! # States
//!
//! - **Closed**: calls pass through. Failures are timestamped and only
//!   those inside the trailing `window` are counted, so the window slides
//!   with each new failure. Reaching `failure_threshold` opens the circuit.
//!   A success clears the count.
//! - **Open**: calls are rejected without touching the network until
//!   `cool_down` has elapsed since the last failure.
//! - **Half-Open**: exactly one probe call is admitted. Success closes the
//!   circuit and resets the count, failure re-opens it and restarts the
//!   cool-down.
//!
//! ```text
//! Closed --(threshold failures within window)--> Open
//! Open --(cool-down elapsed, next call)--> HalfOpen
//! HalfOpen --(probe ok)--> Closed
//! HalfOpen --(probe failed)--> Open
//! ```
//!
//! Every transition happens under one mutex so concurrent callers reporting
//! failures at the same time are serialized. Time comes from
//! [`tokio::time::Instant`] so tests can drive the cool-down with a paused
//! clock.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::{info, warn};

/// Default consecutive failures before the circuit opens.
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 5;

/// Default sliding window over which failures are counted, in seconds.
pub const DEFAULT_WINDOW_SECS: u64 = 60;

/// Default cool-down before a probe is allowed, in seconds.
pub const DEFAULT_COOL_DOWN_SECS: u64 = 60;

/// Tuning for a [`CircuitBreaker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    /// Failures within `window` that open the circuit. Values below 1 act
    /// as 1.
    pub failure_threshold: u32,
    /// Trailing period over which failures are counted.
    pub window: Duration,
    /// Time since the last failure before a probe is let through.
    pub cool_down: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            window: Duration::from_secs(DEFAULT_WINDOW_SECS),
            cool_down: Duration::from_secs(DEFAULT_COOL_DOWN_SECS),
        }
    }
}

/// Observable state of a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// Normal operation.
    Closed,
    /// Failing fast.
    Open,
    /// Waiting on (or about to admit) a single probe.
    HalfOpen,
}

impl core::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        })
    }
}

/// Point-in-time view of a breaker for health reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CircuitSnapshot {
    /// Current state.
    pub state: CircuitState,
    /// Failures counted toward the threshold.
    pub consecutive_failures: u32,
}

/// Returned when a call is short-circuited.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("circuit open for {service}")]
pub struct CircuitOpen {
    /// Name of the protected dependency.
    pub service: String,
}

#[derive(Debug)]
struct Inner {
    state: CircuitState,
    consecutive_failures: u32,
    /// Failure times inside the window while closed, oldest first.
    recent_failures: VecDeque<Instant>,
    last_failure: Option<Instant>,
    probe_in_flight: bool,
}

/// Circuit breaker guarding one named dependency.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    /// Create a closed breaker for `name`.
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            inner: Mutex::new(Inner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                recent_failures: VecDeque::new(),
                last_failure: None,
                probe_in_flight: false,
            }),
        }
    }

    /// Name of the protected dependency.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state.
    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    /// Current state and failure count.
    pub fn snapshot(&self) -> CircuitSnapshot {
        let inner = self.lock();
        CircuitSnapshot {
            state: inner.state,
            consecutive_failures: inner.consecutive_failures,
        }
    }

    /// Ask permission to make one call.
    ///
    /// The returned permit must be settled with
    /// [`CallPermit::record_success`] or [`CallPermit::record_failure`].
    /// Dropping it unsettled (for example when the call is cancelled)
    /// leaves the state untouched and frees the half-open probe slot.
    pub fn try_acquire(&self) -> Result<CallPermit<'_>, CircuitOpen> {
        let mut inner = self.lock();
        match inner.state {
            CircuitState::Closed => Ok(CallPermit::new(self, false)),
            CircuitState::Open => {
                let cooled = inner
                    .last_failure
                    .is_none_or(|at| at.elapsed() >= self.config.cool_down);
                if cooled {
                    inner.state = CircuitState::HalfOpen;
                    inner.probe_in_flight = true;
                    info!(service = %self.name, "circuit half-open, admitting probe");
                    Ok(CallPermit::new(self, true))
                } else {
                    Err(self.rejection())
                }
            }
            CircuitState::HalfOpen => {
                if inner.probe_in_flight {
                    Err(self.rejection())
                } else {
                    inner.probe_in_flight = true;
                    Ok(CallPermit::new(self, true))
                }
            }
        }
    }

    fn on_success(&self, probe: bool) {
        let mut inner = self.lock();
        match inner.state {
            CircuitState::HalfOpen if probe => {
                inner.state = CircuitState::Closed;
                inner.consecutive_failures = 0;
                inner.recent_failures.clear();
                inner.last_failure = None;
                inner.probe_in_flight = false;
                info!(service = %self.name, "probe succeeded, circuit closed");
            }
            CircuitState::Closed => {
                inner.consecutive_failures = 0;
                inner.recent_failures.clear();
            }
            // Late successes from calls admitted before the circuit opened
            // do not close it; only a probe can.
            CircuitState::Open | CircuitState::HalfOpen => {}
        }
    }

    fn on_failure(&self, probe: bool) {
        let mut inner = self.lock();
        let now = Instant::now();
        let threshold = self.config.failure_threshold.max(1);

        match inner.state {
            CircuitState::Closed => {
                let window = self.config.window;
                while inner
                    .recent_failures
                    .front()
                    .is_some_and(|&at| now.saturating_duration_since(at) > window)
                {
                    inner.recent_failures.pop_front();
                }
                inner.recent_failures.push_back(now);
                inner.consecutive_failures =
                    u32::try_from(inner.recent_failures.len()).unwrap_or(u32::MAX);
                inner.last_failure = Some(now);
                if inner.consecutive_failures >= threshold {
                    inner.state = CircuitState::Open;
                    inner.recent_failures.clear();
                    warn!(
                        service = %self.name,
                        failures = inner.consecutive_failures,
                        "failure threshold reached, circuit open"
                    );
                }
            }
            CircuitState::HalfOpen if probe => {
                inner.state = CircuitState::Open;
                inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);
                inner.last_failure = Some(now);
                inner.probe_in_flight = false;
                warn!(service = %self.name, "probe failed, circuit re-opened");
            }
            CircuitState::Open | CircuitState::HalfOpen => {
                inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);
                inner.last_failure = Some(now);
            }
        }
    }

    fn on_abandoned(&self, probe: bool) {
        if probe {
            let mut inner = self.lock();
            inner.probe_in_flight = false;
        }
    }

    fn rejection(&self) -> CircuitOpen {
        CircuitOpen {
            service: self.name.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Permission to make one call through a [`CircuitBreaker`].
#[derive(Debug)]
#[must_use = "a permit must be settled with record_success or record_failure"]
pub struct CallPermit<'a> {
    breaker: &'a CircuitBreaker,
    probe: bool,
    settled: bool,
}

impl<'a> CallPermit<'a> {
    const fn new(breaker: &'a CircuitBreaker, probe: bool) -> Self {
        Self {
            breaker,
            probe,
            settled: false,
        }
    }

    /// Whether this permit is the half-open probe.
    pub const fn is_probe(&self) -> bool {
        self.probe
    }

    /// Report that the call succeeded.
    pub fn record_success(mut self) {
        self.settled = true;
        self.breaker.on_success(self.probe);
    }

    /// Report that the call failed.
    pub fn record_failure(mut self) {
        self.settled = true;
        self.breaker.on_failure(self.probe);
    }
}

impl Drop for CallPermit<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.breaker.on_abandoned(self.probe);
        }
    }
}
