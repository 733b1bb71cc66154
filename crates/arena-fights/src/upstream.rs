//! HTTP clients for the heroes, villains and locations services.
//!
//! Every call is bounded by connect, read and total timeouts, guarded by the
//! service's circuit breaker and capped at a fixed number of in-flight
//! requests. Nothing here retries: a failed call is reported to the caller
//! and counted by the breaker.
//!
//! # Breaker accounting
//!
//! | Outcome | Breaker |
//! |---|---|
//! | 2xx with a decodable body | success |
//! | 404 (empty collection) | success, the dependency answered |
//! | timeout, refused connection, other status, undecodable body | failure |
//! | short-circuited, client shutting down | not attempted |

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use arena_resilience::{CircuitBreaker, CircuitBreakerRegistry, CircuitOpen};
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

/// Default TCP connect budget.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Default budget for reading the response.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Default budget for sending the request.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(2);

/// Default cap on concurrent requests to one upstream.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 100;

/// Default idle keep-alive connections kept per host.
pub const DEFAULT_MAX_IDLE_PER_HOST: usize = 20;

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

/// The data services a fight draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Upstream {
    /// Heroes data service.
    Heroes,
    /// Villains data service.
    Villains,
    /// Locations data service.
    Locations,
}

impl Upstream {
    /// Service name used in logs, error bodies and breaker keys.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Heroes => "heroes",
            Self::Villains => "villains",
            Self::Locations => "locations",
        }
    }

    /// Path of the random-entity endpoint on the service.
    pub const fn random_path(self) -> &'static str {
        match self {
            Self::Heroes => "/api/heroes/random_hero",
            Self::Villains => "/api/villains/random_villain",
            Self::Locations => "/api/locations/random_location",
        }
    }
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a single upstream call failed.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// No response within the time budget.
    #[error("request timed out")]
    Timeout,

    /// The connection could not be established or was dropped.
    #[error("connection failed: {0}")]
    ConnectionRefused(String),

    /// The service answered with a non-success status other than 404.
    #[error("unexpected status {0}")]
    Http(u16),

    /// The breaker rejected the call without touching the network.
    #[error("circuit open")]
    CircuitOpen,

    /// The service has nothing to return.
    #[error("no entity available")]
    NotFound,

    /// The body was not the expected JSON.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The client's in-flight limiter was closed, so it is shutting down.
    #[error("client is shutting down")]
    ClientClosed,
}

impl UpstreamError {
    /// Short machine-readable kind for error bodies.
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::ConnectionRefused(_) => "connection_refused",
            Self::Http(_) => "http_error",
            Self::CircuitOpen | Self::ClientClosed => "unavailable",
            Self::NotFound => "not_found",
            Self::Decode(_) => "decode",
        }
    }

    /// Whether this outcome counts against the breaker.
    pub const fn is_breaker_failure(&self) -> bool {
        !matches!(self, Self::NotFound | Self::CircuitOpen | Self::ClientClosed)
    }

    fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::ConnectionRefused(err.to_string())
        }
    }
}

impl From<CircuitOpen> for UpstreamError {
    fn from(_: CircuitOpen) -> Self {
        Self::CircuitOpen
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Limits applied to every upstream client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamSettings {
    /// TCP connect budget.
    pub connect_timeout: Duration,
    /// Budget for each read of the response.
    pub read_timeout: Duration,
    /// Budget for sending the request. Folded into [`Self::total_timeout`].
    pub write_timeout: Duration,
    /// Concurrent requests allowed per upstream.
    pub max_in_flight: usize,
    /// Idle keep-alive connections kept per host.
    pub max_idle_per_host: usize,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            max_idle_per_host: DEFAULT_MAX_IDLE_PER_HOST,
        }
    }
}

impl UpstreamSettings {
    /// Whole-request bound: connect + read + write.
    pub const fn total_timeout(&self) -> Duration {
        self.connect_timeout
            .saturating_add(self.read_timeout)
            .saturating_add(self.write_timeout)
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Resilient client for one upstream service.
#[derive(Debug)]
pub struct UpstreamClient {
    service: Upstream,
    url: String,
    http: reqwest::Client,
    breaker: Arc<CircuitBreaker>,
    in_flight: Semaphore,
}

impl UpstreamClient {
    /// The service this client talks to.
    pub const fn service(&self) -> Upstream {
        self.service
    }

    /// Fully-qualified URL of the random-entity endpoint.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The breaker guarding this service.
    pub const fn breaker(&self) -> &Arc<CircuitBreaker> {
        &self.breaker
    }

    /// Fetch one random entity.
    ///
    /// Fails fast with [`UpstreamError::CircuitOpen`] while the breaker is
    /// open. Cancelling the returned future releases the in-flight slot and,
    /// for a half-open probe, the probe slot.
    pub async fn fetch<T: DeserializeOwned>(&self) -> Result<T, UpstreamError> {
        let permit = self.breaker.try_acquire()?;
        // Dropping the unsettled permit leaves the breaker untouched: the
        // dependency was never contacted.
        let Ok(_slot) = self.in_flight.acquire().await else {
            return Err(UpstreamError::ClientClosed);
        };

        debug!(
            service = %self.service,
            url = %self.url,
            probe = permit.is_probe(),
            "fetching from upstream"
        );

        let result = self.send().await;
        match &result {
            Err(e) if e.is_breaker_failure() => {
                debug!(service = %self.service, error = %e, "upstream call failed");
                permit.record_failure();
            }
            _ => permit.record_success(),
        }
        result
    }

    async fn send<T: DeserializeOwned>(&self) -> Result<T, UpstreamError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| UpstreamError::from_transport(&e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(UpstreamError::NotFound);
        }
        if !status.is_success() {
            return Err(UpstreamError::Http(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| UpstreamError::from_transport(&e))
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Builds [`UpstreamClient`]s that share one breaker registry.
#[derive(Debug, Clone)]
pub struct UpstreamFactory {
    settings: UpstreamSettings,
    registry: Arc<CircuitBreakerRegistry>,
}

impl UpstreamFactory {
    /// Create a factory handing out breakers from `registry`.
    pub const fn new(settings: UpstreamSettings, registry: Arc<CircuitBreakerRegistry>) -> Self {
        Self { settings, registry }
    }

    /// The breaker registry shared by every client.
    pub const fn registry(&self) -> &Arc<CircuitBreakerRegistry> {
        &self.registry
    }

    /// Build a client for `service` rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns the [`reqwest::Error`] if the HTTP client cannot be built
    /// (e.g. no TLS backend).
    pub fn client(
        &self,
        service: Upstream,
        base_url: &str,
    ) -> Result<UpstreamClient, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .read_timeout(self.settings.read_timeout)
            .timeout(self.settings.total_timeout())
            .pool_max_idle_per_host(self.settings.max_idle_per_host)
            .build()?;

        Ok(UpstreamClient {
            service,
            url: format!("{}{}", base_url.trim_end_matches('/'), service.random_path()),
            http,
            breaker: self.registry.breaker(service.as_str()),
            in_flight: Semaphore::new(self.settings.max_in_flight.max(1)),
        })
    }
}
