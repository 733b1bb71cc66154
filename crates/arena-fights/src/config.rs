//! Typed configuration for the fights service.
//!
//! Loaded through [`arena_service::config`] from `config/fights.yaml` and
//! `ARENA__*` overrides such as `ARENA__UPSTREAMS__HEROES_URL=http://heroes:8000`.

use std::time::Duration;

use arena_resilience::CircuitBreakerConfig;
use arena_service::{ConfigError, LogFormat, ServerConfig, duration_ms};
use serde::Deserialize;
use validator::Validate;

use crate::upstream::UpstreamSettings;

/// Config file used when `ARENA_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/fights.yaml";

/// Default end-to-end budget for one fight, in milliseconds.
pub const DEFAULT_FIGHT_DEADLINE_MS: u64 = 8_000;

/// Where the data services live and how to talk to them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(default)]
pub struct UpstreamsConfig {
    /// Base URL of the heroes service.
    #[validate(url)]
    pub heroes_url: String,
    /// Base URL of the villains service.
    #[validate(url)]
    pub villains_url: String,
    /// Base URL of the locations service.
    #[validate(url)]
    pub locations_url: String,
    /// TCP connect budget, in milliseconds.
    #[validate(range(min = 1))]
    pub connect_timeout_ms: u64,
    /// Response budget, in milliseconds.
    #[validate(range(min = 1))]
    pub read_timeout_ms: u64,
    /// Request upload budget, in milliseconds.
    #[validate(range(min = 1))]
    pub write_timeout_ms: u64,
    /// Concurrent in-flight requests per upstream.
    #[validate(range(min = 1))]
    pub max_connections: usize,
    /// Idle keep-alive connections kept per host.
    pub max_idle_per_host: usize,
}

impl Default for UpstreamsConfig {
    fn default() -> Self {
        let settings = UpstreamSettings::default();
        Self {
            heroes_url: String::from("http://localhost:8081"),
            villains_url: String::from("http://localhost:8082"),
            locations_url: String::from("http://localhost:8083"),
            connect_timeout_ms: duration_ms(settings.connect_timeout),
            read_timeout_ms: duration_ms(settings.read_timeout),
            write_timeout_ms: duration_ms(settings.write_timeout),
            max_connections: settings.max_in_flight,
            max_idle_per_host: settings.max_idle_per_host,
        }
    }
}

impl UpstreamsConfig {
    /// Client settings shared by all three upstreams.
    pub const fn settings(&self) -> UpstreamSettings {
        UpstreamSettings {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            read_timeout: Duration::from_millis(self.read_timeout_ms),
            write_timeout: Duration::from_millis(self.write_timeout_ms),
            max_in_flight: self.max_connections,
            max_idle_per_host: self.max_idle_per_host,
        }
    }
}

/// Circuit breaker tuning applied to every upstream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(default)]
pub struct BreakerConfig {
    /// Failures within the window that open a circuit.
    #[validate(range(min = 1))]
    pub failure_threshold: u32,
    /// Sliding window over which failures are counted.
    #[validate(range(min = 1))]
    pub window_secs: u64,
    /// Open time before a probe is admitted.
    #[validate(range(min = 1))]
    pub cool_down_secs: u64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        let defaults = CircuitBreakerConfig::default();
        Self {
            failure_threshold: defaults.failure_threshold,
            window_secs: defaults.window.as_secs(),
            cool_down_secs: defaults.cool_down.as_secs(),
        }
    }
}

impl BreakerConfig {
    /// The equivalent [`CircuitBreakerConfig`].
    pub const fn breaker_config(&self) -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            failure_threshold: self.failure_threshold,
            window: Duration::from_secs(self.window_secs),
            cool_down: Duration::from_secs(self.cool_down_secs),
        }
    }
}

/// Top-level fights service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(default)]
pub struct FightsConfig {
    /// Listen address.
    pub server: ServerConfig,
    /// Data service endpoints and client limits.
    #[validate(nested)]
    pub upstreams: UpstreamsConfig,
    /// Breaker tuning.
    #[validate(nested)]
    pub circuit_breaker: BreakerConfig,
    /// End-to-end budget for one orchestrated request, in milliseconds.
    #[validate(range(min = 1))]
    pub fight_deadline_ms: u64,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for FightsConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::on_port(8080),
            upstreams: UpstreamsConfig::default(),
            circuit_breaker: BreakerConfig::default(),
            fight_deadline_ms: DEFAULT_FIGHT_DEADLINE_MS,
            log_format: LogFormat::default(),
        }
    }
}

impl FightsConfig {
    /// Load from the file named by `ARENA_CONFIG` (or the default path, if
    /// present) and `ARENA__*` environment variables, then validate.
    pub fn load() -> Result<Self, ConfigError> {
        arena_service::config::load(DEFAULT_CONFIG_PATH)
    }

    /// Parse a YAML document on its own, then validate.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        arena_service::config::from_yaml_str(yaml)
    }

    /// End-to-end budget for one orchestrated request.
    pub const fn fight_deadline(&self) -> Duration {
        Duration::from_millis(self.fight_deadline_ms)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_limits() {
        let config = FightsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fight_deadline(), Duration::from_secs(8));

        let settings = config.upstreams.settings();
        assert_eq!(settings.connect_timeout, Duration::from_secs(2));
        assert_eq!(settings.read_timeout, Duration::from_secs(5));
        assert_eq!(settings.write_timeout, Duration::from_secs(2));
        assert_eq!(settings.total_timeout(), Duration::from_secs(9));
        assert_eq!(settings.max_in_flight, 100);
        assert_eq!(settings.max_idle_per_host, 20);

        let breaker = config.circuit_breaker.breaker_config();
        assert_eq!(breaker, CircuitBreakerConfig::default());
    }

    #[test]
    fn yaml_overrides_nested_values() {
        let config = FightsConfig::from_yaml_str(
            "upstreams:\n  heroes_url: http://heroes:8000\n  read_timeout_ms: 750\n\
             circuit_breaker:\n  failure_threshold: 3\nlog_format: json\n",
        )
        .unwrap();
        assert_eq!(config.upstreams.heroes_url, "http://heroes:8000");
        assert_eq!(config.upstreams.villains_url, "http://localhost:8082");
        assert_eq!(config.upstreams.read_timeout_ms, 750);
        assert_eq!(config.circuit_breaker.failure_threshold, 3);
        assert_eq!(config.circuit_breaker.cool_down_secs, 60);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn zero_threshold_is_rejected() {
        let result = FightsConfig::from_yaml_str("circuit_breaker:\n  failure_threshold: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = FightsConfig::from_yaml_str("upstreams:\n  connect_timeout_ms: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_url_is_rejected() {
        let result = FightsConfig::from_yaml_str("upstreams:\n  locations_url: not a url\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
