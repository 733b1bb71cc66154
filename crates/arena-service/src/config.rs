//! Layered configuration loading.
//!
//! Every arena binary reads one optional YAML file (path in `ARENA_CONFIG`,
//! otherwise a per-service default) overlaid by environment variables
//! prefixed `ARENA` with `__` as the nesting separator, e.g.
//! `ARENA__SERVER__PORT=8082`. The result is deserialized into the
//! service's own typed config and validated before use.

use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use validator::Validate;

/// Environment variable naming the YAML config file.
pub const CONFIG_PATH_ENV: &str = "ARENA_CONFIG";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "ARENA";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load config: {0}")]
    Load(#[from] config::ConfigError),

    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Listen address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
}

impl ServerConfig {
    /// All interfaces on `port`.
    pub fn on_port(port: u16) -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::on_port(8080)
    }
}

/// Load `T` from the file named by `ARENA_CONFIG` (or `default_path`, if
/// present) and `ARENA__*` environment variables, then validate.
pub fn load<T>(default_path: &str) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Validate,
{
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| default_path.to_owned());
    let config = Config::builder()
        .add_source(File::new(&path, FileFormat::Yaml).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;
    validated(config.try_deserialize()?)
}

/// Parse `T` from a YAML document alone, then validate.
pub fn from_yaml_str<T>(yaml: &str) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Validate,
{
    let config = Config::builder()
        .add_source(File::from_str(yaml, FileFormat::Yaml))
        .build()?;
    validated(config.try_deserialize()?)
}

fn validated<T: Validate>(value: T) -> Result<T, ConfigError> {
    value.validate()?;
    Ok(value)
}

/// Whole milliseconds in `d`, saturating.
pub fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
