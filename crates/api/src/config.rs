//! Application configuration loaded from environment variables.

use domain::{DrinkSize, DrinkSizeVolume, ReservoirSettings, Volume};
use thiserror::Error;

const DEFAULT_RESERVOIR_VOLUME: i64 = 10_000;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// A configuration value that could not be used.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid value for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub reason: String,
}

impl ConfigError {
    fn new(key: &'static str, reason: impl Into<String>) -> Self {
        Self {
            key,
            reason: reason.into(),
        }
    }
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT` — `text` or `json` (default: `text`)
/// - `DATABASE_URL` — PostgreSQL URL; unset keeps everything in memory
/// - `DATABASE_MAX_CONNECTIONS` — pool size (default: `5`)
/// - `RESERVOIR_VOLUME` — initial water volume (default: `10000`)
/// - `DRINK_SIZE_VOLUMES` — e.g. `Small=100,Medium=250,Large=400`
/// - `ALLOWED_BEVERAGE_TYPES` — comma list; empty allows every type
///
/// The reservoir values are only used to seed a store that has no settings yet.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub reservoir_volume: i64,
    pub drink_sizes: Vec<DrinkSizeVolume>,
    pub allowed_types: Vec<String>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_format = match lookup("LOG_FORMAT") {
            Some(v) => parse_log_format(&v)?,
            None => defaults.log_format,
        };
        let reservoir_volume = match lookup("RESERVOIR_VOLUME") {
            Some(v) => parse_reservoir_volume(&v)?,
            None => defaults.reservoir_volume,
        };
        let drink_sizes = match lookup("DRINK_SIZE_VOLUMES") {
            Some(v) => parse_drink_sizes(&v)?,
            None => defaults.drink_sizes,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format,
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.database_max_connections),
            reservoir_volume,
            drink_sizes,
            allowed_types: lookup("ALLOWED_BEVERAGE_TYPES")
                .map(|v| parse_list(&v))
                .unwrap_or(defaults.allowed_types),
        })
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Settings to seed an unprovisioned store with.
    pub fn reservoir_settings(&self) -> ReservoirSettings {
        ReservoirSettings::new(
            Volume::new(self.reservoir_volume),
            self.drink_sizes.clone(),
            self.allowed_types.clone(),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            database_url: None,
            database_max_connections: 5,
            reservoir_volume: DEFAULT_RESERVOIR_VOLUME,
            drink_sizes: ReservoirSettings::default_drink_sizes(),
            allowed_types: Vec::new(),
        }
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "text" | "" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        other => Err(ConfigError::new(
            "LOG_FORMAT",
            format!("expected `text` or `json`, got `{other}`"),
        )),
    }
}

fn parse_reservoir_volume(value: &str) -> Result<i64, ConfigError> {
    let volume: i64 = value
        .trim()
        .parse()
        .map_err(|e| ConfigError::new("RESERVOIR_VOLUME", format!("{e}")))?;
    if volume < 0 {
        return Err(ConfigError::new("RESERVOIR_VOLUME", "must not be negative"));
    }
    Ok(volume)
}

fn parse_drink_sizes(value: &str) -> Result<Vec<DrinkSizeVolume>, ConfigError> {
    const KEY: &str = "DRINK_SIZE_VOLUMES";

    let mut sizes: Vec<DrinkSizeVolume> = Vec::new();
    for entry in parse_list(value) {
        let (size, volume) = entry
            .split_once('=')
            .ok_or_else(|| ConfigError::new(KEY, format!("`{entry}` is not `Size=volume`")))?;
        let size: DrinkSize = size
            .trim()
            .parse()
            .map_err(|e| ConfigError::new(KEY, format!("{e}")))?;
        let volume: i64 = volume
            .trim()
            .parse()
            .map_err(|e| ConfigError::new(KEY, format!("{size}: {e}")))?;
        if volume <= 0 {
            return Err(ConfigError::new(KEY, format!("{size}: volume must be positive")));
        }
        if sizes.iter().any(|s| s.size == size) {
            return Err(ConfigError::new(KEY, format!("{size} is listed twice")));
        }
        sizes.push(DrinkSizeVolume::new(size, Volume::new(volume)));
    }
    Ok(sizes)
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
