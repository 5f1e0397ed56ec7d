//! Configuration module for Parlor.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use chrono_tz::Tz;

use crate::{ParlorError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Timezone used for message timestamps (e.g., "UTC", "America/Sao_Paulo").
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            timezone: default_timezone(),
        }
    }
}

/// Presence tracking configuration.
///
/// The TTL and the sweep cadence are independent knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct PresenceConfig {
    /// Seconds without a heartbeat before a participant counts as expired.
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
    /// Seconds between sweep passes.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_ttl() -> u64 {
    10
}

fn default_sweep_interval() -> u64 {
    15
}

impl PresenceConfig {
    /// Participant time-to-live.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Interval between sweep passes.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite message log. Empty keeps messages in memory only.
    #[serde(default)]
    pub path: String,
}

impl DatabaseConfig {
    /// Whether a message log should be opened.
    pub fn is_enabled(&self) -> bool {
        !self.path.trim().is_empty()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty logs to the console only.
    #[serde(default)]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Presence tracking configuration.
    #[serde(default)]
    pub presence: PresenceConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ParlorError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ParlorError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PARLOR_PORT`: Override the HTTP port
    /// - `PARLOR_DATABASE_PATH`: Override the message log path
    pub fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("PARLOR_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid PARLOR_PORT"),
            }
        }

        if let Ok(path) = std::env::var("PARLOR_DATABASE_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the TTL or the sweep interval is zero
    /// - the timezone is not a known IANA name
    pub fn validate(&self) -> Result<()> {
        if self.presence.ttl_secs == 0 {
            return Err(ParlorError::Config(
                "presence.ttl_secs must be greater than zero".to_string(),
            ));
        }
        if self.presence.sweep_interval_secs == 0 {
            return Err(ParlorError::Config(
                "presence.sweep_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.server.timezone.parse::<Tz>().is_err() {
            return Err(ParlorError::Config(format!(
                "unknown timezone: {}",
                self.server.timezone
            )));
        }
        Ok(())
    }
}
