//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::ApiConfig as ServerApiConfig;
use crate::refresh::RefreshConfig as PollConfig;
use crate::upstream::UpstreamConfig as ClientUpstreamConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub refresh: RefreshConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub theme: Theme,
}

/// Upstream sales API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_base_url() -> String {
    "https://sales-analytics-tz2v.onrender.com".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000 // 10 seconds
}

fn default_max_attempts() -> u32 {
    2
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

/// Poll loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_refresh_enabled")]
    pub enabled: bool,

    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_refresh_enabled() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    60
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            enabled: default_refresh_enabled(),
            interval_secs: default_interval_secs(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8050
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Colour palette handed to the rendering layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub background: String,
    pub card: String,
    pub text: String,
    /// Secondary text (card titles, labels)
    pub muted: String,
    pub accent1: String,
    pub accent2: String,
    pub accent3: String,
    pub success: String,
    pub warning: String,
    /// Slice colours for the category distribution chart
    pub charts: Vec<String>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: "#000000".to_string(),
            card: "#1a1a1a".to_string(),
            text: "#ffffff".to_string(),
            muted: "#8E8E93".to_string(),
            accent1: "#0A84FF".to_string(),
            accent2: "#5E5CE6".to_string(),
            accent3: "#FF375F".to_string(),
            success: "#30D158".to_string(),
            warning: "#FF9F0A".to_string(),
            charts: ["#0A84FF", "#5E5CE6", "#FF375F", "#30D158", "#FF9F0A"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from `SALES_CONFIG`, default locations or environment
    ///
    /// A path named by `SALES_CONFIG` must exist. A config file that exists
    /// but does not parse or validate is an error, never skipped.
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var("SALES_CONFIG") {
            return Self::load_with_env(Path::new(&path));
        }

        let config_paths = [
            dirs::config_dir().map(|p| p.join("sales-analytics").join("config.toml")),
            Some(PathBuf::from("/etc/sales-analytics/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        Self::load_first_existing(config_paths.iter().flatten())
    }

    /// Load the first path that exists, or fall back to environment-only config
    fn load_first_existing<'a>(
        paths: impl IntoIterator<Item = &'a PathBuf>,
    ) -> Result<Self, ConfigError> {
        for path in paths {
            if path.exists() {
                let config = Self::load_with_env(path)?;
                tracing::info!("Loaded config from {:?}", path);
                return Ok(config);
            }
        }

        tracing::info!("Using default config with environment overrides");
        Ok(Self::from_env())
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("upstream.base_url must not be empty".into()));
        }
        if self.upstream.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "upstream.request_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.upstream.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "upstream.max_attempts must be at least 1".into(),
            ));
        }
        if self.refresh.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "refresh.interval_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Settings for the upstream HTTP client
    pub fn upstream_client_config(&self) -> ClientUpstreamConfig {
        ClientUpstreamConfig {
            base_url: self.upstream.base_url.clone(),
            request_timeout_ms: self.upstream.request_timeout_ms,
            max_attempts: self.upstream.max_attempts,
        }
    }

    /// Settings for the refresh poll loop
    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            enabled: self.refresh.enabled,
            interval_secs: self.refresh.interval_secs,
        }
    }

    /// Settings for the API server
    pub fn server_config(&self) -> ServerApiConfig {
        ServerApiConfig::new(self.api.host.clone(), self.api.port)
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Upstream overrides
        if let Ok(url) = std::env::var("SALES_UPSTREAM_URL") {
            self.upstream.base_url = url;
        }
        if let Ok(timeout) = std::env::var("SALES_UPSTREAM_TIMEOUT_MS") {
            if let Ok(t) = timeout.parse() {
                self.upstream.request_timeout_ms = t;
            }
        }

        // Refresh overrides
        if let Ok(interval) = std::env::var("SALES_REFRESH_INTERVAL_SECS") {
            if let Ok(i) = interval.parse() {
                self.refresh.interval_secs = i;
            }
        }

        // API overrides
        if let Ok(host) = std::env::var("SALES_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("SALES_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("SALES_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("SALES_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r##"# Sales Analytics Configuration
#
# Environment variables override these settings:
# - SALES_CONFIG (path of this file)
# - SALES_UPSTREAM_URL
# - SALES_UPSTREAM_TIMEOUT_MS
# - SALES_REFRESH_INTERVAL_SECS
# - SALES_API_HOST
# - SALES_API_PORT
# - SALES_LOG_LEVEL
# - SALES_LOG_FORMAT

[upstream]
# Base URL of the sales API; /sales/day, /sales/category and
# /sales/product are requested below it
base_url = "https://sales-analytics-tz2v.onrender.com"

# Per-request timeout (ms); a timeout counts as a failed fetch
request_timeout_ms = 10000

# Attempts per fetch (connection errors and timeouts only)
max_attempts = 2

[refresh]
# Poll the upstream in the background
enabled = true

# Seconds between refreshes
interval_secs = 60

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8050

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

[theme]
background = "#000000"
card = "#1a1a1a"
text = "#ffffff"
muted = "#8E8E93"
accent1 = "#0A84FF"
accent2 = "#5E5CE6"
accent3 = "#FF375F"
success = "#30D158"
warning = "#FF9F0A"
charts = ["#0A84FF", "#5E5CE6", "#FF375F", "#30D158", "#FF9F0A"]
"##
    .to_string()
}
