//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub weather: WeatherSettings,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Diary store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

fn default_database_path() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("daybook").join("daybook.db").to_string_lossy().to_string())
        .unwrap_or_else(|| "./daybook_data/daybook.db".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
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

    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Weather lookup configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherSettings {
    #[serde(default = "default_weather_enabled")]
    pub enabled: bool,

    #[serde(default = "default_weather_url")]
    pub base_url: String,

    #[serde(default = "default_weather_timeout")]
    pub timeout_ms: u64,
}

fn default_weather_enabled() -> bool {
    true
}

fn default_weather_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_weather_timeout() -> u64 {
    3000
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            enabled: default_weather_enabled(),
            base_url: default_weather_url(),
            timeout_ms: default_weather_timeout(),
        }
    }
}

/// Bearer tokens accepted by the API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
}

/// One accepted token and the user it identifies
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenConfig {
    pub token: String,
    pub user_id: i64,
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

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
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
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("daybook").join("config.toml")),
            Some(PathBuf::from("/etc/daybook/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Storage overrides
        if let Some(path) = var("DAYBOOK_DATABASE_PATH") {
            self.storage.database_path = path;
        }

        // API overrides
        if let Some(host) = var("DAYBOOK_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("DAYBOOK_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Weather overrides
        if let Some(url) = var("DAYBOOK_WEATHER_URL") {
            self.weather.base_url = url;
        }
        if let Some(enabled) = var("DAYBOOK_WEATHER_ENABLED") {
            self.weather.enabled = enabled.to_lowercase() != "false" && enabled != "0";
        }

        // Auth overrides
        if let Some(tokens) = var("DAYBOOK_API_TOKENS") {
            self.auth.tokens = parse_token_list(&tokens);
        }

        // Logging overrides
        if let Some(level) = var("DAYBOOK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("DAYBOOK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Parse `token:user_id,token:user_id`; malformed pairs are skipped
pub fn parse_token_list(raw: &str) -> Vec<TokenConfig> {
    raw.split(',')
        .filter_map(|pair| {
            let (token, user_id) = pair.trim().rsplit_once(':')?;
            let user_id = user_id.trim().parse().ok()?;
            let token = token.trim();
            if token.is_empty() {
                return None;
            }
            Some(TokenConfig {
                token: token.to_string(),
                user_id,
            })
        })
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Daybook Configuration
#
# Environment variables override these settings:
# - DAYBOOK_DATABASE_PATH
# - DAYBOOK_API_HOST
# - DAYBOOK_API_PORT
# - DAYBOOK_WEATHER_URL
# - DAYBOOK_WEATHER_ENABLED
# - DAYBOOK_API_TOKENS (token:user_id,token:user_id)
# - DAYBOOK_LOG_LEVEL
# - DAYBOOK_LOG_FORMAT

[storage]
# SQLite database file
database_path = "~/.local/share/daybook/daybook.db"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 3000

# Allowed CORS origins
cors_origins = ["http://localhost:5173"]

# Request timeout in seconds
request_timeout_secs = 30

[weather]
# Attach the current weather to entries created with coordinates
enabled = true

# Open-Meteo forecast endpoint
base_url = "https://api.open-meteo.com/v1/forecast"

# Lookup timeout (ms); on timeout the entry gets "Unknown"
timeout_ms = 3000

# Bearer tokens accepted by the API
# [[auth.tokens]]
# token = "change-me"
# user_id = 1

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
