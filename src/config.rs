//! Configuration management for the RemixCuisine engine
//!
//! Strongly-typed configuration read from environment variables (and a
//! `.env` file when present), with defaults suited to local development.
//!
//! # Example
//! ```no_run
//! use remixcuisine::Config;
//! let config = Config::from_env().expect("failed to load config");
//! println!("Model: {}", config.generator.model);
//! ```

use crate::error::{Error, Result};
use std::time::Duration;
use tracing::info;

pub const DEFAULT_AI_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_AI_MODEL: &str = "claude-sonnet-4-20250514";

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Key-value storage configuration
    pub storage: StorageConfig,
    /// AI recipe generation endpoint
    pub generator: GeneratorConfig,
    /// API server configuration
    pub api: ApiConfig,
}

/// Which key-value backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres,
}

impl std::str::FromStr for StorageBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            other => Err(Error::InvalidConfig {
                key: "STORAGE_BACKEND",
                message: format!("unknown backend '{}', expected memory or postgres", other)
                    .into(),
            }),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Owner of the per-user keys (one active user session)
    pub owner: String,
    /// Display name for a freshly created profile
    pub default_name: String,
    pub database: DatabaseConfig,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum connections in pool
    pub max_connections: u32,
    /// Minimum connections to keep open
    pub min_connections: u32,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Idle timeout for connections
    pub idle_timeout: Duration,
}

/// AI text-generation endpoint configuration
#[derive(Clone)]
pub struct GeneratorConfig {
    pub api_url: String,
    /// Sent as `x-api-key` when set
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    /// Whole-request timeout; expiry is reported as a generation failure
    pub timeout: Duration,
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "****"))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_AI_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_AI_MODEL.to_string(),
            max_tokens: 1000,
            timeout: Duration::from_secs(60),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Port to listen on
    pub port: u16,
    /// Host to bind to
    pub host: String,
    /// Enable permissive CORS for the browser front-end
    pub cors_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Try to load .env file (ignore if not found)
        dotenvy::dotenv().ok();

        let config = Self {
            storage: StorageConfig::from_env()?,
            generator: GeneratorConfig::from_env()?,
            api: ApiConfig::from_env()?,
        };

        config.validate()?;
        config.log_summary();

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.storage.owner.trim().is_empty() {
            return Err(Error::InvalidConfig {
                key: "PROFILE_OWNER",
                message: "profile owner cannot be empty".into(),
            });
        }

        if self.storage.backend == StorageBackend::Postgres {
            if self.storage.database.url.is_empty() {
                return Err(Error::MissingEnvVar { var: "DATABASE_URL" });
            }
            if self.storage.database.max_connections < self.storage.database.min_connections {
                return Err(Error::InvalidConfig {
                    key: "DB_MAX_CONNECTIONS",
                    message: "max_connections must be >= min_connections".into(),
                });
            }
        }

        if !self.generator.api_url.starts_with("http://")
            && !self.generator.api_url.starts_with("https://")
        {
            return Err(Error::InvalidConfig {
                key: "AI_API_URL",
                message: format!("not an http(s) URL: {}", self.generator.api_url).into(),
            });
        }

        if self.generator.timeout.is_zero() {
            return Err(Error::InvalidConfig {
                key: "AI_TIMEOUT_SECS",
                message: "timeout must be greater than zero".into(),
            });
        }

        Ok(())
    }

    /// Log configuration summary (without sensitive data)
    fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  Storage:");
        info!("    Backend: {:?}", self.storage.backend);
        info!("    Owner: {}", self.storage.owner);
        if self.storage.backend == StorageBackend::Postgres {
            info!("    Database: {}", mask_url(&self.storage.database.url));
            info!(
                "    Pool Size: {}-{}",
                self.storage.database.min_connections, self.storage.database.max_connections
            );
        }
        info!("  Generator:");
        info!("    Endpoint: {}", self.generator.api_url);
        info!("    Model: {}", self.generator.model);
        info!("    API key set: {}", self.generator.api_key.is_some());
        info!("    Timeout: {:?}", self.generator.timeout);
        info!("  API:");
        info!("    Listening on: {}:{}", self.api.host, self.api.port);
    }
}

impl StorageConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            backend: get_env_or("STORAGE_BACKEND", "memory").parse()?,
            owner: get_env_or("PROFILE_OWNER", "local"),
            default_name: get_env_or("PROFILE_DEFAULT_NAME", crate::models::DEFAULT_NAME),
            database: DatabaseConfig::from_env()?,
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            url: get_env_or("DATABASE_URL", ""),
            max_connections: get_env_or("DB_MAX_CONNECTIONS", "5").parse().unwrap_or(5),
            min_connections: get_env_or("DB_MIN_CONNECTIONS", "1").parse().unwrap_or(1),
            connect_timeout: Duration::from_secs(
                get_env_or("DB_CONNECT_TIMEOUT_SECS", "30")
                    .parse()
                    .unwrap_or(30),
            ),
            idle_timeout: Duration::from_secs(
                get_env_or("DB_IDLE_TIMEOUT_SECS", "600")
                    .parse()
                    .unwrap_or(600),
            ),
        })
    }
}

impl GeneratorConfig {
    fn from_env() -> Result<Self> {
        let api_key = get_env_or("AI_API_KEY", "");
        Ok(Self {
            api_url: get_env_or("AI_API_URL", DEFAULT_AI_API_URL),
            api_key: if api_key.is_empty() { None } else { Some(api_key) },
            model: get_env_or("AI_MODEL", DEFAULT_AI_MODEL),
            max_tokens: get_env_parsed_or("AI_MAX_TOKENS", 1000)?,
            timeout: Duration::from_secs(get_env_parsed_or("AI_TIMEOUT_SECS", 60)?),
        })
    }
}

impl ApiConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            port: get_env_or("API_PORT", "8080").parse().unwrap_or(8080),
            host: get_env_or("API_HOST", "0.0.0.0"),
            cors_enabled: get_env_or("API_CORS_ENABLED", "true")
                .parse()
                .unwrap_or(true),
        })
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get environment variable with default
fn get_env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional environment variable, rejecting malformed values
fn get_env_parsed_or<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value.parse().map_err(|e: T::Err| Error::InvalidConfig {
            key,
            message: format!("Invalid value '{}': {}", value, e).into(),
        }),
        Err(_) => Ok(default),
    }
}

/// Mask sensitive parts of URL
fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let (before, after) = url.split_at(colon_pos + 1);
            let (_, rest) = after.split_at(at_pos - colon_pos - 1);
            return format!("{}****{}", before, rest);
        }
    }
    url.to_string()
}
