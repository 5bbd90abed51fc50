use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project-local configuration file
pub const CONFIG_FILE: &str = "clickup-mcp.yaml";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid URL for {field}: {value}. Must start with http:// or https://")]
    InvalidUrl { field: &'static str, value: String },

    #[error("Invalid rate limit for {0}: must be at least 1")]
    InvalidRateLimit(&'static str),

    #[error("Invalid max_retries: {0}. Cannot be 0")]
    InvalidMaxRetries(u32),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Invalid security.token_lifetime_days: {0}. Must be between 1 and {max}", max = MAX_TOKEN_LIFETIME_DAYS)]
    InvalidTokenLifetime(i64),

    #[error("Invalid security.state_ttl_secs: cannot be 0")]
    InvalidStateTtl,

    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingEnvironment(Vec<&'static str>),
}

/// Upper bound for `security.token_lifetime_days`
pub const MAX_TOKEN_LIFETIME_DAYS: i64 = 365;

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. clickup-mcp.yaml in the working directory (optional)
    /// 3. Plain environment variables (CLICKUP_CLIENT_ID, PORT, LOG_LEVEL, ...)
    /// 4. CLICKUP_MCP_* prefixed variables, nested with `__`
    pub fn load() -> Result<Config> {
        Self::load_from(CONFIG_FILE)
    }

    /// Same hierarchy with an explicit YAML file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(plain_env())
            .merge(Env::prefixed("CLICKUP_MCP_").split("__"))
            .extract()
            .with_context(|| {
                format!(
                    "Failed to load configuration (file: {})",
                    path.as_ref().display()
                )
            })?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty", "text"];
        if !valid_log_formats.contains(&config.logging.format.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        check_url("clickup.api_url", &config.clickup.api_url)?;
        check_url("clickup.auth_url", &config.clickup.auth_url)?;
        if let Some(ref redirect_uri) = config.clickup.redirect_uri {
            check_url("clickup.redirect_uri", redirect_uri)?;
        }

        if config.rate_limit.requests_per_minute == 0 {
            return Err(ConfigError::InvalidRateLimit("rate_limit.requests_per_minute"));
        }
        if config.rate_limit.inbound_per_minute == 0 {
            return Err(ConfigError::InvalidRateLimit("rate_limit.inbound_per_minute"));
        }

        if !(1..=MAX_TOKEN_LIFETIME_DAYS).contains(&config.security.token_lifetime_days) {
            return Err(ConfigError::InvalidTokenLifetime(
                config.security.token_lifetime_days,
            ));
        }
        if config.security.state_ttl_secs == 0 {
            return Err(ConfigError::InvalidStateTtl);
        }

        if config.retry.max_retries == 0 {
            return Err(ConfigError::InvalidMaxRetries(config.retry.max_retries));
        }

        if config.retry.initial_backoff_ms >= config.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.retry.initial_backoff_ms,
                config.retry.max_backoff_ms,
            ));
        }

        Ok(())
    }

    /// OAuth application credentials are only needed by the HTTP server
    pub fn require_oauth_credentials(config: &Config) -> Result<(), ConfigError> {
        let mut missing = Vec::new();
        if config.clickup.client_id.trim().is_empty() {
            missing.push("CLICKUP_CLIENT_ID");
        }
        if config.clickup.client_secret.trim().is_empty() {
            missing.push("CLICKUP_CLIENT_SECRET");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingEnvironment(missing))
        }
    }
}

/// Unprefixed variables the server has always read, mapped onto config keys
fn plain_env() -> Env {
    Env::raw().filter_map(|key| {
        let mapped = match key.as_str().to_ascii_uppercase().as_str() {
            "CLICKUP_CLIENT_ID" => "clickup.client_id",
            "CLICKUP_CLIENT_SECRET" => "clickup.client_secret",
            "CLICKUP_REDIRECT_URI" => "clickup.redirect_uri",
            "CLICKUP_API_TOKEN" => "clickup.api_token",
            "PORT" => "server.port",
            "LOG_LEVEL" => "logging.level",
            "ENCRYPTION_KEY" => "security.encryption_key",
            _ => return None,
        };
        Some(mapped.into())
    })
}

fn check_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidUrl {
            field,
            value: value.to_string(),
        })
    }
}
