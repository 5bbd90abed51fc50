use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for the ClickUp MCP server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// ClickUp API and OAuth application configuration
    #[serde(default)]
    pub clickup: ClickUpConfig,

    /// Token encryption and storage configuration
    #[serde(default)]
    pub security: SecurityConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the static pages (index, OAuth success page)
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,

    /// Whether to enable permissive CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    3000
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

const fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_dir: default_public_dir(),
            enable_cors: true,
        }
    }
}

/// ClickUp API and OAuth application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ClickUpConfig {
    /// OAuth application client id
    #[serde(default)]
    pub client_id: String,

    /// OAuth application client secret
    #[serde(default)]
    pub client_secret: String,

    /// OAuth redirect URI; derived from the server port when unset
    #[serde(default)]
    pub redirect_uri: Option<String>,

    /// Base URL of the ClickUp REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// URL of the ClickUp OAuth authorization page
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// Personal API token used by the stdio server instead of OAuth
    #[serde(default)]
    pub api_token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.clickup.com/api/v2".to_string()
}

fn default_auth_url() -> String {
    "https://app.clickup.com/api".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClickUpConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: None,
            api_url: default_api_url(),
            auth_url: default_auth_url(),
            api_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// OAuth settings resolved against the server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub api_url: String,
    pub auth_url: String,
}

impl Config {
    /// Redirect URI, falling back to the local callback route on the configured port
    pub fn redirect_uri(&self) -> String {
        self.clickup.redirect_uri.clone().unwrap_or_else(|| {
            format!(
                "http://localhost:{}/oauth/clickup/callback",
                self.server.port
            )
        })
    }

    /// OAuth settings used by the authorization flow
    pub fn oauth(&self) -> OAuthConfig {
        OAuthConfig {
            client_id: self.clickup.client_id.clone(),
            client_secret: self.clickup.client_secret.clone(),
            redirect_uri: self.redirect_uri(),
            api_url: self.clickup.api_url.clone(),
            auth_url: self.clickup.auth_url.clone(),
        }
    }
}

/// Token encryption and storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SecurityConfig {
    /// Secret the token encryption key is derived from.
    /// A random per-process key is used when unset.
    #[serde(default)]
    pub encryption_key: Option<String>,

    /// File the encrypted token vault is persisted to (in-memory only when unset)
    #[serde(default)]
    pub token_file: Option<PathBuf>,

    /// Seconds an OAuth state stays valid
    #[serde(default = "default_state_ttl_secs")]
    pub state_ttl_secs: u64,

    /// Days an access token is treated as valid after issue or refresh
    #[serde(default = "default_token_lifetime_days")]
    pub token_lifetime_days: i64,
}

const fn default_state_ttl_secs() -> u64 {
    600
}

const fn default_token_lifetime_days() -> i64 {
    7
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            encryption_key: None,
            token_file: None,
            state_ttl_secs: default_state_ttl_secs(),
            token_lifetime_days: default_token_lifetime_days(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
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
            log_dir: None,
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RateLimitConfig {
    /// Outbound requests per minute to the ClickUp API
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,

    /// Inbound requests per minute per team on protected HTTP routes
    #[serde(default = "default_inbound_per_minute")]
    pub inbound_per_minute: u32,
}

const fn default_requests_per_minute() -> u32 {
    100
}

const fn default_inbound_per_minute() -> u32 {
    60
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: default_requests_per_minute(),
            inbound_per_minute: default_inbound_per_minute(),
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    500
}

const fn default_max_backoff_ms() -> u64 {
    8_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}
