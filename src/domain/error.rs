use thiserror::Error;

/// Errors returned by the ClickUp REST API adapter
#[derive(Error, Debug)]
pub enum ClickUpApiError {
    /// Malformed request or rejected parameters (400)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Missing, expired or insufficiently scoped token (401, 403)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Referenced list, task, folder or space does not exist (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// ClickUp rate limit hit (429)
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// ClickUp returned a 5xx
    #[error("API server error: {0}")]
    ServerError(String),

    /// Connection-level failure before a response arrived
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Response body did not match the expected shape
    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Timeout waiting for response")]
    Timeout,

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ClickUpApiError {
    /// Returns true if this error is transient and the request may be retried
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimitExceeded | Self::ServerError(_) | Self::Timeout | Self::NetworkError(_)
        )
    }

    /// Map an HTTP status code and response body to an error variant
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            400 | 422 => Self::InvalidRequest(body),
            401 | 403 => Self::AuthenticationFailed(body),
            404 => Self::NotFound(body),
            429 => Self::RateLimitExceeded,
            500..=599 => Self::ServerError(body),
            _ => Self::Unknown(format!("HTTP {status}: {body}")),
        }
    }
}

/// Errors from the OAuth flow and token storage
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid state parameter")]
    InvalidState,

    #[error("Failed to complete OAuth flow")]
    ExchangeFailed(#[source] ClickUpApiError),

    #[error("No token data found")]
    NoTokenData,

    #[error("No refresh token available")]
    NoRefreshToken,

    #[error("Failed to refresh token")]
    RefreshFailed(#[source] ClickUpApiError),

    #[error("Failed to generate authorization URL: {0}")]
    AuthorizationUrl(String),

    #[error("Token storage error: {0}")]
    Storage(#[from] SecurityError),
}

/// Errors from token encryption and the token vault
#[derive(Error, Debug)]
pub enum SecurityError {
    #[error("Failed to encrypt token data")]
    Encryption,

    #[error("Failed to decrypt token data")]
    Decryption,

    #[error("Invalid token encoding: {0}")]
    Encoding(String),

    #[error("Token serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Token file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by the ClickUp service to its callers
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    /// An upstream call failed; the display text names the failed operation
    #[error("{operation}")]
    Upstream {
        operation: &'static str,
        #[source]
        source: ClickUpApiError,
    },

    #[error("No authentication token found")]
    Unauthenticated,

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ServiceError {
    pub const fn upstream(operation: &'static str, source: ClickUpApiError) -> Self {
        Self::Upstream { operation, source }
    }
}
