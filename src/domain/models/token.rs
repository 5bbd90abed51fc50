use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::id;

/// OAuth token pair stored (encrypted) per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
}

impl TokenData {
    /// Build a token pair that expires `lifetime` from now, saturating at the
    /// latest representable time
    pub fn issued_now(
        access_token: String,
        refresh_token: String,
        lifetime: Duration,
        team_id: Option<String>,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at: Utc::now()
                .checked_add_signed(lifetime)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            team_id,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Grant sent to the ClickUp token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "grant_type", rename_all = "snake_case")]
pub enum TokenGrant {
    AuthorizationCode { code: String },
    RefreshToken { refresh_token: String },
}

/// Full token endpoint request body.
#[derive(Debug, Clone, Serialize)]
pub struct TokenRequest {
    pub client_id: String,
    pub client_secret: String,
    #[serde(flatten)]
    pub grant: TokenGrant,
}

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<AuthorizedUser>,
}

/// The user an access token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizedUser {
    #[serde(deserialize_with = "id::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Authorization page URL together with the state it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationUrl {
    pub url: String,
    pub state: String,
}
