use async_trait::async_trait;
use chrono::Duration as ChronoDuration;
use reqwest::Url;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::error::AuthError;
use crate::domain::models::{AuthorizationUrl, OAuthConfig, SecurityConfig, TokenData, TokenGrant};
use crate::domain::ports::{Authenticator, ClickUpApi};
use crate::infrastructure::config::MAX_TOKEN_LIFETIME_DAYS;
use crate::infrastructure::security::TokenVault;

/// Token lifetime clamped to the range config validation accepts
fn token_lifetime(days: i64) -> ChronoDuration {
    ChronoDuration::try_days(days.clamp(1, MAX_TOKEN_LIFETIME_DAYS))
        .unwrap_or_else(|| ChronoDuration::days(1))
}

/// OAuth2 authorization-code flow against ClickUp.
///
/// Pending states are single use and expire after the configured TTL.
/// Token pairs are kept encrypted in the [`TokenVault`], keyed by the
/// ClickUp user id.
pub struct OAuthService {
    api: Arc<dyn ClickUpApi>,
    config: OAuthConfig,
    vault: Arc<TokenVault>,
    states: Mutex<HashMap<String, Instant>>,
    state_ttl: Duration,
    token_lifetime: ChronoDuration,
}

impl OAuthService {
    pub fn new(
        api: Arc<dyn ClickUpApi>,
        config: OAuthConfig,
        security: &SecurityConfig,
        vault: Arc<TokenVault>,
    ) -> Self {
        Self {
            api,
            config,
            vault,
            states: Mutex::new(HashMap::new()),
            state_ttl: Duration::from_secs(security.state_ttl_secs),
            token_lifetime: token_lifetime(security.token_lifetime_days),
        }
    }

    /// Number of outstanding (unexpired) states
    #[cfg(test)]
    async fn pending_states(&self) -> usize {
        let mut states = self.states.lock().await;
        let ttl = self.state_ttl;
        states.retain(|_, created| created.elapsed() < ttl);
        states.len()
    }

    /// Remove and validate a state; unknown and expired states are rejected
    async fn take_state(&self, state: &str) -> Result<(), AuthError> {
        let created = self.states.lock().await.remove(state);
        match created {
            Some(created) if created.elapsed() < self.state_ttl => Ok(()),
            Some(_) => {
                warn!("OAuth state expired");
                Err(AuthError::InvalidState)
            }
            None => Err(AuthError::InvalidState),
        }
    }

    fn build_auth_url(&self, state: &str) -> Result<String, AuthError> {
        let mut url = Url::parse(&self.config.auth_url)
            .map_err(|e| AuthError::AuthorizationUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("state", state);
        Ok(url.into())
    }

    async fn load_token(&self, user_id: &str) -> Result<TokenData, AuthError> {
        self.vault.load(user_id).await?.ok_or(AuthError::NoTokenData)
    }
}

#[async_trait]
impl Authenticator for OAuthService {
    async fn generate_auth_url(&self) -> Result<AuthorizationUrl, AuthError> {
        let state = Uuid::new_v4().simple().to_string();
        let url = self.build_auth_url(&state)?;

        let mut states = self.states.lock().await;
        let ttl = self.state_ttl;
        states.retain(|_, created| created.elapsed() < ttl);
        states.insert(state.clone(), Instant::now());
        debug!(pending = states.len(), "OAuth state issued");

        Ok(AuthorizationUrl { url, state })
    }

    #[instrument(skip(self, code, state))]
    async fn handle_callback(&self, code: &str, state: &str) -> Result<String, AuthError> {
        self.take_state(state).await?;

        let response = self
            .api
            .request_token(
                &self.config.client_id,
                &self.config.client_secret,
                TokenGrant::AuthorizationCode {
                    code: code.to_string(),
                },
            )
            .await
            .map_err(|e| {
                error!(error = %e, "OAuth callback failed");
                AuthError::ExchangeFailed(e)
            })?;

        let user_id = match response.user {
            Some(user) => user.id,
            None => {
                self.api
                    .get_authorized_user(&response.access_token)
                    .await
                    .map_err(|e| {
                        error!(error = %e, "Failed to look up authorized user");
                        AuthError::ExchangeFailed(e)
                    })?
                    .id
            }
        };

        let token = TokenData::issued_now(
            response.access_token,
            response.refresh_token.unwrap_or_default(),
            self.token_lifetime,
            Some(user_id.clone()),
        );
        self.vault.store(&user_id, &token).await?;

        info!(user_id = %user_id, "OAuth flow completed");
        Ok(user_id)
    }

    #[instrument(skip(self))]
    async fn refresh_token(&self, user_id: &str) -> Result<TokenData, AuthError> {
        let current = self.load_token(user_id).await?;
        if current.refresh_token.is_empty() {
            return Err(AuthError::NoRefreshToken);
        }

        let response = self
            .api
            .request_token(
                &self.config.client_id,
                &self.config.client_secret,
                TokenGrant::RefreshToken {
                    refresh_token: current.refresh_token.clone(),
                },
            )
            .await
            .map_err(|e| {
                error!(error = %e, "Token refresh failed");
                AuthError::RefreshFailed(e)
            })?;

        let token = TokenData::issued_now(
            response.access_token,
            response.refresh_token.unwrap_or(current.refresh_token),
            self.token_lifetime,
            current.team_id,
        );
        self.vault.store(user_id, &token).await?;

        info!("Access token refreshed");
        Ok(token)
    }

    async fn get_access_token(&self, user_id: &str) -> Result<String, AuthError> {
        let token = self.load_token(user_id).await?;
        if token.is_expired() {
            debug!(user_id, "Access token expired, refreshing");
            return Ok(self.refresh_token(user_id).await?.access_token);
        }
        Ok(token.access_token)
    }

    async fn is_authenticated(&self, user_id: &str) -> bool {
        match self.vault.load(user_id).await {
            Ok(Some(token)) => !token.is_expired(),
            Ok(None) => false,
            Err(e) => {
                warn!(user_id, error = %e, "Stored token could not be read");
                false
            }
        }
    }
}
