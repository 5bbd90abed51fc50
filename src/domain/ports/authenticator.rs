use async_trait::async_trait;

use crate::domain::error::AuthError;
use crate::domain::models::{AuthorizationUrl, TokenData};

/// Port for the OAuth authorization-code flow and per-user token lookup
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Build the ClickUp authorization URL and remember its state
    async fn generate_auth_url(&self) -> Result<AuthorizationUrl, AuthError>;

    /// Validate the state, exchange the code and store the tokens.
    ///
    /// Returns the id of the authorized user.
    async fn handle_callback(&self, code: &str, state: &str) -> Result<String, AuthError>;

    /// Exchange the stored refresh token for a new token pair
    async fn refresh_token(&self, user_id: &str) -> Result<TokenData, AuthError>;

    /// Current access token for a user, refreshing it first when expired
    async fn get_access_token(&self, user_id: &str) -> Result<String, AuthError>;

    /// Whether a usable token exists for the user. Never fails.
    async fn is_authenticated(&self, user_id: &str) -> bool;
}
