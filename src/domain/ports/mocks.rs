//! mockall doubles for the port traits, shared by unit tests

use async_trait::async_trait;
use mockall::mock;
use serde_json::Value;

use super::{Authenticator, ClickUpApi};
use crate::domain::error::{AuthError, ClickUpApiError};
use crate::domain::models::{
    AuthorizationUrl, AuthorizedUser, ClickUpBoard, ClickUpList, ClickUpTask, ClickUpTeam,
    TaskUpdate, TokenData, TokenGrant, TokenResponse,
};

mock! {
    pub Api {}

    #[async_trait]
    impl ClickUpApi for Api {
        async fn create_task(&self, token: &str, list_id: &str, task: &ClickUpTask) -> Result<Value, ClickUpApiError>;
        async fn update_task(&self, token: &str, task_id: &str, update: &TaskUpdate) -> Result<Value, ClickUpApiError>;
        async fn get_teams(&self, token: &str) -> Result<Vec<ClickUpTeam>, ClickUpApiError>;
        async fn get_lists(&self, token: &str, folder_id: &str) -> Result<Vec<ClickUpList>, ClickUpApiError>;
        async fn create_board(&self, token: &str, board: &ClickUpBoard) -> Result<Value, ClickUpApiError>;
        async fn get_authorized_user(&self, token: &str) -> Result<AuthorizedUser, ClickUpApiError>;
        async fn request_token(&self, client_id: &str, client_secret: &str, grant: TokenGrant) -> Result<TokenResponse, ClickUpApiError>;
    }
}

mock! {
    pub Auth {}

    #[async_trait]
    impl Authenticator for Auth {
        async fn generate_auth_url(&self) -> Result<AuthorizationUrl, AuthError>;
        async fn handle_callback(&self, code: &str, state: &str) -> Result<String, AuthError>;
        async fn refresh_token(&self, user_id: &str) -> Result<TokenData, AuthError>;
        async fn get_access_token(&self, user_id: &str) -> Result<String, AuthError>;
        async fn is_authenticated(&self, user_id: &str) -> bool;
    }
}
