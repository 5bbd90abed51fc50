use async_trait::async_trait;
use serde_json::Value;

use crate::domain::error::ClickUpApiError;
use crate::domain::models::{
    AuthorizedUser, ClickUpBoard, ClickUpList, ClickUpTask, ClickUpTeam, TaskUpdate, TokenGrant,
    TokenResponse,
};

/// Port for the ClickUp REST API.
///
/// Every call takes the access token explicitly so one adapter can serve
/// both a static personal token and per-user OAuth tokens.
#[async_trait]
pub trait ClickUpApi: Send + Sync {
    /// Create a task in a list and return ClickUp's task object
    async fn create_task(
        &self,
        token: &str,
        list_id: &str,
        task: &ClickUpTask,
    ) -> Result<Value, ClickUpApiError>;

    /// Apply a partial update to a task and return the updated task
    async fn update_task(
        &self,
        token: &str,
        task_id: &str,
        update: &TaskUpdate,
    ) -> Result<Value, ClickUpApiError>;

    /// Teams (workspaces) visible to the token
    async fn get_teams(&self, token: &str) -> Result<Vec<ClickUpTeam>, ClickUpApiError>;

    /// Lists inside a folder
    async fn get_lists(
        &self,
        token: &str,
        folder_id: &str,
    ) -> Result<Vec<ClickUpList>, ClickUpApiError>;

    /// Create a board in the board's space
    async fn create_board(
        &self,
        token: &str,
        board: &ClickUpBoard,
    ) -> Result<Value, ClickUpApiError>;

    /// The user the token belongs to
    async fn get_authorized_user(&self, token: &str) -> Result<AuthorizedUser, ClickUpApiError>;

    /// Exchange a grant at the OAuth token endpoint
    async fn request_token(
        &self,
        client_id: &str,
        client_secret: &str,
        grant: TokenGrant,
    ) -> Result<TokenResponse, ClickUpApiError>;
}
