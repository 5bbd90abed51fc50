use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, instrument};

use crate::domain::error::{ClickUpApiError, ServiceError};
use crate::domain::models::{
    ClickUpBoard, ClickUpList, ClickUpTask, ClickUpTeam, TaskPriority, TaskUpdate,
};
use crate::domain::ports::{Authenticator, ClickUpApi};

/// Task, list, team and board operations on top of the ClickUp API port.
///
/// Upstream failures are logged with their cause and surfaced as a fixed
/// message naming the failed operation.
pub struct ClickUpService {
    api: Arc<dyn ClickUpApi>,
}

impl ClickUpService {
    pub fn new(api: Arc<dyn ClickUpApi>) -> Self {
        Self { api }
    }

    #[instrument(skip(self, token, task), fields(list_id = %list_id))]
    pub async fn create_task(
        &self,
        token: &str,
        list_id: &str,
        task: &ClickUpTask,
    ) -> Result<Value, ServiceError> {
        require("List ID", list_id)?;
        require("Task name", &task.name)?;
        check_priority(task.priority)?;

        self.api
            .create_task(token, list_id, task)
            .await
            .map_err(|e| upstream("Failed to create task in ClickUp", e))
    }

    #[instrument(skip(self, token, update), fields(task_id = %task_id))]
    pub async fn update_task(
        &self,
        token: &str,
        task_id: &str,
        update: &TaskUpdate,
    ) -> Result<Value, ServiceError> {
        require("Task ID", task_id)?;
        check_priority(update.priority)?;

        self.api
            .update_task(token, task_id, update)
            .await
            .map_err(|e| upstream("Failed to update task in ClickUp", e))
    }

    #[instrument(skip(self, token))]
    pub async fn get_teams(&self, token: &str) -> Result<Vec<ClickUpTeam>, ServiceError> {
        self.api
            .get_teams(token)
            .await
            .map_err(|e| upstream("Failed to retrieve teams from ClickUp", e))
    }

    #[instrument(skip(self, token))]
    pub async fn get_lists(
        &self,
        token: &str,
        folder_id: &str,
    ) -> Result<Vec<ClickUpList>, ServiceError> {
        require("Folder ID", folder_id)?;

        self.api
            .get_lists(token, folder_id)
            .await
            .map_err(|e| upstream("Failed to retrieve lists from ClickUp", e))
    }

    #[instrument(skip(self, token, board), fields(space_id = %board.space_id))]
    pub async fn create_board(
        &self,
        token: &str,
        board: &ClickUpBoard,
    ) -> Result<Value, ServiceError> {
        require("Space ID", &board.space_id)?;
        require("Board name", &board.name)?;

        self.api
            .create_board(token, board)
            .await
            .map_err(|e| upstream("Failed to create board in ClickUp", e))
    }
}

fn upstream(operation: &'static str, source: ClickUpApiError) -> ServiceError {
    error!(error = %source, "{operation}");
    ServiceError::upstream(operation, source)
}

fn require(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn check_priority(priority: Option<u8>) -> Result<(), ServiceError> {
    let Some(p) = priority else {
        return Ok(());
    };
    match TaskPriority::from_u8(p) {
        Some(level) => {
            debug!(priority = level.as_str(), "task priority set");
            Ok(())
        }
        None => Err(ServiceError::Validation(format!(
            "Priority must be between 1 (urgent) and 4 (low), got {p}"
        ))),
    }
}

/// Where the access token for a ClickUp call comes from
#[derive(Clone)]
pub enum TokenSource {
    /// Personal API token from configuration
    Static(String),
    /// OAuth token of a user authorized through the HTTP server
    OAuthUser {
        authenticator: Arc<dyn Authenticator>,
        user_id: String,
    },
    None,
}

impl TokenSource {
    pub async fn access_token(&self) -> Result<String, ServiceError> {
        match self {
            Self::Static(token) => Ok(token.clone()),
            Self::OAuthUser {
                authenticator,
                user_id,
            } => Ok(authenticator.get_access_token(user_id).await?),
            Self::None => Err(ServiceError::Unauthenticated),
        }
    }

    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Static(_) => "api token",
            Self::OAuthUser { .. } => "oauth user",
            Self::None => "none",
        }
    }
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OAuthUser { user_id, .. } => {
                f.debug_struct("OAuthUser").field("user_id", user_id).finish()
            }
            other => f.write_str(other.describe()),
        }
    }
}
