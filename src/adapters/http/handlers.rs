//! Route handlers for the HTTP server.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

use super::middleware::TeamId;
use super::server::AppState;
use crate::domain::error::ServiceError;
use crate::domain::models::{ClickUpBoard, ClickUpList, ClickUpTask, ClickUpTeam, TaskUpdate};

/// Error body returned by every failing route.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn fail(status: StatusCode, message: impl Into<String>) -> HandlerError {
    (status, Json(ErrorResponse::new(message)))
}

fn service_failure(e: &ServiceError) -> HandlerError {
    let status = match e {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    fail(status, e.to_string())
}

/// Unwrap a JSON body, answering malformed or mistyped bodies with a JSON 400
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, HandlerError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| fail(StatusCode::BAD_REQUEST, rejection.body_text()))
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn not_found() -> HandlerError {
    fail(StatusCode::NOT_FOUND, "Route not found")
}

// OAuth

pub async fn authorize(State(state): State<Arc<AppState>>) -> Result<Response, HandlerError> {
    match state.auth.generate_auth_url().await {
        Ok(auth) => Ok(found(&auth.url)),
        Err(e) => {
            error!(error = %e, "OAuth authorization failed");
            Err(fail(
                StatusCode::INTERNAL_SERVER_ERROR,
                "OAuth authorization failed",
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

pub async fn callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Response, HandlerError> {
    let (Some(code), Some(oauth_state)) = (
        params.code.filter(|c| !c.is_empty()),
        params.state.filter(|s| !s.is_empty()),
    ) else {
        error!("OAuth callback failed: Invalid callback parameters");
        return Err(fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Invalid callback parameters",
        ));
    };

    match state.auth.handle_callback(&code, &oauth_state).await {
        Ok(_) => Ok(found("/oauth/success")),
        Err(e) => {
            error!(error = %e, "OAuth callback failed");
            Err(fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

async fn access_token(state: &AppState, team_id: &str) -> Result<String, ServiceError> {
    Ok(state.auth.get_access_token(team_id).await?)
}

// Top-level API

pub async fn get_teams(
    State(state): State<Arc<AppState>>,
    Extension(TeamId(team_id)): Extension<TeamId>,
) -> Result<Json<Vec<ClickUpTeam>>, HandlerError> {
    let result = match access_token(&state, &team_id).await {
        Ok(token) => state.clickup.get_teams(&token).await,
        Err(e) => Err(e),
    };

    result.map(Json).map_err(|e| {
        error!(error = %e, "Failed to get teams");
        fail(StatusCode::INTERNAL_SERVER_ERROR, "Failed to get teams")
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub list_id: Option<String>,
    #[serde(default)]
    pub task: Option<Value>,
}

pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Extension(TeamId(team_id)): Extension<TeamId>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<Json<Value>, HandlerError> {
    let missing = || fail(StatusCode::BAD_REQUEST, "Missing required parameters");
    let Ok(Json(body)) = body else {
        return Err(missing());
    };
    let (Some(_), Some(list_id), Some(task)) = (
        body.team_id.filter(|t| !t.is_empty()),
        body.list_id.filter(|l| !l.is_empty()),
        body.task.filter(|t| !t.is_null()),
    ) else {
        return Err(missing());
    };

    let mut task: ClickUpTask = serde_json::from_value(task)
        .map_err(|e| fail(StatusCode::BAD_REQUEST, format!("Invalid task: {e}")))?;
    task.list_id = Some(list_id.clone());

    let result = match access_token(&state, &team_id).await {
        Ok(token) => state.clickup.create_task(&token, &list_id, &task).await,
        Err(e) => Err(e),
    };

    result.map(Json).map_err(|e| {
        error!(error = %e, "Failed to create task");
        fail(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create task")
    })
}

// /api/clickup

pub async fn clickup_teams(
    State(state): State<Arc<AppState>>,
    Extension(TeamId(team_id)): Extension<TeamId>,
) -> Result<Json<Vec<ClickUpTeam>>, HandlerError> {
    let token = access_token(&state, &team_id)
        .await
        .map_err(|e| service_failure(&e))?;
    state
        .clickup
        .get_teams(&token)
        .await
        .map(Json)
        .map_err(|e| service_failure(&e))
}

pub async fn clickup_lists(
    State(state): State<Arc<AppState>>,
    Extension(TeamId(team_id)): Extension<TeamId>,
    Path(folder_id): Path<String>,
) -> Result<Json<Vec<ClickUpList>>, HandlerError> {
    let token = access_token(&state, &team_id)
        .await
        .map_err(|e| service_failure(&e))?;
    state
        .clickup
        .get_lists(&token, &folder_id)
        .await
        .map(Json)
        .map_err(|e| service_failure(&e))
}

pub async fn clickup_create_task(
    State(state): State<Arc<AppState>>,
    Extension(TeamId(team_id)): Extension<TeamId>,
    task: Result<Json<ClickUpTask>, JsonRejection>,
) -> Result<Json<Value>, HandlerError> {
    let task = json_body(task)?;
    let list_id = task.list_id.clone().unwrap_or_default();
    let token = access_token(&state, &team_id)
        .await
        .map_err(|e| service_failure(&e))?;
    state
        .clickup
        .create_task(&token, &list_id, &task)
        .await
        .map(Json)
        .map_err(|e| service_failure(&e))
}

pub async fn clickup_update_task(
    State(state): State<Arc<AppState>>,
    Extension(TeamId(team_id)): Extension<TeamId>,
    Path(task_id): Path<String>,
    update: Result<Json<TaskUpdate>, JsonRejection>,
) -> Result<Json<Value>, HandlerError> {
    let update = json_body(update)?;
    let token = access_token(&state, &team_id)
        .await
        .map_err(|e| service_failure(&e))?;
    state
        .clickup
        .update_task(&token, &task_id, &update)
        .await
        .map(Json)
        .map_err(|e| service_failure(&e))
}

pub async fn clickup_create_board(
    State(state): State<Arc<AppState>>,
    Extension(TeamId(team_id)): Extension<TeamId>,
    board: Result<Json<ClickUpBoard>, JsonRejection>,
) -> Result<Json<Value>, HandlerError> {
    let board = json_body(board)?;
    let token = access_token(&state, &team_id)
        .await
        .map_err(|e| service_failure(&e))?;
    state
        .clickup
        .create_board(&token, &board)
        .await
        .map(Json)
        .map_err(|e| service_failure(&e))
}
