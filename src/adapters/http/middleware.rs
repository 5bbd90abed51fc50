//! Request logging and team authentication for protected routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

use super::handlers::ErrorResponse;
use super::server::AppState;

pub const TEAM_HEADER: &str = "x-team-id";

/// Authenticated team id, inserted by [`require_team`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamId(pub String);

/// Logs every request as `METHOD path`.
pub async fn log_request(request: Request, next: Next) -> Response {
    info!("{} {}", request.method(), request.uri().path());
    next.run(request).await
}

/// Requires an authenticated `x-team-id` header and applies the per-team
/// inbound rate limit.
pub async fn require_team(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let team_id = request
        .headers()
        .get(TEAM_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned);

    let Some(team_id) = team_id else {
        return reject(StatusCode::BAD_REQUEST, "Missing or invalid teamId");
    };

    if !state.auth.is_authenticated(&team_id).await {
        return reject(StatusCode::UNAUTHORIZED, "Authentication required");
    }

    if state.limiter.check_key(&team_id).is_err() {
        warn!(team_id = %team_id, "inbound rate limit exceeded");
        return reject(StatusCode::TOO_MANY_REQUESTS, "Too many requests");
    }

    request.extensions_mut().insert(TeamId(team_id));
    next.run(request).await
}

fn reject(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}
