use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client as ReqwestClient, Method, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use super::rate_limiter::ClickUpRateLimiter;
use super::retry::RetryPolicy;
use crate::domain::error::ClickUpApiError;
use crate::domain::models::{
    AuthorizedUser, ClickUpBoard, ClickUpList, ClickUpTask, ClickUpTeam, Config, RetryConfig,
    TaskUpdate, TokenGrant, TokenRequest, TokenResponse,
};
use crate::domain::ports::ClickUpApi;
use crate::infrastructure::logging::SecretScrubber;

/// Configuration for the ClickUp HTTP client
#[derive(Debug, Clone)]
pub struct ClickUpClientConfig {
    /// Base URL of the REST API, without trailing slash
    pub base_url: String,
    pub timeout_secs: u64,
    /// Outbound request budget per minute
    pub requests_per_minute: u32,
    pub retry: RetryConfig,
}

impl Default for ClickUpClientConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ClickUpClientConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.clickup.api_url.trim_end_matches('/').to_string(),
            timeout_secs: config.clickup.timeout_secs,
            requests_per_minute: config.rate_limit.requests_per_minute,
            retry: config.retry.clone(),
        }
    }
}

#[derive(Deserialize)]
struct TeamsResponse {
    #[serde(default)]
    teams: Vec<ClickUpTeam>,
}

#[derive(Deserialize)]
struct ListsResponse {
    #[serde(default)]
    lists: Vec<ClickUpList>,
}

#[derive(Deserialize)]
struct UserResponse {
    user: AuthorizedUser,
}

/// HTTP adapter for the ClickUp v2 REST API
///
/// - connection pooling via a shared reqwest client
/// - token bucket rate limiting on every attempt
/// - exponential backoff for transient failures
/// - rate limit headers logged at debug level
pub struct ClickUpClient {
    http_client: ReqwestClient,
    base_url: String,
    rate_limiter: ClickUpRateLimiter,
    retry_policy: RetryPolicy,
    scrubber: SecretScrubber,
}

impl ClickUpClient {
    pub fn new(config: ClickUpClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = ReqwestClient::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.base_url,
            rate_limiter: ClickUpRateLimiter::per_minute(config.requests_per_minute),
            retry_policy: RetryPolicy::from(&config.retry),
            scrubber: SecretScrubber::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T, ClickUpApiError> {
        self.retry_policy
            .execute(|| self.send_once(method.clone(), path, token, body.as_ref()))
            .await
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Result<T, ClickUpApiError> {
        self.rate_limiter.acquire().await;

        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "ClickUp API request");

        let mut request = self.http_client.request(method.clone(), &url);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        log_rate_limit(response.headers());

        let text = read_body(response).await?;

        if !status.is_success() {
            if status.as_u16() == 429 {
                warn!(%url, "ClickUp rate limit exceeded");
            }
            let message = self.scrubber.scrub(&error_message(&text));
            error!(status = status.as_u16(), %method, path, error = %message, "ClickUp API error");
            return Err(ClickUpApiError::from_status(status.as_u16(), message));
        }

        Ok(serde_json::from_str(&text)?)
    }
}

async fn read_body(response: Response) -> Result<String, ClickUpApiError> {
    response.text().await.map_err(transport_error)
}

fn transport_error(err: reqwest::Error) -> ClickUpApiError {
    if err.is_timeout() {
        ClickUpApiError::Timeout
    } else {
        ClickUpApiError::NetworkError(err.to_string())
    }
}

fn log_rate_limit(headers: &HeaderMap) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
    };
    let remaining = header("x-ratelimit-remaining").unwrap_or(100);
    let reset = header("x-ratelimit-reset").unwrap_or(0);
    debug!(remaining, reset, "ClickUp rate limit status");
}

/// ClickUp error bodies look like `{"err": "...", "ECODE": "..."}`
fn error_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };
    match (json.get("err").and_then(Value::as_str), json.get("ECODE").and_then(Value::as_str)) {
        (Some(err), Some(code)) => format!("{err} ({code})"),
        (Some(err), None) => err.to_string(),
        _ => body.to_string(),
    }
}

#[async_trait]
impl ClickUpApi for ClickUpClient {
    #[instrument(skip(self, token, task), fields(task_name = %task.name))]
    async fn create_task(
        &self,
        token: &str,
        list_id: &str,
        task: &ClickUpTask,
    ) -> Result<Value, ClickUpApiError> {
        let body = serde_json::to_value(task)?;
        self.send(
            Method::POST,
            &format!("/list/{list_id}/task"),
            Some(token),
            Some(body),
        )
        .await
    }

    #[instrument(skip(self, token, update))]
    async fn update_task(
        &self,
        token: &str,
        task_id: &str,
        update: &TaskUpdate,
    ) -> Result<Value, ClickUpApiError> {
        let body = serde_json::to_value(update)?;
        self.send(
            Method::PUT,
            &format!("/task/{task_id}"),
            Some(token),
            Some(body),
        )
        .await
    }

    #[instrument(skip(self, token))]
    async fn get_teams(&self, token: &str) -> Result<Vec<ClickUpTeam>, ClickUpApiError> {
        let response: TeamsResponse = self.send(Method::GET, "/team", Some(token), None).await?;
        Ok(response.teams)
    }

    #[instrument(skip(self, token))]
    async fn get_lists(
        &self,
        token: &str,
        folder_id: &str,
    ) -> Result<Vec<ClickUpList>, ClickUpApiError> {
        let response: ListsResponse = self
            .send(
                Method::GET,
                &format!("/folder/{folder_id}/list"),
                Some(token),
                None,
            )
            .await?;
        Ok(response.lists)
    }

    #[instrument(skip(self, token, board), fields(space_id = %board.space_id))]
    async fn create_board(
        &self,
        token: &str,
        board: &ClickUpBoard,
    ) -> Result<Value, ClickUpApiError> {
        let body = serde_json::to_value(board)?;
        self.send(
            Method::POST,
            &format!("/space/{}/board", board.space_id),
            Some(token),
            Some(body),
        )
        .await
    }

    #[instrument(skip(self, token))]
    async fn get_authorized_user(&self, token: &str) -> Result<AuthorizedUser, ClickUpApiError> {
        let response: UserResponse = self.send(Method::GET, "/user", Some(token), None).await?;
        Ok(response.user)
    }

    #[instrument(skip_all)]
    async fn request_token(
        &self,
        client_id: &str,
        client_secret: &str,
        grant: TokenGrant,
    ) -> Result<TokenResponse, ClickUpApiError> {
        let body = serde_json::to_value(TokenRequest {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            grant,
        })?;
        self.send(Method::POST, "/oauth/token", None, Some(body))
            .await
    }
}
