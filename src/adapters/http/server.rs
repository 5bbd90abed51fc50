//! Router assembly and server lifecycle.

use axum::{
    handler::HandlerWithoutStateExt,
    middleware,
    routing::{get, post, put},
    Router,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::middleware::{log_request, require_team};
use crate::domain::models::ServerConfig;
use crate::domain::ports::Authenticator;
use crate::services::ClickUpService;

/// Shared state for the HTTP server.
pub struct AppState {
    pub clickup: Arc<ClickUpService>,
    pub auth: Arc<dyn Authenticator>,
    /// Per-team inbound limiter for protected routes
    pub limiter: DefaultKeyedRateLimiter<String>,
}

impl AppState {
    pub fn new(
        clickup: Arc<ClickUpService>,
        auth: Arc<dyn Authenticator>,
        inbound_per_minute: u32,
    ) -> Self {
        let per_minute = NonZeroU32::new(inbound_per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            clickup,
            auth,
            limiter: RateLimiter::keyed(Quota::per_minute(per_minute)),
        }
    }

    /// Drop limiter entries for teams whose quota has fully replenished.
    /// Returns the number of teams still tracked.
    pub fn purge_idle_limits(&self) -> usize {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        self.limiter.len()
    }
}

/// How often idle limiter entries are purged while serving
const LIMITER_PURGE_INTERVAL: Duration = Duration::from_secs(60);

fn clickup_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/teams", get(handlers::clickup_teams))
        .route("/lists/{folder_id}", get(handlers::clickup_lists))
        .route("/tasks", post(handlers::clickup_create_task))
        .route("/tasks/{task_id}", put(handlers::clickup_update_task))
        .route("/boards", post(handlers::clickup_create_board))
}

/// Build the full application router.
pub fn build_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let public = config.public_dir.as_path();

    let protected = Router::new()
        .route("/api/teams", get(handlers::get_teams))
        .route("/api/tasks", post(handlers::create_task))
        .nest("/api/clickup", clickup_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_team));

    let app = Router::new()
        .route("/api/health", get(handlers::health))
        .route("/oauth/clickup/authorize", get(handlers::authorize))
        .route("/oauth/clickup/callback", get(handlers::callback))
        .route_service("/", ServeFile::new(page(public, "index.html")))
        .route_service(
            "/oauth/success",
            ServeFile::new(page(public, "oauth-success.html")),
        )
        .merge(protected)
        .fallback_service(
            ServeDir::new(public)
                .call_fallback_on_method_not_allowed(true)
                .not_found_service(handlers::not_found.into_service()),
        )
        .with_state(state)
        .layer(middleware::from_fn(log_request));

    if config.enable_cors {
        app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
            .layer(TraceLayer::new_for_http())
    } else {
        app.layer(TraceLayer::new_for_http())
    }
}

fn page(public: &Path, name: &str) -> PathBuf {
    public.join(name)
}

/// HTTP server hosting the OAuth flow and the ClickUp API routes.
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    pub fn new(config: ServerConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener =
            TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        tracing::info!("Server is running on {}", listener.local_addr()?);

        let purge_state = self.state.clone();
        let purger = tokio::spawn(async move {
            let mut interval = tokio::time::interval(LIMITER_PURGE_INTERVAL);
            interval.tick().await;
            loop {
                interval.tick().await;
                let tracked = purge_state.purge_idle_limits();
                tracing::debug!(tracked, "inbound limiter purged");
            }
        });

        let router = build_router(self.state, &self.config);
        let result = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await;
        purger.abort();
        result?;
        Ok(())
    }
}
