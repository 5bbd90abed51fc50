//! Implementation of the `serve` command.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use crate::adapters::http::{AppState, HttpServer};
use crate::cli::context::{init_logging, AppContext};
use crate::cli::types::ServeArgs;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::setup::SetupPaths;

pub async fn execute(args: ServeArgs) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    ConfigLoader::require_oauth_credentials(&config)?;

    let _logger = init_logging(&config)?;

    if !SetupPaths::current()?.is_initialized() {
        warn!("static pages or .env missing; run `clickup-mcp-server init` first");
    }

    let context = AppContext::new(config)?;
    let auth = context.authenticator().await?;
    info!(
        redirect_uri = %context.config.redirect_uri(),
        public_dir = %context.config.server.public_dir.display(),
        "starting HTTP server"
    );

    let state = Arc::new(AppState::new(
        context.clickup.clone(),
        auth,
        context.config.rate_limit.inbound_per_minute,
    ));

    HttpServer::new(context.config.server.clone(), state)
        .serve_with_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
