//! Implementation of the `stdio` command.

use anyhow::Result;
use tracing::warn;

use crate::adapters::mcp::{StdioServer, ToolExecutor};
use crate::cli::context::{init_logging, AppContext};
use crate::cli::types::StdioArgs;
use crate::infrastructure::config::ConfigLoader;
use crate::services::TokenSource;

pub async fn execute(args: StdioArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let _logger = init_logging(&config)?;

    let context = AppContext::new(config)?;
    let tokens = token_source(&context, args.user_id).await?;
    if matches!(tokens, TokenSource::None) {
        warn!("No authentication token found; set CLICKUP_API_TOKEN or pass --user-id");
    }

    let server = StdioServer::new(ToolExecutor::new(context.clickup.clone(), tokens));
    server.run().await
}

/// Personal API token first, then the stored OAuth token of `user_id`
async fn token_source(context: &AppContext, user_id: Option<String>) -> Result<TokenSource> {
    if let Some(token) = context
        .config
        .clickup
        .api_token
        .clone()
        .filter(|t| !t.trim().is_empty())
    {
        return Ok(TokenSource::Static(token));
    }

    match user_id.filter(|u| !u.trim().is_empty()) {
        Some(user_id) => Ok(TokenSource::OAuthUser {
            authenticator: context.authenticator().await?,
            user_id,
        }),
        None => Ok(TokenSource::None),
    }
}
