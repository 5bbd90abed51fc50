//! Wiring shared by the server commands.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::domain::models::Config;
use crate::domain::ports::{Authenticator, ClickUpApi};
use crate::infrastructure::clickup::{ClickUpClient, ClickUpClientConfig};
use crate::infrastructure::logging::{LogConfig, LoggerImpl};
use crate::infrastructure::security::{TokenCipher, TokenVault};
use crate::services::{ClickUpService, OAuthService};

/// Install the global logger from the loaded configuration
pub fn init_logging(config: &Config) -> Result<LoggerImpl> {
    let log_config = LogConfig::try_from(&config.logging)?;
    LoggerImpl::init(&log_config)
}

/// Shared services built from configuration
pub struct AppContext {
    pub config: Config,
    pub api: Arc<dyn ClickUpApi>,
    pub clickup: Arc<ClickUpService>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let client = ClickUpClient::new(ClickUpClientConfig::from_config(&config))?;
        let api: Arc<dyn ClickUpApi> = Arc::new(client);
        Ok(Self {
            clickup: Arc::new(ClickUpService::new(api.clone())),
            api,
            config,
        })
    }

    /// Token vault per the security settings; file-backed when `token_file` is set
    pub async fn open_vault(&self) -> Result<Arc<TokenVault>> {
        let security = &self.config.security;
        let cipher = TokenCipher::from_optional_secret(security.encryption_key.as_deref());
        let vault = match security.token_file {
            Some(ref path) => TokenVault::open(cipher, path.clone())
                .await
                .with_context(|| format!("Failed to open token vault {}", path.display()))?,
            None => TokenVault::in_memory(cipher),
        };
        Ok(Arc::new(vault))
    }

    pub async fn authenticator(&self) -> Result<Arc<dyn Authenticator>> {
        let vault = self.open_vault().await?;
        Ok(Arc::new(OAuthService::new(
            self.api.clone(),
            self.config.oauth(),
            &self.config.security,
            vault,
        )))
    }
}
