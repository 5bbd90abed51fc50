#![allow(dead_code)]

use std::sync::Arc;

use clickup_mcp::domain::models::Config;
use clickup_mcp::infrastructure::clickup::{ClickUpClient, ClickUpClientConfig};

/// Configuration pointing the ClickUp client at a mock server, with fast retries
pub fn test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.clickup.api_url = format!("{base_url}/api/v2");
    config.clickup.auth_url = format!("{base_url}/oauth");
    config.clickup.client_id = "test-client-id".to_string();
    config.clickup.client_secret = "test-client-secret".to_string();
    config.rate_limit.requests_per_minute = 6_000;
    config.retry.max_retries = 2;
    config.retry.initial_backoff_ms = 10;
    config.retry.max_backoff_ms = 50;
    config
}

pub fn client(base_url: &str) -> Arc<ClickUpClient> {
    let config = ClickUpClientConfig::from_config(&test_config(base_url));
    Arc::new(ClickUpClient::new(config).unwrap())
}
