//! ClickUp MCP server
//!
//! Exposes ClickUp task, list, team and board operations as Model Context
//! Protocol tools over stdio, and hosts an HTTP server that runs the ClickUp
//! OAuth flow and proxies API calls for authorized teams.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, typed errors and the port traits
//! - **Service Layer** (`services`): validation, OAuth flow and token handling
//! - **Infrastructure Layer** (`infrastructure`): ClickUp REST client, token
//!   encryption, configuration, logging and project setup
//! - **Adapters** (`adapters`): MCP stdio server and axum HTTP server
//! - **CLI Layer** (`cli`): command-line interface

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::error::{AuthError, ClickUpApiError, SecurityError, ServiceError};
pub use domain::models::{
    ClickUpBoard, ClickUpList, ClickUpTask, ClickUpTeam, Config, TaskUpdate, TokenData,
};
pub use domain::ports::{Authenticator, ClickUpApi};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{ClickUpService, OAuthService, TokenSource};
