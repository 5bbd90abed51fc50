pub mod clickup_service;
pub mod oauth_service;

pub use clickup_service::{ClickUpService, TokenSource};
pub use oauth_service::OAuthService;
