pub mod board;
pub mod config;
pub(crate) mod id;
pub mod list;
pub mod task;
pub mod team;
pub mod token;

pub use board::ClickUpBoard;
pub use config::{
    ClickUpConfig, Config, LoggingConfig, OAuthConfig, RateLimitConfig, RetryConfig,
    SecurityConfig, ServerConfig,
};
pub use list::{ClickUpList, ListStatus};
pub use task::{ClickUpTask, TaskPriority, TaskUpdate};
pub use team::{ClickUpTeam, TeamMember, TeamUser};
pub use token::{
    AuthorizationUrl, AuthorizedUser, TokenData, TokenGrant, TokenRequest, TokenResponse,
};
