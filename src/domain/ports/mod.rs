//! Port trait definitions
//!
//! - ClickUpApi: ClickUp REST operations
//! - Authenticator: OAuth flow and per-user access tokens
//!
//! Adapters in `infrastructure` and `services` implement these; the MCP
//! and HTTP surfaces depend only on the traits.

pub mod authenticator;
pub mod clickup_api;

pub use authenticator::Authenticator;
pub use clickup_api::ClickUpApi;

#[cfg(test)]
pub mod mocks;
