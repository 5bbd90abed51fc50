//! ClickUp REST API adapter

pub mod client;
pub mod rate_limiter;
pub mod retry;

pub use client::{ClickUpClient, ClickUpClientConfig};
pub use rate_limiter::ClickUpRateLimiter;
pub use retry::RetryPolicy;
