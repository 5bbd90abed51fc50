//! HTTP adapter: OAuth flow, static pages and the ClickUp REST proxy.

pub mod handlers;
pub mod middleware;
pub mod server;

pub use middleware::TeamId;
pub use server::{build_router, AppState, HttpServer};
