//! Domain layer: ClickUp models, errors and ports.

pub mod error;
pub mod models;
pub mod ports;

pub use error::{AuthError, ClickUpApiError, SecurityError, ServiceError};
