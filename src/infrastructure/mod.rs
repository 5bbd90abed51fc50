//! Infrastructure layer: ClickUp HTTP adapter, token security,
//! configuration, logging and project setup.

pub mod clickup;
pub mod config;
pub mod logging;
pub mod security;
pub mod setup;
