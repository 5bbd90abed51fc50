//! Model Context Protocol adapter.

pub mod stdio_server;
pub mod tools;

pub use stdio_server::StdioServer;
pub use tools::{tool_definitions, ToolError, ToolExecutor, ToolRequest};
