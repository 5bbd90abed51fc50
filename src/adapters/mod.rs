//! Inbound adapters: the MCP stdio server and the HTTP server.

pub mod http;
pub mod mcp;
