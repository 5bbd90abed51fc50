//! MCP stdio server implementing JSON-RPC 2.0 over stdin/stdout.
//!
//! Exposes ClickUp task, list, team and board operations as MCP tools.
//!
//! Protocol: newline-delimited JSON-RPC 2.0 on stdin/stdout.
//! Logging goes to stderr (stdout is reserved for protocol messages).

use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use super::tools::{tool_definitions, ToolError, ToolExecutor};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "clickup-mcp-server";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

/// MCP stdio server that exposes ClickUp operations as tools.
pub struct StdioServer {
    tools: ToolExecutor,
}

impl StdioServer {
    pub fn new(tools: ToolExecutor) -> Self {
        Self { tools }
    }

    /// Run the stdio server loop, reading JSON-RPC from stdin and writing responses to stdout.
    pub async fn run(&self) -> anyhow::Result<()> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve newline-delimited JSON-RPC from `reader` until EOF.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(
            token_source = %self.tools.token_source().describe(),
            "ClickUp MCP server running on stdio"
        );

        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            let line = buf.trim_ascii();
            if line.is_empty() {
                continue;
            }

            if let Some(response) = self.handle_message(line).await {
                let mut response_bytes = response.into_bytes();
                response_bytes.push(b'\n');
                writer.write_all(&response_bytes).await?;
                writer.flush().await?;
            }
        }

        info!("stdio server stopped");
        Ok(())
    }

    /// Handle one JSON-RPC message. Notifications produce no response.
    pub async fn handle_message(&self, line: &[u8]) -> Option<String> {
        let request: Value = match serde_json::from_slice(line) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "unparseable message");
                return Some(error_response(
                    Value::Null,
                    PARSE_ERROR,
                    &format!("Parse error: {e}"),
                ));
            }
        };

        let Some(message) = request.as_object() else {
            return Some(error_response(Value::Null, INVALID_REQUEST, "Invalid Request"));
        };

        let id = message.get("id").cloned();
        let Some(method) = message.get("method").and_then(Value::as_str) else {
            return Some(error_response(
                id.unwrap_or(Value::Null),
                INVALID_REQUEST,
                "Invalid Request",
            ));
        };

        let Some(id) = id else {
            debug!(method, "notification received");
            return None;
        };

        let params = message.get("params").cloned().unwrap_or_else(|| json!({}));
        debug!(method, "request received");

        Some(match method {
            "initialize" => success_response(id, initialize_result()),
            "ping" => success_response(id, json!({})),
            "tools/list" => success_response(id, json!({ "tools": tool_definitions() })),
            "tools/call" => self.handle_tools_call(id, &params).await,
            _ => error_response(id, METHOD_NOT_FOUND, &format!("Method not found: {method}")),
        })
    }

    async fn handle_tools_call(&self, id: Value, params: &Value) -> String {
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return error_response(id, INVALID_PARAMS, "Invalid params: missing tool name");
        };

        let outcome = self
            .tools
            .call(name, params.get("arguments"))
            .await
            .and_then(|value| serde_json::to_string_pretty(&value).map_err(ToolError::from));

        let result = match outcome {
            Ok(text) => json!({
                "content": [{
                    "type": "text",
                    "text": text
                }]
            }),
            Err(e) => json!({
                "content": [{
                    "type": "text",
                    "text": json!({ "error": e.to_string() }).to_string()
                }],
                "isError": true
            }),
        };

        success_response(id, result)
    }
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

fn success_response(id: Value, result: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
    .to_string()
}

fn error_response(id: Value, code: i64, message: &str) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message
        }
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockApi;
    use crate::services::{ClickUpService, TokenSource};
    use std::sync::Arc;

    fn server(api: MockApi, tokens: TokenSource) -> StdioServer {
        StdioServer::new(ToolExecutor::new(
            Arc::new(ClickUpService::new(Arc::new(api))),
            tokens,
        ))
    }

    async fn call(server: &StdioServer, line: &str) -> Value {
        let response = server.handle_message(line.as_bytes()).await.unwrap();
        serde_json::from_str(&response).unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let server = server(MockApi::new(), TokenSource::None);
        let response = call(
            &server,
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        )
        .await;

        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(response["result"]["serverInfo"]["name"], SERVER_NAME);
        assert!(response["result"]["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_notification_has_no_response() {
        let server = server(MockApi::new(), TokenSource::None);
        let response = server
            .handle_message(br#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let server = server(MockApi::new(), TokenSource::None);

        let parse = call(&server, "{not json").await;
        assert_eq!(parse["error"]["code"], PARSE_ERROR);
        assert!(parse["id"].is_null());

        let invalid = call(&server, "[1,2,3]").await;
        assert_eq!(invalid["error"]["code"], INVALID_REQUEST);

        let unknown = call(&server, r#"{"jsonrpc":"2.0","id":"a","method":"resources/list"}"#).await;
        assert_eq!(unknown["id"], "a");
        assert_eq!(unknown["error"]["code"], METHOD_NOT_FOUND);
        assert_eq!(unknown["error"]["message"], "Method not found: resources/list");

        let missing_name = call(
            &server,
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{}}"#,
        )
        .await;
        assert_eq!(missing_name["error"]["code"], INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_tool_failure_is_reported_in_result() {
        let server = server(MockApi::new(), TokenSource::Static("pk_1".to_string()));
        let response = call(
            &server,
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"clickup_get_lists","arguments":{}}}"#,
        )
        .await;

        let result = &response["result"];
        assert_eq!(result["isError"], true);
        let text: Value =
            serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(text["error"], "Folder ID is required and must be a string");
    }

    #[tokio::test]
    async fn test_tool_success_wraps_json_text() {
        let mut api = MockApi::new();
        api.expect_create_task()
            .withf(|token, list_id, task| token == "pk_1" && list_id == "L1" && task.name == "Ship")
            .returning(|_, _, _| Ok(json!({"id": "t1", "name": "Ship"})));

        let server = server(api, TokenSource::Static("pk_1".to_string()));
        let response = call(
            &server,
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"clickup_create_task","arguments":{"list_id":"L1","name":"Ship"}}}"#,
        )
        .await;

        let result = &response["result"];
        assert!(result.get("isError").is_none());
        assert_eq!(result["content"][0]["type"], "text");
        let text: Value =
            serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(text["id"], "t1");
    }

    #[tokio::test]
    async fn test_serve_writes_one_line_per_request() {
        let server = server(MockApi::new(), TokenSource::None);
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n"
        );

        let mut output = Vec::new();
        server.serve(input.as_bytes(), &mut output).await.unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["result"], json!({}));
        assert_eq!(lines[1]["result"]["tools"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_gets_parse_error_and_session_continues() {
        let server = server(MockApi::new(), TokenSource::None);
        let mut input = b"\xff\xfe{\"jsonrpc\"}\n".to_vec();
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#);
        input.push(b'\n');

        let mut output = Vec::new();
        server.serve(input.as_slice(), &mut output).await.unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], Value::Null);
        assert_eq!(lines[0]["error"]["code"], PARSE_ERROR);
        assert_eq!(lines[1]["id"], 7);
        assert_eq!(lines[1]["result"], json!({}));
    }

    #[tokio::test]
    async fn test_last_line_without_newline_is_answered() {
        let server = server(MockApi::new(), TokenSource::None);
        let input = br#"{"jsonrpc":"2.0","id":3,"method":"ping"}"#;

        let mut output = Vec::new();
        server.serve(&input[..], &mut output).await.unwrap();

        let response: Value = serde_json::from_slice(output.trim_ascii()).unwrap();
        assert_eq!(response["id"], 3);
    }
}
