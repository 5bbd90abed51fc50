mod common;

use clickup_mcp::adapters::mcp::{StdioServer, ToolExecutor};
use clickup_mcp::services::{ClickUpService, TokenSource};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn server(mock_uri: &str, tokens: TokenSource) -> StdioServer {
    let service = Arc::new(ClickUpService::new(common::client(mock_uri)));
    StdioServer::new(ToolExecutor::new(service, tokens))
}

async fn exchange(server: &StdioServer, requests: &[Value]) -> Vec<Value> {
    let input: String = requests.iter().map(|r| format!("{r}\n")).collect();
    let mut output = Vec::new();
    server.serve(input.as_bytes(), &mut output).await.unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn tool_text(response: &Value) -> Value {
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}

#[tokio::test]
async fn test_session_creates_task() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/list/L42/task"))
        .and(header("authorization", "pk_live"))
        .and(body_partial_json(json!({"name": "Ship it", "priority": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "86abc",
            "name": "Ship it",
            "url": "https://app.clickup.com/t/86abc"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let server = server(&mock_server.uri(), TokenSource::Static("pk_live".to_string()));
    let responses = exchange(
        &server,
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {"protocolVersion": "2024-11-05"}}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
            json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "tools/call",
                "params": {
                    "name": "clickup_create_task",
                    "arguments": {"list_id": "L42", "name": "Ship it", "priority": 1}
                }
            }),
        ],
    )
    .await;

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "clickup-mcp-server");
    assert_eq!(responses[1]["result"]["tools"].as_array().unwrap().len(), 5);
    assert_eq!(responses[2]["id"], 3);
    assert_eq!(tool_text(&responses[2])["id"], "86abc");
}

#[tokio::test]
async fn test_upstream_failure_is_tool_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/team"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"err": "Token invalid", "ECODE": "OAUTH_025"})))
        .mount(&mock_server)
        .await;

    let server = server(&mock_server.uri(), TokenSource::Static("pk_revoked".to_string()));
    let responses = exchange(
        &server,
        &[json!({
            "jsonrpc": "2.0",
            "id": "teams",
            "method": "tools/call",
            "params": {"name": "clickup_get_teams", "arguments": {}}
        })],
    )
    .await;

    assert_eq!(responses[0]["result"]["isError"], true);
    assert_eq!(
        tool_text(&responses[0]),
        json!({"error": "Failed to retrieve teams from ClickUp"})
    );
}

#[tokio::test]
async fn test_missing_token_reported() {
    let mock_server = MockServer::start().await;
    let server = server(&mock_server.uri(), TokenSource::None);

    let responses = exchange(
        &server,
        &[json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {"name": "clickup_get_lists", "arguments": {"folder_id": "F1"}}
        })],
    )
    .await;

    assert_eq!(
        tool_text(&responses[0]),
        json!({"error": "No authentication token found"})
    );
}
