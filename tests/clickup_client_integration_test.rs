mod common;

use clickup_mcp::domain::error::ClickUpApiError;
use clickup_mcp::domain::models::{ClickUpBoard, ClickUpTask, TaskUpdate, TokenGrant};
use clickup_mcp::domain::ports::ClickUpApi;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_create_task_sends_token_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/list/901/task"))
        .and(header("authorization", "pk_test"))
        .and(body_json(json!({"name": "Write docs", "priority": 3, "tags": ["docs"]})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "abc123", "name": "Write docs"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = common::client(&mock_server.uri());
    let task = ClickUpTask {
        name: "Write docs".to_string(),
        priority: Some(3),
        tags: Some(vec!["docs".to_string()]),
        ..Default::default()
    };

    let created = client.create_task("pk_test", "901", &task).await.unwrap();
    assert_eq!(created["id"], "abc123");
}

#[tokio::test]
async fn test_update_task_sends_only_changed_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v2/task/t-1"))
        .and(body_json(json!({"status": "complete"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "t-1"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = common::client(&mock_server.uri());
    let update = TaskUpdate {
        status: Some("complete".to_string()),
        ..Default::default()
    };

    client.update_task("pk_test", "t-1", &update).await.unwrap();
}

#[tokio::test]
async fn test_get_teams_and_lists() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/team"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "teams": [{
                "id": 1234,
                "name": "Engineering",
                "color": "#7B68EE",
                "members": [{"user": {"id": 42, "username": "ada", "email": "ada@example.com"}}]
            }]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/folder/F9/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lists": [{"id": "L1", "name": "Backlog", "status": {"status": "open", "color": "#000"}}]
        })))
        .mount(&mock_server)
        .await;

    let client = common::client(&mock_server.uri());

    let teams = client.get_teams("pk_test").await.unwrap();
    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0].id, "1234");
    assert_eq!(teams[0].members[0].user.id, "42");

    let lists = client.get_lists("pk_test", "F9").await.unwrap();
    assert_eq!(lists[0].name, "Backlog");
}

#[tokio::test]
async fn test_create_board_posts_to_space() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/space/S1/board"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "b1"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = common::client(&mock_server.uri());
    let board = ClickUpBoard {
        id: None,
        name: "Roadmap".to_string(),
        content: Some("Q3".to_string()),
        space_id: "S1".to_string(),
    };

    let created = client.create_board("pk_test", &board).await.unwrap();
    assert_eq!(created["id"], "b1");
}

#[tokio::test]
async fn test_retry_on_500_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/team"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream hiccup"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/team"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"teams": []})))
        .mount(&mock_server)
        .await;

    let client = common::client(&mock_server.uri());
    let teams = client.get_teams("pk_test").await.unwrap();
    assert!(teams.is_empty());
}

#[tokio::test]
async fn test_retries_exhausted_on_rate_limit() {
    let mock_server = MockServer::start().await;

    // Initial attempt plus two retries
    Mock::given(method("GET"))
        .and(path("/api/v2/team"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({"err": "Rate limit", "ECODE": "APP_002"})))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = common::client(&mock_server.uri());
    let err = client.get_teams("pk_test").await.unwrap_err();
    assert!(matches!(err, ClickUpApiError::RateLimitExceeded));
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/folder/missing/list"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"err": "Folder not found", "ECODE": "FOLDER_001"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/team"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"err": "Token invalid", "ECODE": "OAUTH_025"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = common::client(&mock_server.uri());

    let err = client.get_lists("pk_test", "missing").await.unwrap_err();
    match err {
        ClickUpApiError::NotFound(message) => assert_eq!(message, "Folder not found (FOLDER_001)"),
        other => panic!("unexpected error: {other:?}"),
    }

    let err = client.get_teams("pk_test").await.unwrap_err();
    assert!(matches!(err, ClickUpApiError::AuthenticationFailed(_)));
}

#[tokio::test]
async fn test_request_token_uses_grant_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/oauth/token"))
        .and(body_json(json!({
            "client_id": "id",
            "client_secret": "secret",
            "grant_type": "authorization_code",
            "code": "the-code"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "at-1",
            "refresh_token": "rt-1",
            "user": {"id": 77}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = common::client(&mock_server.uri());
    let response = client
        .request_token(
            "id",
            "secret",
            TokenGrant::AuthorizationCode {
                code: "the-code".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(response.access_token, "at-1");
    assert_eq!(response.refresh_token.as_deref(), Some("rt-1"));
    assert_eq!(response.user.unwrap().id, "77");
}
