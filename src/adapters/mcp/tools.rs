//! ClickUp tool catalogue and argument handling for the MCP server.

use serde_json::{json, Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

use crate::domain::error::ServiceError;
use crate::domain::models::{ClickUpBoard, ClickUpTask, TaskUpdate};
use crate::services::{ClickUpService, TokenSource};

pub const CREATE_TASK: &str = "clickup_create_task";
pub const UPDATE_TASK: &str = "clickup_update_task";
pub const GET_TEAMS: &str = "clickup_get_teams";
pub const GET_LISTS: &str = "clickup_get_lists";
pub const CREATE_BOARD: &str = "clickup_create_board";

const ID_DESCRIPTION: &str = "The unique identifier for the resource in ClickUp.";

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("No arguments provided")]
    NoArguments,

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Failed to serialize tool result: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn task_properties() -> Map<String, Value> {
    let properties = json!({
        "name": { "type": "string", "description": "Task name" },
        "description": { "type": "string", "description": "Task description in markdown format" },
        "assignees": {
            "type": "array",
            "items": { "type": "string" },
            "description": "Array of assignee user IDs"
        },
        "status": { "type": "string", "description": "Task status" },
        "priority": {
            "type": "number",
            "enum": [1, 2, 3, 4],
            "description": "Task priority (1: Urgent, 2: High, 3: Normal, 4: Low)"
        },
        "due_date": { "type": "string", "description": "Due date in milliseconds timestamp" },
        "time_estimate": { "type": "string", "description": "Time estimate in milliseconds" },
        "tags": {
            "type": "array",
            "items": { "type": "string" },
            "description": "Array of tag names"
        }
    });
    match properties {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn with_id_property(id_field: &str, description: &str) -> Value {
    let mut properties = Map::new();
    properties.insert(
        id_field.to_string(),
        json!({ "type": "string", "description": format!("{description} {ID_DESCRIPTION}") }),
    );
    properties.extend(task_properties());
    Value::Object(properties)
}

/// The `tools` array returned by `tools/list`
pub fn tool_definitions() -> Value {
    json!([
        {
            "name": CREATE_TASK,
            "description": "Create a new task in ClickUp workspace",
            "inputSchema": {
                "type": "object",
                "properties": with_id_property("list_id", "The ID of the list to create the task in."),
                "required": ["list_id", "name"]
            }
        },
        {
            "name": UPDATE_TASK,
            "description": "Update an existing task in ClickUp",
            "inputSchema": {
                "type": "object",
                "properties": with_id_property("task_id", "The ID of the task to update."),
                "required": ["task_id"]
            }
        },
        {
            "name": GET_TEAMS,
            "description": "Get all teams accessible to the authenticated user",
            "inputSchema": { "type": "object", "properties": {} }
        },
        {
            "name": GET_LISTS,
            "description": "Get all lists in a specific folder",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "folder_id": {
                        "type": "string",
                        "description": format!("The ID of the folder to get lists from. {ID_DESCRIPTION}")
                    }
                },
                "required": ["folder_id"]
            }
        },
        {
            "name": CREATE_BOARD,
            "description": "Create a new board in a ClickUp space",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "space_id": {
                        "type": "string",
                        "description": format!("The ID of the space to create the board in. {ID_DESCRIPTION}")
                    },
                    "name": { "type": "string", "description": "Board name" },
                    "content": { "type": "string", "description": "Board description or content" }
                },
                "required": ["space_id", "name"]
            }
        }
    ])
}

/// A validated tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequest {
    CreateTask { list_id: String, task: ClickUpTask },
    UpdateTask { task_id: String, update: TaskUpdate },
    GetTeams,
    GetLists { folder_id: String },
    CreateBoard(ClickUpBoard),
}

impl ToolRequest {
    /// Validate a `tools/call` name and its arguments
    pub fn parse(name: &str, arguments: Option<&Value>) -> Result<Self, ToolError> {
        if ![CREATE_TASK, UPDATE_TASK, GET_TEAMS, GET_LISTS, CREATE_BOARD].contains(&name) {
            return Err(ToolError::UnknownTool(name.to_string()));
        }

        let args = match arguments {
            Some(Value::Object(map)) => Some(map),
            Some(Value::Null) | None => None,
            Some(_) => {
                return Err(ToolError::InvalidArgument(
                    "Arguments must be an object".to_string(),
                ))
            }
        };

        // No-argument tool; everything else needs an arguments object
        if name == GET_TEAMS {
            return Ok(Self::GetTeams);
        }
        let args = args.ok_or(ToolError::NoArguments)?;

        match name {
            CREATE_TASK => {
                let name = required_str(args, "name", "Task name")?;
                let list_id = required_str(args, "list_id", "List ID")?;
                let task = ClickUpTask {
                    name,
                    list_id: Some(list_id.clone()),
                    description: optional_str(args, "description"),
                    status: optional_str(args, "status"),
                    priority: priority(args)?,
                    assignees: string_array(args, "assignees"),
                    due_date: optional_str(args, "due_date"),
                    time_estimate: optional_str(args, "time_estimate"),
                    tags: string_array(args, "tags"),
                    ..Default::default()
                };
                Ok(Self::CreateTask { list_id, task })
            }
            UPDATE_TASK => {
                let task_id = required_str(args, "task_id", "Task ID")?;
                let update = TaskUpdate {
                    name: optional_str(args, "name"),
                    description: optional_str(args, "description"),
                    status: optional_str(args, "status"),
                    priority: priority(args)?,
                    assignees: string_array(args, "assignees"),
                    due_date: optional_str(args, "due_date"),
                    time_estimate: optional_str(args, "time_estimate"),
                    tags: string_array(args, "tags"),
                };
                Ok(Self::UpdateTask { task_id, update })
            }
            GET_LISTS => Ok(Self::GetLists {
                folder_id: required_str(args, "folder_id", "Folder ID")?,
            }),
            _ => {
                let space_id = required_str(args, "space_id", "Space ID")?;
                let name = required_str(args, "name", "Board name")?;
                Ok(Self::CreateBoard(ClickUpBoard {
                    id: None,
                    name,
                    content: optional_str(args, "content"),
                    space_id,
                }))
            }
        }
    }
}

fn required_str(args: &Map<String, Value>, key: &str, label: &str) -> Result<String, ToolError> {
    match args.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(ToolError::InvalidArgument(format!(
            "{label} is required and must be a string"
        ))),
    }
}

/// Strings pass through; numbers (timestamps, durations) are stringified
fn optional_str(args: &Map<String, Value>, key: &str) -> Option<String> {
    match args.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_array(args: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    let items = args.get(key)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
    )
}

/// Numeric priority; the 1..=4 range is enforced by the service
fn priority(args: &Map<String, Value>) -> Result<Option<u8>, ToolError> {
    let Some(value) = args.get("priority").filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    value
        .as_u64()
        .and_then(|p| u8::try_from(p).ok())
        .map(Some)
        .ok_or_else(|| {
            ToolError::InvalidArgument(
                "Priority must be a number between 1 (urgent) and 4 (low)".to_string(),
            )
        })
}

/// Runs validated tool requests against ClickUp with the configured token
pub struct ToolExecutor {
    service: Arc<ClickUpService>,
    tokens: TokenSource,
}

impl ToolExecutor {
    pub fn new(service: Arc<ClickUpService>, tokens: TokenSource) -> Self {
        Self { service, tokens }
    }

    pub fn token_source(&self) -> &TokenSource {
        &self.tokens
    }

    /// Validate and execute a tool call, returning ClickUp's JSON response
    pub async fn call(&self, name: &str, arguments: Option<&Value>) -> Result<Value, ToolError> {
        debug!(tool = name, "tool call");
        let result = self.dispatch(name, arguments).await;
        if let Err(ref e) = result {
            error!(tool = name, error = %e, "Error executing tool");
        }
        result
    }

    async fn dispatch(&self, name: &str, arguments: Option<&Value>) -> Result<Value, ToolError> {
        let request = ToolRequest::parse(name, arguments)?;
        let token = self.tokens.access_token().await?;

        let value = match request {
            ToolRequest::CreateTask { list_id, task } => {
                self.service.create_task(&token, &list_id, &task).await?
            }
            ToolRequest::UpdateTask { task_id, update } => {
                self.service.update_task(&token, &task_id, &update).await?
            }
            ToolRequest::GetTeams => to_json(self.service.get_teams(&token).await?)?,
            ToolRequest::GetLists { folder_id } => {
                to_json(self.service.get_lists(&token, &folder_id).await?)?
            }
            ToolRequest::CreateBoard(board) => self.service.create_board(&token, &board).await?,
        };
        Ok(value)
    }
}

fn to_json<T: serde::Serialize>(value: T) -> Result<Value, ToolError> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ClickUpApiError;
    use crate::domain::models::ClickUpTeam;
    use crate::domain::ports::mocks::MockApi;

    fn message(result: Result<ToolRequest, ToolError>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn test_unserializable_result_is_an_error() {
        let mut pairs = std::collections::HashMap::new();
        pairs.insert((1u8, 2u8), "x");
        let err = to_json(pairs).unwrap_err();
        assert!(matches!(err, ToolError::Serialization(_)));
        assert!(err.to_string().starts_with("Failed to serialize tool result"));
    }

    #[test]
    fn test_catalogue_lists_five_tools() {
        let tools = tool_definitions();
        let names: Vec<&str> = tools
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![CREATE_TASK, UPDATE_TASK, GET_TEAMS, GET_LISTS, CREATE_BOARD]
        );

        let create = &tools[0]["inputSchema"];
        assert_eq!(create["required"], json!(["list_id", "name"]));
        assert_eq!(create["properties"]["priority"]["enum"], json!([1, 2, 3, 4]));
        assert!(create["properties"]["list_id"]["description"]
            .as_str()
            .unwrap()
            .ends_with(ID_DESCRIPTION));
    }

    #[test]
    fn test_parse_create_task() {
        let args = json!({
            "list_id": "901",
            "name": "Write docs",
            "priority": 2,
            "assignees": ["12", 34],
            "due_date": 1_700_000_000_000_u64,
            "tags": ["docs"]
        });

        let request = ToolRequest::parse(CREATE_TASK, Some(&args)).unwrap();
        let ToolRequest::CreateTask { list_id, task } = request else {
            panic!("expected create task");
        };
        assert_eq!(list_id, "901");
        assert_eq!(task.name, "Write docs");
        assert_eq!(task.priority, Some(2));
        assert_eq!(task.assignees, Some(vec!["12".to_string(), "34".to_string()]));
        assert_eq!(task.due_date.as_deref(), Some("1700000000000"));
        assert_eq!(task.description, None);
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            message(ToolRequest::parse(CREATE_TASK, None)),
            "No arguments provided"
        );
        assert_eq!(
            message(ToolRequest::parse(CREATE_TASK, Some(&json!({"list_id": "1"})))),
            "Task name is required and must be a string"
        );
        assert_eq!(
            message(ToolRequest::parse(CREATE_TASK, Some(&json!({"name": "x", "list_id": 5})))),
            "List ID is required and must be a string"
        );
        assert_eq!(
            message(ToolRequest::parse(UPDATE_TASK, Some(&json!({})))),
            "Task ID is required and must be a string"
        );
        assert_eq!(
            message(ToolRequest::parse(GET_LISTS, Some(&json!({})))),
            "Folder ID is required and must be a string"
        );
        assert_eq!(
            message(ToolRequest::parse(CREATE_BOARD, Some(&json!({"name": "b"})))),
            "Space ID is required and must be a string"
        );
        assert_eq!(
            message(ToolRequest::parse(CREATE_BOARD, Some(&json!({"space_id": "s"})))),
            "Board name is required and must be a string"
        );
        assert_eq!(
            message(ToolRequest::parse("clickup_delete_everything", Some(&json!({})))),
            "Unknown tool: clickup_delete_everything"
        );
        assert!(message(ToolRequest::parse(
            UPDATE_TASK,
            Some(&json!({"task_id": "t", "priority": "high"}))
        ))
        .starts_with("Priority must be"));
    }

    #[test]
    fn test_get_teams_needs_no_arguments() {
        assert_eq!(
            ToolRequest::parse(GET_TEAMS, None).unwrap(),
            ToolRequest::GetTeams
        );
    }

    #[test]
    fn test_update_task_only_carries_given_fields() {
        let args = json!({"task_id": "abc", "status": "complete"});
        let ToolRequest::UpdateTask { task_id, update } =
            ToolRequest::parse(UPDATE_TASK, Some(&args)).unwrap()
        else {
            panic!("expected update task");
        };
        assert_eq!(task_id, "abc");
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"status": "complete"})
        );
    }

    #[tokio::test]
    async fn test_executor_requires_token() {
        let executor = ToolExecutor::new(
            Arc::new(ClickUpService::new(Arc::new(MockApi::new()))),
            TokenSource::None,
        );

        let err = executor.call(GET_TEAMS, Some(&json!({}))).await.unwrap_err();
        assert_eq!(err.to_string(), "No authentication token found");
    }

    #[tokio::test]
    async fn test_executor_get_teams() {
        let mut api = MockApi::new();
        api.expect_get_teams()
            .withf(|token| token == "pk_test")
            .returning(|_| {
                Ok(vec![ClickUpTeam {
                    id: "1".to_string(),
                    name: "Team 1".to_string(),
                    ..Default::default()
                }])
            });

        let executor = ToolExecutor::new(
            Arc::new(ClickUpService::new(Arc::new(api))),
            TokenSource::Static("pk_test".to_string()),
        );

        let teams = executor.call(GET_TEAMS, None).await.unwrap();
        assert_eq!(teams[0]["name"], "Team 1");
    }

    #[tokio::test]
    async fn test_executor_rejects_out_of_range_priority() {
        let executor = ToolExecutor::new(
            Arc::new(ClickUpService::new(Arc::new(MockApi::new()))),
            TokenSource::Static("pk_test".to_string()),
        );

        let err = executor
            .call(UPDATE_TASK, Some(&json!({"task_id": "t1", "priority": 9})))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Priority must be between 1"));
    }

    #[tokio::test]
    async fn test_executor_surfaces_service_error() {
        let mut api = MockApi::new();
        api.expect_create_board()
            .returning(|_, _| Err(ClickUpApiError::NotFound("Space not found".into())));

        let executor = ToolExecutor::new(
            Arc::new(ClickUpService::new(Arc::new(api))),
            TokenSource::Static("pk_test".to_string()),
        );

        let err = executor
            .call(CREATE_BOARD, Some(&json!({"space_id": "s1", "name": "Roadmap"})))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to create board in ClickUp");
    }
}
