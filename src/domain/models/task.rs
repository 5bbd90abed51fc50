use serde::{Deserialize, Serialize};

use super::id;

/// Task payload sent to ClickUp when creating a task.
///
/// Optional fields are omitted from the request body when unset so ClickUp
/// applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickUpTask {
    #[serde(
        default,
        deserialize_with = "id::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_estimate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,
}

/// Partial task update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_estimate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// ClickUp task priority levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPriority {
    Urgent = 1,
    High = 2,
    Normal = 3,
    Low = 4,
}

impl TaskPriority {
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Urgent),
            2 => Some(Self::High),
            3 => Some(Self::Normal),
            4 => Some(Self::Low),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::High => "high",
            Self::Normal => "normal",
            Self::Low => "low",
        }
    }
}

impl TaskUpdate {
    /// True when no field would be sent to ClickUp
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_serialization_skips_unset_fields() {
        let task = ClickUpTask {
            name: "Write release notes".to_string(),
            priority: Some(2),
            ..Default::default()
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Write release notes", "priority": 2}));
    }

    #[test]
    fn test_task_accepts_numeric_id() {
        let task: ClickUpTask =
            serde_json::from_str(r#"{"id": 9001, "name": "From API"}"#).unwrap();
        assert_eq!(task.id.as_deref(), Some("9001"));
    }

    #[test]
    fn test_priority_range() {
        assert_eq!(TaskPriority::from_u8(1), Some(TaskPriority::Urgent));
        assert_eq!(TaskPriority::from_u8(4).map(TaskPriority::as_str), Some("low"));
        assert_eq!(TaskPriority::from_u8(0), None);
        assert_eq!(TaskPriority::from_u8(5), None);
    }

    #[test]
    fn test_empty_update() {
        assert!(TaskUpdate::default().is_empty());
        let update = TaskUpdate {
            status: Some("done".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
