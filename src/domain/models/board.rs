use serde::{Deserialize, Serialize};

use super::id;

/// Board created inside a ClickUp space.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickUpBoard {
    #[serde(
        default,
        deserialize_with = "id::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub space_id: String,
}
