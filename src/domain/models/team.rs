use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id;

/// A ClickUp team (workspace) the authorized user belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClickUpTeam {
    #[serde(deserialize_with = "id::string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub members: Vec<TeamMember>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub user: TeamUser,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamUser {
    #[serde(deserialize_with = "id::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(
        rename = "profilePicture",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_picture: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_from_api_payload() {
        let json = serde_json::json!({
            "id": "1234",
            "name": "Platform",
            "color": "#536cfe",
            "avatar": null,
            "members": [{
                "user": {
                    "id": 183,
                    "username": "ada",
                    "email": "ada@example.com",
                    "color": "#827718",
                    "profilePicture": "https://example.com/ada.png"
                },
                "role": 1
            }]
        });

        let team: ClickUpTeam = serde_json::from_value(json).unwrap();
        assert_eq!(team.id, "1234");
        assert_eq!(team.members.len(), 1);
        assert_eq!(team.members[0].user.id, "183");
        assert_eq!(
            team.members[0].user.profile_picture.as_deref(),
            Some("https://example.com/ada.png")
        );
    }
}
