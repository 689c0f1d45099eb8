//! Todo and note models.
//!
//! # Responsibility
//! - Define the read model returned by `/todos` endpoints.
//! - Define the write model (`TodoPayload`) sent on create/update.
//!
//! # Invariants
//! - `tags` is de-duplicated, trimmed and lowercase when produced by this client.
//! - `notes` is append-only; a note never moves to another todo.

use crate::model::user::{User, UserId, UserRef};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Opaque backend identifier for todos.
pub type TodoId = String;

/// Todo priority, serialized with its capitalized label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!(
                "unsupported priority `{other}`; expected high|medium|low"
            )),
        }
    }
}

/// Note attached to a todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    pub created_by: UserRef,
    #[serde(default)]
    pub created_at: String,
}

/// Todo read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: TodoId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub mentioned_users: Vec<UserRef>,
    #[serde(default)]
    pub notes: Vec<Note>,
    pub created_by: UserRef,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Todo {
    /// Ids of mentioned users, whether or not the backend populated them.
    pub fn mentioned_user_ids(&self) -> Vec<UserId> {
        self.mentioned_users
            .iter()
            .map(|user| user.id().to_string())
            .collect()
    }

    /// Returns a copy with author/mention references resolved against the roster.
    pub fn resolved_with(&self, roster: &[User]) -> Todo {
        let mut todo = self.clone();
        todo.created_by = self.created_by.resolve_with(roster);
        todo.mentioned_users = self
            .mentioned_users
            .iter()
            .map(|user| user.resolve_with(roster))
            .collect();
        for note in &mut todo.notes {
            note.created_by = note.created_by.resolve_with(roster);
        }
        todo
    }
}

/// Write model for `POST /todos` and `PUT /todos/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPayload {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub mentioned_users: Vec<UserId>,
    pub created_by: UserId,
}

/// Body for `POST /todos/:id/notes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePayload {
    pub content: String,
    pub created_by: UserId,
}

#[cfg(test)]
mod tests {
    use super::{Priority, Todo, TodoPayload};
    use crate::model::user::UserRef;

    #[test]
    fn priority_parses_case_insensitively_and_serializes_capitalized() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!(serde_json::to_string(&Priority::Low).unwrap(), r#""Low""#);
    }

    #[test]
    fn todo_accepts_mixed_user_refs() {
        let todo: Todo = serde_json::from_str(
            r#"{
                "_id": "t1",
                "title": "Ship",
                "description": "ping @al",
                "priority": "High",
                "tags": ["work"],
                "mentionedUsers": ["u1", {"_id":"u2","username":"bo"}],
                "notes": [{"_id":"n1","content":"hi","createdBy":"u1","createdAt":"t"}],
                "createdBy": "u1",
                "createdAt": "t",
                "updatedAt": "t"
            }"#,
        )
        .unwrap();
        assert_eq!(todo.mentioned_user_ids(), vec!["u1", "u2"]);
        assert!(matches!(todo.created_by, UserRef::Unresolved(_)));
        assert_eq!(todo.notes.len(), 1);
    }

    #[test]
    fn payload_uses_backend_field_names() {
        let payload = TodoPayload {
            title: "t".to_string(),
            description: "d".to_string(),
            priority: Priority::Medium,
            tags: vec![],
            mentioned_users: vec!["u1".to_string()],
            created_by: "u1".to_string(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["mentionedUsers"][0], "u1");
        assert_eq!(value["createdBy"], "u1");
        assert_eq!(value["priority"], "Medium");
    }
}
