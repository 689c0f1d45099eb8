//! User model and author/mention references.
//!
//! # Responsibility
//! - Define the `User` record returned by `/users`.
//! - Model `User | id` union fields as a tagged `UserRef`.
//!
//! # Invariants
//! - `username` is unique across the roster and drives `@mention` lookup.

use serde::{Deserialize, Serialize};

/// Opaque backend identifier for users.
pub type UserId = String;

/// Backend user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl User {
    /// Name shown in lists, falling back to the username when empty.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.username
        } else {
            &self.name
        }
    }

    /// Upper-cased initials of the display name ("Ada Lovelace" -> "AL").
    pub fn initials(&self) -> String {
        self.display_name()
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// Registration request body for `POST /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub email: String,
}

/// Reference to a user that the backend may or may not have populated.
///
/// Deserializes from either a full user object or a bare id string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Resolved(User),
    Unresolved(UserId),
}

impl UserRef {
    /// Returns the referenced user id regardless of population state.
    pub fn id(&self) -> &str {
        match self {
            Self::Resolved(user) => &user.id,
            Self::Unresolved(id) => id,
        }
    }

    /// Populated user, if the backend expanded the reference.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Resolved(user) => Some(user),
            Self::Unresolved(_) => None,
        }
    }

    /// Human-readable label: display name for populated refs, raw id otherwise.
    pub fn label(&self) -> &str {
        match self {
            Self::Resolved(user) => user.display_name(),
            Self::Unresolved(id) => id,
        }
    }

    /// Upgrades an unresolved reference using the roster, when possible.
    pub fn resolve_with(&self, roster: &[User]) -> UserRef {
        match self {
            Self::Resolved(_) => self.clone(),
            Self::Unresolved(id) => roster
                .iter()
                .find(|user| &user.id == id)
                .cloned()
                .map_or_else(|| self.clone(), UserRef::Resolved),
        }
    }
}

impl From<User> for UserRef {
    fn from(value: User) -> Self {
        Self::Resolved(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{User, UserRef};

    fn user(id: &str, username: &str, name: &str) -> User {
        User {
            id: id.to_string(),
            username: username.to_string(),
            name: name.to_string(),
            email: format!("{username}@example.com"),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn user_ref_deserializes_from_object_or_string() {
        let resolved: UserRef = serde_json::from_str(
            r#"{"_id":"u1","username":"al","name":"Al","email":"al@x.io","createdAt":"t","updatedAt":"t"}"#,
        )
        .unwrap();
        assert_eq!(resolved.id(), "u1");
        assert!(resolved.user().is_some());

        let bare: UserRef = serde_json::from_str(r#""u2""#).unwrap();
        assert_eq!(bare, UserRef::Unresolved("u2".to_string()));
        assert_eq!(bare.label(), "u2");
    }

    #[test]
    fn resolve_with_upgrades_known_ids_only() {
        let roster = vec![user("u1", "al", "Al Smith")];
        let known = UserRef::Unresolved("u1".to_string()).resolve_with(&roster);
        assert_eq!(known.label(), "Al Smith");

        let unknown = UserRef::Unresolved("zz".to_string()).resolve_with(&roster);
        assert_eq!(unknown, UserRef::Unresolved("zz".to_string()));
    }

    #[test]
    fn initials_fall_back_to_username() {
        assert_eq!(user("u1", "al", "ada lovelace").initials(), "AL");
        assert_eq!(user("u1", "bob", "  ").initials(), "B");
    }
}
