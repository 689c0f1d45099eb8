//! Create/edit form state for todos.
//!
//! # Responsibility
//! - Hold field values between edits.
//! - Keep tags normalized and mentions derived from the description.
//! - Validate fields before anything reaches the network.
//!
//! # Invariants
//! - `tags` never contains duplicates or blank values.
//! - `mentioned_users` only changes when a description edit resolves at
//!   least one mention; removing every mention keeps the previous ids.

use crate::extract::mention::resolve_mentions;
use crate::extract::tag::{TagAddOutcome, TagSet};
use crate::model::todo::{Priority, Todo, TodoId, TodoPayload};
use crate::model::user::{User, UserId};

pub const TITLE_MIN_CHARS: usize = 3;
pub const DESCRIPTION_MIN_CHARS: usize = 5;

/// One field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", summarize(.fields))]
pub struct TodoFormErrors {
    pub fields: Vec<FieldError>,
}

impl TodoFormErrors {
    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }
}

fn summarize(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|error| error.message)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoForm {
    editing: Option<TodoId>,
    pub title: String,
    description: String,
    pub priority: Priority,
    tags: TagSet,
    pub tag_input: String,
    mentioned_users: Vec<UserId>,
}

impl TodoForm {
    /// Empty form for creating a todo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Form pre-filled from an existing todo.
    pub fn for_todo(todo: &Todo) -> Self {
        Self {
            editing: Some(todo.id.clone()),
            title: todo.title.clone(),
            description: todo.description.clone(),
            priority: todo.priority,
            tags: TagSet::from_tags(&todo.tags),
            tag_input: String::new(),
            mentioned_users: todo.mentioned_user_ids(),
        }
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Replaces the description and re-derives mentions against `roster`.
    pub fn set_description(&mut self, description: impl Into<String>, roster: &[User]) {
        self.description = description.into();
        let mentions = resolve_mentions(&self.description, roster);
        if !mentions.is_empty() {
            self.mentioned_users = mentions;
        }
    }

    pub fn add_tag(&mut self, raw: &str) -> TagAddOutcome {
        let outcome = self.tags.add(raw);
        if matches!(outcome, TagAddOutcome::Added(_)) {
            self.tag_input.clear();
        }
        outcome
    }

    /// Adds the pending tag input (the "press Enter" path).
    pub fn add_tag_from_input(&mut self) -> TagAddOutcome {
        let raw = self.tag_input.clone();
        self.add_tag(&raw)
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        self.tags.remove(tag)
    }

    pub fn tags(&self) -> &[String] {
        self.tags.as_slice()
    }

    pub fn mentioned_users(&self) -> &[UserId] {
        &self.mentioned_users
    }

    pub fn validate(&self) -> Result<(), TodoFormErrors> {
        let mut fields = Vec::new();
        if self.title.chars().count() < TITLE_MIN_CHARS {
            fields.push(FieldError {
                field: "title",
                message: "Title must be at least 3 characters",
            });
        }
        if self.description.chars().count() < DESCRIPTION_MIN_CHARS {
            fields.push(FieldError {
                field: "description",
                message: "Description must be at least 5 characters",
            });
        }
        if fields.is_empty() {
            Ok(())
        } else {
            Err(TodoFormErrors { fields })
        }
    }

    /// Validates and builds the write payload attributed to `created_by`.
    pub fn to_payload(&self, created_by: &str) -> Result<TodoPayload, TodoFormErrors> {
        self.validate()?;
        Ok(TodoPayload {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            tags: self.tags.as_slice().to_vec(),
            mentioned_users: self.mentioned_users.clone(),
            created_by: created_by.to_string(),
        })
    }

    /// Clears all fields, leaving create mode.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
