//! Core client logic for the Taskboard todo dashboard.
//! Owns session state, the todo mutation flow and text derivations; the
//! backend is reached only through the HTTP `ApiClient`.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod extract;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use api::{
    ApiClient, ApiResponse, PaginatedResponse, Pagination, RequestError, RequestResult,
    TodoListQuery,
};
pub use auth::{LoginError, LoginFlow, PasswordTable};
pub use config::ClientConfig;
pub use extract::mention::{extract_mention_names, resolve_mentions};
pub use extract::tag::{normalize_tag, normalize_tags, TagAddOutcome, TagSet};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::todo::{Note, NotePayload, Priority, Todo, TodoId, TodoPayload};
pub use model::user::{NewUser, User, UserId, UserRef};
pub use repo::preference_repo::{
    PreferenceRepository, SqlitePreferenceRepository, CURRENT_USER_KEY,
};
pub use repo::todo_repo::TodoRepository;
pub use repo::user_repo::UserRepository;
pub use service::notification::{Notification, NotificationLevel, Notifications};
pub use service::session::{Route, SessionPhase, SessionStore};
pub use service::todo_board::{BoardError, BoardResult, TodoBoard};
pub use service::todo_form::{FieldError, TodoForm, TodoFormErrors};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
