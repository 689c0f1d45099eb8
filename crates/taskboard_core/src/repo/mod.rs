//! Data access contracts.
//!
//! # Responsibility
//! - Define the user/todo contracts the session and board depend on.
//! - Implement them over the HTTP `ApiClient`.
//! - Persist local preferences (selected user) in SQLite.
//!
//! # Invariants
//! - Remote repositories are the source of truth; callers re-fetch after
//!   mutations instead of patching local copies.

pub mod preference_repo;
pub mod todo_repo;
pub mod user_repo;
