//! Demo login and registration.
//!
//! # Responsibility
//! - Bind "select a user" and "username + password" flows to the session.
//!
//! # Invariants
//! - Passwords live only in process memory; they are never persisted and
//!   never sent to the backend. This is a placeholder, not authentication.

mod login;

pub use login::{LoginError, LoginFlow, PasswordTable};
