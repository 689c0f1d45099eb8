//! Domain model mirrored from the backend REST payloads.
//!
//! # Responsibility
//! - Define the user/todo/note records exchanged with the backend.
//! - Keep "populated object or bare id" fields explicit via `UserRef`.
//!
//! # Invariants
//! - Ids are opaque strings issued by the backend; the client never mints them.
//! - Timestamps are kept as the backend's ISO-8601 strings.

pub mod todo;
pub mod user;
