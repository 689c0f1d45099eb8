//! HTTP access to the todo backend.
//!
//! # Responsibility
//! - Issue one JSON request per backend operation.
//! - Normalize non-2xx responses into `RequestError`.
//!
//! # Invariants
//! - Every request carries `Content-Type: application/json`.
//! - A failed attempt surfaces immediately; there are no retries.

mod client;
mod envelope;
mod error;

pub use client::{ApiClient, TodoListQuery, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
pub use envelope::{ApiResponse, PaginatedResponse, Pagination};
pub use error::{RequestError, RequestResult, GENERIC_ERROR_MESSAGE};
