//! Use-case services driving the dashboard.
//!
//! # Responsibility
//! - Own session (roster + current user) and todo board state.
//! - Sequence repository calls and re-fetches after mutations.
//! - Report outcomes as transient notifications for the front end.
//!
//! # Invariants
//! - A failed operation leaves previously loaded state untouched.

pub mod notification;
pub mod session;
pub mod todo_board;
pub mod todo_form;
