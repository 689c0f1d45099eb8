//! Pure derivations over user-entered text.
//!
//! # Responsibility
//! - Resolve `@username` mentions in descriptions to user ids.
//! - Normalize and de-duplicate tag input.
//!
//! # Invariants
//! - Functions here are stateless and never touch the network.

pub mod mention;
pub mod tag;
