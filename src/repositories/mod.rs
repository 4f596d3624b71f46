//! Repository layer for database operations.
//!
//! This module provides a clean separation between business logic (services)
//! and database operations (repositories). Services depend on the
//! [`UserRepository`] trait, so tests swap in an in-memory implementation.

pub mod error;
#[cfg(test)]
pub mod memory;
pub mod user_repository;

pub use error::{RepositoryError, RepositoryResult};
pub use user_repository::{PgUserRepository, UserRepository};
