use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// User row stored in the `users` table.
///
/// Never serialized directly: the password hash stays inside the service.
/// Use [`crate::models::UserResponse`] for anything leaving the process.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
