//! User-related response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::User;

/// User data returned in API responses (without the password hash)
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct UserResponse {
    /// User's unique identifier
    #[schema(example = 1)]
    pub id: i64,
    /// Display name
    #[schema(example = "Jane Doe")]
    pub name: String,
    /// User's email address
    #[schema(example = "jane@example.com")]
    pub email: String,
    /// When the user was created
    pub created_at: DateTime<Utc>,
    /// When the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Confirmation payload for a deleted user
#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedUserResponse {
    /// Identifier of the removed user
    #[schema(example = 7)]
    pub id: i64,
}
