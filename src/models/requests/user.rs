//! User-related request models.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::validators::validate_not_blank;

/// Request payload for creating a user
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// Display name (1-255 characters)
    #[validate(
        length(max = 255, message = "Name must be at most 255 characters"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Jane Doe")]
    pub name: String,
    /// Email address, unique across all users
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    /// Password (minimum 6 characters)
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "s3cret!")]
    pub password: String,
}

/// Request payload for updating a user
///
/// Every field is optional; only the fields present are changed.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    /// New display name
    #[validate(
        length(max = 255, message = "Name must be at most 255 characters"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Jane Smith")]
    pub name: Option<String>,
    /// New email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane.smith@example.com")]
    pub email: Option<String>,
}
