//! Error message constants used throughout the application.

// Envelope summaries, one per error kind
pub const ERR_BAD_REQUEST: &str = "Bad request";
pub const ERR_VALIDATION_FAILED: &str = "Validation failed";
pub const ERR_NOT_FOUND: &str = "Resource not found";
pub const ERR_CONFLICT: &str = "Conflict";
pub const ERR_TIMEOUT: &str = "Request timed out";
pub const ERR_INTERNAL: &str = "Internal server error";

// User errors
pub const ERR_USER_NOT_FOUND: &str = "User not found";
pub const ERR_INVALID_USER_ID: &str = "Invalid user ID";
pub const ERR_EMAIL_EXISTS: &str = "Email already exists";

// Infrastructure errors
pub const ERR_UNEXPECTED: &str = "An unexpected error occurred";
pub const ERR_STORE_TIMEOUT: &str = "The data store did not respond in time";
pub const ERR_OPERATION_TIMEOUT: &str = "The operation did not complete in time";

// Validation errors
pub const ERR_NAME_REQUIRED: &str = "Name is required";
