//! Success message constants used throughout the application.

pub const MSG_USER_CREATED: &str = "User created successfully";
pub const MSG_USER_RETRIEVED: &str = "User retrieved successfully";
pub const MSG_USERS_RETRIEVED: &str = "Users retrieved successfully";
pub const MSG_USER_UPDATED: &str = "User updated successfully";
pub const MSG_USER_DELETED: &str = "User deleted successfully";

pub const MSG_SERVER_RUNNING: &str = "Server is running";
