//! Application constants module.
//!
//! This module centralizes constant strings used throughout the application,
//! including error messages, success messages, error codes, and pagination defaults.

pub mod error_codes;
pub mod errors;
pub mod messages;
pub mod pagination;

pub use error_codes::*;
pub use errors::*;
pub use messages::*;
pub use pagination::*;
