//! Response models for API endpoints.

pub mod api;
pub mod pagination;
pub mod user;

pub use api::*;
pub use pagination::*;
pub use user::*;
