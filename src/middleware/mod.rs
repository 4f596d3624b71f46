//! Middleware modules for request processing.

pub mod cors;

pub use cors::Cors;
