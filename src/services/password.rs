//! Password hashing utilities.

use bcrypt::hash;

use crate::errors::ApiError;

/// Hash a password using bcrypt.
///
/// The hash is computed on the blocking thread pool.
pub async fn hash_password(password: String, cost: u32) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || hash(password, cost))
        .await
        .map_err(|e| ApiError::internal(format!("password hashing task failed: {}", e)))?
        .map_err(ApiError::from)
}
