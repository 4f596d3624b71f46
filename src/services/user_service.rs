//! User service for user CRUD operations.
//!
//! Enforces email uniqueness, hashes passwords, resolves partial updates and
//! applies pagination defaults. Each operation runs under one overall time
//! bound on top of the per-query bound enforced by the repository.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::time::timeout;

use crate::constants::{CODE_TIMEOUT, DEFAULT_PAGE_SIZE, ERR_OPERATION_TIMEOUT};
use crate::errors::ApiError;
use crate::models::{CreateUserRequest, UpdateUserRequest, User};
use crate::repositories::UserRepository;
use crate::services::password::hash_password;
use crate::utils::mask_email;

/// One page of users plus the numbers needed for page metadata.
#[derive(Debug)]
pub struct UserPage {
    pub users: Vec<User>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    operation_timeout: Duration,
    hash_cost: u32,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        operation_timeout: Duration,
        hash_cost: u32,
    ) -> Self {
        Self {
            repository,
            operation_timeout,
            hash_cost,
        }
    }

    async fn bounded<T, F>(&self, operation: &'static str, work: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        timeout(self.operation_timeout, work)
            .await
            .unwrap_or_else(|_| {
                warn!(
                    "{} did not finish within {:?}",
                    operation, self.operation_timeout
                );
                Err(ApiError::Timeout {
                    code: CODE_TIMEOUT.to_string(),
                    message: ERR_OPERATION_TIMEOUT.to_string(),
                })
            })
    }

    /// Fail with a conflict if `email` belongs to a user other than `except_id`.
    async fn ensure_email_available(
        &self,
        email: &str,
        except_id: Option<i64>,
    ) -> Result<(), ApiError> {
        match self.repository.find_by_email(email).await {
            Ok(other) if Some(other.id) != except_id => {
                warn!("Email {} already taken by user {}", mask_email(email), other.id);
                Err(ApiError::email_exists())
            }
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn create_user(&self, req: CreateUserRequest) -> Result<User, ApiError> {
        self.bounded("create user", async {
            info!("Creating user with email: {}", mask_email(&req.email));

            // Fast path only; the unique constraint on email is the real guard
            // and surfaces as a conflict from the insert below.
            self.ensure_email_available(&req.email, None).await?;

            let password_hash = hash_password(req.password, self.hash_cost).await?;
            let user = self
                .repository
                .create(&req.name, &req.email, &password_hash)
                .await?;

            info!("Successfully created user: {}", user.id);
            Ok(user)
        })
        .await
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<User, ApiError> {
        self.bounded("get user", async {
            debug!("Fetching user by ID: {}", id);
            Ok(self.repository.find_by_id(id).await?)
        })
        .await
    }

    /// Fetch one page of users.
    ///
    /// `page` below 1 becomes 1; `limit` below 1 falls back to the default page size.
    pub async fn get_all_users(&self, page: i64, limit: i64) -> Result<UserPage, ApiError> {
        let page = page.max(1);
        let limit = if limit < 1 {
            DEFAULT_PAGE_SIZE as i64
        } else {
            limit
        };
        let offset = (page - 1).saturating_mul(limit);

        self.bounded("list users", async {
            debug!(
                "Fetching users page {} (limit {}, offset {})",
                page, limit, offset
            );
            let users = self.repository.find_all(limit, offset).await?;
            let total = self.repository.count().await?;

            Ok(UserPage {
                users,
                total: total.max(0) as u64,
                page: page as u64,
                limit: limit as u64,
            })
        })
        .await
    }

    /// Apply the supplied fields of `req` to user `id`.
    ///
    /// Omitted fields keep their stored values. The password hash is never
    /// changed here.
    pub async fn update_user(&self, id: i64, req: UpdateUserRequest) -> Result<User, ApiError> {
        self.bounded("update user", async {
            info!("Updating user: {}", id);

            let mut user = self.repository.find_by_id(id).await.map_err(|e| {
                if e.is_not_found() {
                    warn!("Update failed: User not found with id: {}", id);
                }
                ApiError::from(e)
            })?;

            if req.name.is_none() && req.email.is_none() {
                debug!("No changes requested for user: {}", id);
                return Ok(user);
            }

            if let Some(email) = req.email {
                if email != user.email {
                    self.ensure_email_available(&email, Some(id)).await?;
                    user.email = email;
                }
            }

            if let Some(name) = req.name {
                user.name = name;
            }

            let updated = self
                .repository
                .update(id, &user.name, &user.email, &user.password_hash)
                .await?;

            info!("Successfully updated user: {}", id);
            Ok(updated)
        })
        .await
    }

    /// Hard-delete user `id`; an absent id is reported as not found.
    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        self.bounded("delete user", async {
            info!("Deleting user with id: {}", id);

            self.repository.delete(id).await.map_err(|e| {
                if e.is_not_found() {
                    warn!("Delete failed: User not found with id: {}", id);
                }
                ApiError::from(e)
            })?;

            info!("Successfully deleted user: {}", id);
            Ok(())
        })
        .await
    }
}
