//! In-memory [`UserRepository`] used by service and handler tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::models::User;
use crate::repositories::{RepositoryError, RepositoryResult, UserRepository};

#[derive(Default)]
struct State {
    users: Vec<User>,
    next_id: i64,
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    state: Mutex<State>,
    delay: Option<Duration>,
    unavailable: bool,
    blind_email_lookup: bool,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps for `delay` before touching the data.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Every call fails the way a dropped connection would.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Email lookups never see existing rows, as if a concurrent request
    /// inserted between the check and the write.
    pub fn with_blind_email_lookup() -> Self {
        Self {
            blind_email_lookup: true,
            ..Self::default()
        }
    }

    /// Insert a row directly, bypassing the service.
    pub fn seed(&self, name: &str, email: &str) -> User {
        self.insert(name, email, "seeded-hash")
            .expect("seeded email must be unique")
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().users.len()
    }

    pub fn get(&self, id: i64) -> Option<User> {
        let state = self.state.lock().unwrap();
        state.users.iter().find(|u| u.id == id).cloned()
    }

    fn insert(&self, name: &str, email: &str, password_hash: &str) -> RepositoryResult<User> {
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.email == email) {
            return Err(RepositoryError::UniqueViolation("users_email_key".to_string()));
        }

        state.next_id += 1;
        let now = Utc::now();
        let user = User {
            id: state.next_id,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn enter(&self, operation: &'static str) -> RepositoryResult<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.unavailable {
            return Err(RepositoryError::Query {
                operation,
                source: sqlx::Error::PoolTimedOut,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> RepositoryResult<User> {
        self.enter("create user").await?;
        self.insert(name, email, password_hash)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<User> {
        self.enter("get user by id").await?;
        self.get(id)
            .ok_or_else(|| RepositoryError::NotFound(format!("user with id {}", id)))
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<User> {
        self.enter("get user by email").await?;
        if self.blind_email_lookup {
            return Err(RepositoryError::NotFound("user by email".to_string()));
        }
        let state = self.state.lock().unwrap();
        state
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound("user by email".to_string()))
    }

    async fn find_all(&self, limit: i64, offset: i64) -> RepositoryResult<Vec<User>> {
        self.enter("list users").await?;
        let state = self.state.lock().unwrap();
        let mut users = state.users.clone();
        users.sort_by_key(|u| u.id);
        Ok(users
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn update(
        &self,
        id: i64,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> RepositoryResult<User> {
        self.enter("update user").await?;
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.email == email && u.id != id) {
            return Err(RepositoryError::UniqueViolation("users_email_key".to_string()));
        }

        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| RepositoryError::NotFound(format!("user with id {}", id)))?;
        user.name = name.to_string();
        user.email = email.to_string();
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        self.enter("delete user").await?;
        let mut state = self.state.lock().unwrap();
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        if state.users.len() == before {
            return Err(RepositoryError::NotFound(format!("user with id {}", id)));
        }
        Ok(())
    }

    async fn count(&self) -> RepositoryResult<i64> {
        self.enter("count users").await?;
        Ok(self.state.lock().unwrap().users.len() as i64)
    }
}
