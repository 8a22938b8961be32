//! Persistence ports the auth core depends on.
//!
//! The core only sees the [`UserStore`] and [`AppRegistry`] capability sets.
//! Postgres is the production adapter; tests run against an in-memory fake.

use std::fmt;

use async_trait::async_trait;
use sqlx::FromRow;
use thiserror::Error;

#[cfg(test)]
pub mod memory;
pub mod postgres;

/// User record as kept by the store.
#[derive(Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub pass_hash: Vec<u8>, // PHC-encoded Argon2 hash
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Registered consumer application. Tokens for it are signed with `secret`.
#[derive(Clone, FromRow)]
pub struct App {
    pub id: i32,
    pub name: String,
    pub secret: String,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("user not found")]
    UserNotFound,
    #[error("user already exists")]
    UserExists,
    #[error("app not found")]
    AppNotFound,
    #[error("storage backend: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new user. Fails with [`StorageError::UserExists`] when the
    /// email is taken; the check and the write are one atomic operation.
    async fn save_user(&self, email: &str, pass_hash: &[u8]) -> Result<i64, StorageError>;
    async fn user_by_email(&self, email: &str) -> Result<User, StorageError>;
    async fn is_admin(&self, user_id: i64) -> Result<bool, StorageError>;
}

#[async_trait]
pub trait AppRegistry: Send + Sync {
    async fn app(&self, app_id: i32) -> Result<App, StorageError>;
}
