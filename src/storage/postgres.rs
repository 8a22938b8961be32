use async_trait::async_trait;
use sqlx::PgPool;

use super::{App, AppRegistry, StorageError, User, UserStore};

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        StorageError::Backend(Box::new(e))
    }
}

#[derive(Clone)]
pub struct PgStorage {
    db: PgPool,
}

impl PgStorage {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgStorage {
    async fn save_user(&self, email: &str, pass_hash: &[u8]) -> Result<i64, StorageError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (email, pass_hash)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(email)
        .bind(pass_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            let duplicate = e
                .as_database_error()
                .is_some_and(|db_err| db_err.is_unique_violation());
            if duplicate {
                StorageError::UserExists
            } else {
                StorageError::from(e)
            }
        })?;
        Ok(id)
    }

    async fn user_by_email(&self, email: &str) -> Result<User, StorageError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, pass_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StorageError::UserNotFound)
    }

    async fn is_admin(&self, user_id: i64) -> Result<bool, StorageError> {
        sqlx::query_scalar::<_, bool>(r#"SELECT is_admin FROM users WHERE id = $1"#)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(StorageError::UserNotFound)
    }
}

#[async_trait]
impl AppRegistry for PgStorage {
    async fn app(&self, app_id: i32) -> Result<App, StorageError> {
        sqlx::query_as::<_, App>(r#"SELECT id, name, secret FROM apps WHERE id = $1"#)
            .bind(app_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(StorageError::AppNotFound)
    }
}
