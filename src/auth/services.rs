use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::auth::{error::AuthError, jwt, password::PasswordHasher};
use crate::storage::{AppRegistry, StorageError, UserStore};

/// Login, registration and admin lookup over the storage ports.
///
/// Holds no per-call state: one instance is shared by every request.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    apps: Arc<dyn AppRegistry>,
    hasher: PasswordHasher,
    token_ttl: Duration,
    // Verified against on unknown emails so both login failures cost one hash.
    dummy_hash: Vec<u8>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        apps: Arc<dyn AppRegistry>,
        hasher: PasswordHasher,
        token_ttl: Duration,
    ) -> Result<Self, AuthError> {
        let dummy_hash = hasher
            .hash("sso-dummy-password")
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(Self {
            users,
            apps,
            hasher,
            token_ttl,
            dummy_hash,
        })
    }

    /// Checks credentials and returns a token scoped to `app_id`.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        app_id: i32,
    ) -> Result<String, AuthError> {
        const OP: &str = "auth.login";
        info!(op = OP, email, app_id, "login attempt");

        let app = match self.apps.app(app_id).await {
            Ok(app) => app,
            Err(StorageError::AppNotFound) => {
                warn!(op = OP, app_id, "app not found");
                return Err(AuthError::InvalidAppId);
            }
            Err(e) => {
                error!(op = OP, error = %e, "failed to get app");
                return Err(e.into());
            }
        };

        let user = match self.users.user_by_email(email).await {
            Ok(user) => user,
            Err(StorageError::UserNotFound) => {
                self.verify(password, self.dummy_hash.clone()).await?;
                warn!(op = OP, email, "login unknown email");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                error!(op = OP, error = %e, "failed to get user");
                return Err(e.into());
            }
        };

        if !self.verify(password, user.pass_hash.clone()).await? {
            warn!(op = OP, email, user_id = user.id, "login invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = jwt::new_token(&user, &app, self.token_ttl).map_err(|e| {
            error!(op = OP, error = %e, user_id = user.id, app_id, "failed to sign token");
            e
        })?;

        info!(op = OP, user_id = user.id, app_id, "user logged in");
        Ok(token)
    }

    /// Creates a user and returns its id. Uniqueness of `email` is left to
    /// the store.
    pub async fn register(&self, email: &str, password: &str) -> Result<i64, AuthError> {
        const OP: &str = "auth.register";
        info!(op = OP, email, "registering user");

        let hasher = self.hasher.clone();
        let plain = password.to_owned();
        let pass_hash = tokio::task::spawn_blocking(move || hasher.hash(&plain))
            .await
            .map_err(|e| e.to_string())
            .and_then(|res| res.map_err(|e| e.to_string()))
            .map_err(|e| {
                error!(op = OP, error = %e, "failed to hash password");
                AuthError::Hashing(e)
            })?;

        let user_id = match self.users.save_user(email, &pass_hash).await {
            Ok(id) => id,
            Err(StorageError::UserExists) => {
                warn!(op = OP, email, "user already exists");
                return Err(AuthError::UserExists);
            }
            Err(e) => {
                error!(op = OP, error = %e, "failed to save user");
                return Err(e.into());
            }
        };

        info!(op = OP, user_id, "user registered");
        Ok(user_id)
    }

    /// Admin flag exactly as the store reports it now.
    pub async fn is_admin(&self, user_id: i64) -> Result<bool, AuthError> {
        const OP: &str = "auth.is_admin";
        info!(op = OP, user_id, "checking if user is admin");

        match self.users.is_admin(user_id).await {
            Ok(is_admin) => {
                info!(op = OP, user_id, is_admin, "checked if user is admin");
                Ok(is_admin)
            }
            Err(StorageError::UserNotFound) => {
                warn!(op = OP, user_id, "user not found");
                Err(AuthError::UserNotFound)
            }
            Err(e) => {
                error!(op = OP, error = %e, "failed to check admin flag");
                Err(e.into())
            }
        }
    }

    async fn verify(&self, password: &str, hash: Vec<u8>) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        let plain = password.to_owned();
        tokio::task::spawn_blocking(move || hasher.verify(&plain, &hash))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }
}
