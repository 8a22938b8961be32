use thiserror::Error;

use crate::storage::StorageError;

/// Outcomes of the auth operations.
///
/// `InvalidCredentials` covers both an unknown email and a wrong password and
/// must stay a single variant.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid app id")]
    InvalidAppId,

    #[error("user already exists")]
    UserExists,

    #[error("user not found")]
    UserNotFound,

    #[error("hashing error: {0}")]
    Hashing(String),

    #[error("signing error: {0}")]
    Signing(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
