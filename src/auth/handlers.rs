use std::future::Future;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, instrument, warn};

use crate::{
    auth::{
        dto::{IsAdminResponse, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
        error::AuthError,
    },
    state::AppState,
};

type ApiError = (StatusCode, String);

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/admin/:user_id", get(is_admin))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn bad_request(msg: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, msg.into())
}

/// Maps service outcomes to HTTP. Operational faults are logged here and
/// leave the process as a bare "internal error".
fn api_error(err: AuthError) -> ApiError {
    match err {
        AuthError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            "invalid email or password".into(),
        ),
        AuthError::InvalidAppId => bad_request("invalid app id"),
        AuthError::UserExists => (StatusCode::CONFLICT, "user already exists".into()),
        AuthError::UserNotFound => (StatusCode::NOT_FOUND, "user not found".into()),
        AuthError::Hashing(_) | AuthError::Signing(_) | AuthError::Storage(_) => {
            error!(error = %err, "internal error");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
        }
    }
}

/// Runs a service call under the configured request deadline. A timed out
/// call is dropped, which cancels any storage query still in flight.
async fn with_deadline<T, F>(state: &AppState, call: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, AuthError>>,
{
    match tokio::time::timeout(state.config.request_timeout, call).await {
        Ok(res) => res.map_err(api_error),
        Err(_) => {
            warn!(timeout = ?state.config.request_timeout, "request deadline exceeded");
            Err((StatusCode::GATEWAY_TIMEOUT, "deadline exceeded".into()))
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    payload.email = payload.email.trim().to_string();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(bad_request("email is required"));
    }
    if payload.password.is_empty() {
        warn!("empty password");
        return Err(bad_request("password is required"));
    }

    let user_id = with_deadline(
        &state,
        state.auth.register(&payload.email, &payload.password),
    )
    .await?;

    Ok(Json(RegisterResponse { user_id }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    payload.email = payload.email.trim().to_string();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(bad_request("email is required"));
    }
    if payload.password.is_empty() {
        warn!("empty password");
        return Err(bad_request("password is required"));
    }
    if payload.app_id <= 0 {
        warn!(app_id = payload.app_id, "invalid app id");
        return Err(bad_request("app_id is required"));
    }

    let token = with_deadline(
        &state,
        state
            .auth
            .login(&payload.email, &payload.password, payload.app_id),
    )
    .await?;

    Ok(Json(LoginResponse { token }))
}

#[instrument(skip(state))]
pub async fn is_admin(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<IsAdminResponse>, ApiError> {
    if user_id <= 0 {
        warn!(user_id, "invalid user id");
        return Err(bad_request("user_id is required"));
    }

    let is_admin = with_deadline(&state, state.auth.is_admin(user_id)).await?;

    Ok(Json(IsAdminResponse { is_admin }))
}
