use crate::state::AppState;
use axum::Router;

mod claims;
mod dto;
pub mod error;
pub mod handlers;
mod jwt;
pub mod password;
pub mod services;

pub use services::AuthService;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
