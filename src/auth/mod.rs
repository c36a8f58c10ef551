use axum::Router;

use crate::state::AppState;

pub mod claims;
pub mod cookie;
mod dto;
pub mod extractors;
mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;

pub use dto::MessageResponse;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
