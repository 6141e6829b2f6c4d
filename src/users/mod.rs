mod dto;
pub mod handlers;
mod repo;
pub mod validation;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
