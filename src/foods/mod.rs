mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod scoring;
pub mod usda;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::routes())
}
