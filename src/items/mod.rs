pub mod dto;
pub mod handlers;
pub mod repo;

use crate::state::AppState;
use axum::Router;

pub use repo::{Item, ItemRepo, PgItemRepo};

pub fn router() -> Router<AppState> {
    handlers::item_routes()
}
