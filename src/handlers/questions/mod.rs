//! Question management handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{delete, get, put},
    Router,
};

use crate::state::AppState;

/// Question routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(handler::get_question))
        .route("/{id}", put(handler::update_question))
        .route("/{id}", delete(handler::delete_question))
}
