//! Assignment management handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

/// Assignment routes
pub fn routes() -> Router<AppState> {
    Router::new()
        // Assignment CRUD
        .route("/", get(handler::list_assignments))
        .route("/", post(handler::create_assignment))
        .route("/{id}", get(handler::get_assignment))
        .route("/{id}", put(handler::update_assignment))
        .route("/{id}", delete(handler::delete_assignment))
        // Question composition and lifecycle
        .route("/{id}/questions", post(handler::add_questions))
        .route("/{id}/publish", post(handler::publish_assignment))
        // Consolidated submission view
        .route(
            "/{id}/submissions",
            get(crate::handlers::submissions::assignment_submissions),
        )
}
