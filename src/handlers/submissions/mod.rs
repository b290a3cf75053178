//! Submission view handlers
//!
//! Submissions themselves live in the grading service; these routes
//! expose consolidated read views and the feedback pass-through. The
//! per-assignment view is mounted under the assignment routes.

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Submission view routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/overview", get(handler::overview))
        .route("/feedback", post(handler::post_feedback))
}
