//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod assignments;
pub mod health;
pub mod questions;
pub mod submissions;

use axum::{middleware, Router};

use crate::{middleware::auth::auth_middleware, state::AppState};

/// Create all API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(
            Router::new()
                .nest("/assignments", assignments::routes())
                .nest("/questions", questions::routes())
                .nest("/submissions", submissions::routes())
                .route_layer(middleware::from_fn(auth_middleware)),
        )
}
