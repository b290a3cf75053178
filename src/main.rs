//! TaskGrade - Application Entry Point
//!
//! This is the main entry point for the TaskGrade server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskgrade::{
    clients::{directory::HttpUserDirectory, grading::HttpGradingClient},
    config::CONFIG,
    constants::API_BASE_PATH,
    db,
    handlers,
    middleware::logging_middleware,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting TaskGrade server...");

    // Initialize database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::connection::create_pool(&CONFIG.database).await?;
    db::connection::test_connection(&db_pool).await?;

    // Run database migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&db_pool).await?;

    // Initialize upstream clients
    let grading = HttpGradingClient::new(&CONFIG.grading)?;
    let directory = HttpUserDirectory::new(&CONFIG.directory)?;

    // Create application state
    let state = AppState::new(
        Arc::new(db::postgres::PgRepository::new(db_pool)),
        Arc::new(grading),
        Arc::new(directory),
        CONFIG.clone(),
    );

    // Build the router
    let app = Router::new()
        .nest(API_BASE_PATH, handlers::routes())
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start the server
    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
