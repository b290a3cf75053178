//! Database module
//!
//! This module handles database connections, migrations, and the entity
//! repository abstraction behind which all persistence happens.

pub mod connection;
pub mod postgres;
pub mod repository;

#[cfg(test)]
pub mod memory;

use sqlx::PgPool;

pub use connection::*;
pub use postgres::PgRepository;
pub use repository::EntityRepository;

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
