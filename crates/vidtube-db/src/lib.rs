//! # Vidtube DB
//!
//! Postgres connection pool and the embedded schema migrations.
//!
//! # Example
//!
//! ```ignore
//! use vidtube_db::{init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&config.database_url).await?;
//! run_migrations(&pool).await?;
//! ```

use std::time::Duration;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;

pub use sqlx::PgPool;

/// Migrations in the workspace `migrations/` directory, embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

const MAX_CONNECTIONS: u32 = 10;

/// Connects a PostgreSQL pool.
///
/// The pool is cheap to clone and is shared through the application state.
///
/// # Errors
///
/// Returns the driver error if the first connection cannot be established.
pub async fn init_db_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    tracing::info!(max_connections = MAX_CONNECTIONS, "Database pool ready");
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
