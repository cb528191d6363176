use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

pub mod models;
pub mod scoped;

use crate::config;

/// Connect to the database using the configured pool settings.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let db_config = &config::config().database;

    let pool = PgPoolOptions::new()
        .max_connections(db_config.max_connections)
        .acquire_timeout(Duration::from_secs(db_config.acquire_timeout_secs))
        .connect(database_url)
        .await?;

    info!("Database pool established");
    Ok(pool)
}

/// Build a pool without establishing a connection up front. Used by
/// tests that exercise the router without a live database.
pub fn connect_lazy(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(1))
        .connect_lazy(database_url)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
