//! Database layer for voyage.
//!
//! - [`entities`]: sea-orm models for accounts, listings, bookings and trips
//! - [`migrations`]: the `MySQL` schema
//! - [`repositories`]: queries used by the core services
//! - [`test_utils`]: throwaway databases for the live integration tests

pub mod entities;
pub mod migrations;
pub mod repositories;
pub mod test_utils;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::log::LevelFilter;
use voyage_common::{AppError, AppResult, config::DatabaseConfig};

use migrations::Migrator;

/// Applies to both opening and checking out connections.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Open the connection pool.
///
/// SQL statements are logged at debug level.
pub async fn init(config: &DatabaseConfig) -> AppResult<DatabaseConnection> {
    let mut options = ConnectOptions::new(&config.url);
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(CONNECT_TIMEOUT)
        .acquire_timeout(CONNECT_TIMEOUT)
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    let db = Database::connect(options)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database pool ready"
    );
    Ok(db)
}

/// Apply pending migrations.
pub async fn migrate(db: &DatabaseConnection) -> AppResult<()> {
    let pending = Migrator::get_pending_migrations(db)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if pending.is_empty() {
        tracing::debug!("Schema is up to date");
        return Ok(());
    }

    tracing::info!(count = pending.len(), "Applying migrations");
    Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}
