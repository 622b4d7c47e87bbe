//! Database connection and migration runner.
//!
//! SYSTEM CONTEXT
//! ==============
//! Startup uses this module to create the shared SQLx pool. Schema changes
//! live in `migrations/` and are applied either by the `migrate` subcommand
//! or by `serve` when `AUTO_MIGRATE` is on; request handlers never alter the
//! schema.

use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;

/// Embedded schema migrations, applied in version order and recorded in
/// `_sqlx_migrations` so each runs exactly once per database.
pub static MIGRATOR: Migrator = sqlx::migrate!("src/db/migrations");

/// Open the `PostgreSQL` connection pool.
///
/// # Errors
///
/// Returns an error if the database cannot be reached.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns an error if a migration fails or the recorded history diverges
/// from the embedded set.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}
