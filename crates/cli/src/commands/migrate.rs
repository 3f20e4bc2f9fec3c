//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! vitrine-cli migrate
//! ```
//!
//! Applies the document schema from `crates/data/migrations/`, then creates
//! the `tower_sessions` schema used by the admin session store. Both steps
//! are idempotent.

use tower_sessions_sqlx_store::PostgresStore;
use vitrine_data::create_pool;

use super::{ConnectError, database_url};

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all migrations against `DATABASE_URL`.
///
/// # Errors
///
/// Returns an error if the connection or any migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&url).await?;

    tracing::info!("Running document migrations...");
    sqlx::migrate!("../data/migrations").run(&pool).await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
