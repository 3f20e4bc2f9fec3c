//! CLI subcommands.

pub mod migrate;
pub mod seed;
pub mod sitemap;

use secrecy::SecretString;
use vitrine_data::{PgDocumentStore, create_pool};

/// Errors shared by every command that talks to the database.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read `DATABASE_URL` (after loading `.env`).
///
/// # Errors
///
/// Returns `MissingEnvVar` if the variable is unset.
pub fn database_url() -> Result<SecretString, ConnectError> {
    dotenvy::dotenv().ok();
    std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| ConnectError::MissingEnvVar("DATABASE_URL"))
}

/// Connect to the configured database and wrap it as a document store.
///
/// # Errors
///
/// Returns an error if the URL is missing or the connection fails.
pub async fn connect_store() -> Result<PgDocumentStore, ConnectError> {
    let url = database_url()?;
    tracing::info!("Connecting to database...");
    let pool = create_pool(&url).await?;
    Ok(PgDocumentStore::new(pool))
}
