//! CLI command implementations.

pub mod migrate;
pub mod seed;

use thiserror::Error;

/// Errors that can occur while running CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Resolve the database URL from the environment.
pub(crate) fn database_url() -> Result<String, CommandError> {
    dotenvy::dotenv().ok();

    std::env::var("DRIFTWOOD_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("DRIFTWOOD_DATABASE_URL"))
}
