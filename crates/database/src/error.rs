use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    /// The raw observations for a symbol could not be located, read or parsed.
    /// Fatal for the request that triggered it.
    #[error("Observation source for '{symbol}' is unavailable: {reason}")]
    SourceUnavailable { symbol: String, reason: String },

    #[error("Failed to load environment variables for database connection: {0}")]
    ConnectionConfigError(String),

    #[error("Failed to connect to the database: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}

impl DbError {
    pub fn source_unavailable(symbol: &str, reason: impl ToString) -> Self {
        DbError::SourceUnavailable {
            symbol: symbol.to_string(),
            reason: reason.to_string(),
        }
    }
}
