use thiserror::Error;

/// All errors coming from the database/query layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// Low-level I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any SQL driver error, including pool checkout failures.
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    /// A fetched cell could not be decoded into a scalar value.
    #[error("decode error for column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl DbError {
    /// Whether the failure is worth retrying from a surrounding resilience
    /// layer. The streaming core itself never retries.
    pub fn is_transient(&self) -> bool {
        match self {
            DbError::Io(_) => true,
            DbError::Sql(err) => matches!(
                err,
                sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::WorkerCrashed
            ),
            DbError::Decode { .. } => false,
        }
    }
}

/// Errors happening during connector setup.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// SQLx failed to build the connection pool.
    #[error("connection pool creation failed: {0}")]
    Pool(#[from] sqlx::Error),
}
