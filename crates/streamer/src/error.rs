use connectors::error::DbError;
use thiserror::Error;

/// Failure raised by a caller-supplied predicate or extract callback.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct EvalError(pub String);

/// All errors a stream can surface. Any of these terminates the stream and
/// releases the held connection; none are retried internally.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Rejected before any connection is opened.
    #[error("invalid batch size: {0} (must be at least 1)")]
    InvalidBatchSize(usize),

    /// Connection or query failure. The stream is not resumable; a fresh
    /// call must be started.
    #[error("source unavailable: {0}")]
    Source(#[from] DbError),

    /// A filter or extract callback failed on a record.
    #[error("predicate failed: {0}")]
    Predicate(#[from] EvalError),
}
