//! Lazy, batched streaming over tabular sources.
//!
//! [`PagedStreamer`] pulls rows from a source in bounded, ordered pages and
//! exposes them as batch, record, and filtered-record streams, plus a
//! terminal running-aggregate fold. One source connection is held per stream
//! and released on exhaustion, error, or early abandonment.

pub mod aggregate;
pub mod error;
pub mod retry;
pub mod streamer;

#[cfg(test)]
pub(crate) mod support;

pub use aggregate::AggregateOutcome;
pub use connectors::query::TableQuery;
pub use error::{EvalError, StreamError};
pub use streamer::PagedStreamer;
