use crate::error::{EvalError, StreamError};
use connectors::{
    query::TableQuery,
    source::{PageSource, SourceConnector},
};
use futures_util::{StreamExt, TryStreamExt, future, stream, stream::BoxStream};
use model::{
    pagination::cursor::Cursor,
    records::{batch::Batch, row::Record},
};
use tracing::debug;

pub type BatchStream = BoxStream<'static, Result<Batch, StreamError>>;
pub type RecordStream = BoxStream<'static, Result<Record, StreamError>>;

/// Streams one table slice in bounded pages.
///
/// Each call to one of the `stream_*` methods acquires its own connection
/// and cursor; separate streams share no mutable state and may run as
/// concurrent tasks. Ordering is guaranteed only within a single stream.
pub struct PagedStreamer<C> {
    connector: C,
    query: TableQuery,
}

/// Per-stream state moved into the unfold loop. Dropping it (stream
/// exhausted, failed, or abandoned) releases the connection.
struct FetchState {
    source: Box<dyn PageSource>,
    query: TableQuery,
    cursor: Cursor,
    batch_size: usize,
}

impl<C: SourceConnector> PagedStreamer<C> {
    pub fn new(connector: C, query: TableQuery) -> Self {
        PagedStreamer { connector, query }
    }

    pub fn query(&self) -> &TableQuery {
        &self.query
    }

    /// Lazy sequence of non-empty batches in ascending offset order.
    ///
    /// One bounded query per pull, no pre-fetch. The first empty fetch
    /// terminates the sequence.
    pub async fn stream_batches(&self, batch_size: usize) -> Result<BatchStream, StreamError> {
        if batch_size == 0 {
            return Err(StreamError::InvalidBatchSize(batch_size));
        }

        let source = self.connector.acquire().await?;
        debug!(table = %self.query.table(), batch_size, "starting batch stream");

        let state = FetchState {
            source,
            query: self.query.clone(),
            cursor: Cursor::start(),
            batch_size,
        };

        let batches = stream::try_unfold(state, |mut state| async move {
            let rows = state
                .source
                .fetch_page(&state.query, state.batch_size, state.cursor.offset())
                .await
                .map_err(StreamError::from)?;

            if rows.is_empty() {
                debug!(offset = state.cursor.offset(), "source exhausted");
                return Ok(None);
            }

            let batch = Batch::new(rows, state.cursor.offset());
            state.cursor.advance(state.batch_size);
            Ok(Some((batch, state)))
        });

        Ok(batches.boxed())
    }

    /// Flattening of [`stream_batches`](Self::stream_batches): records in the
    /// same order, pulling one upstream batch only when the previous one is
    /// exhausted.
    pub async fn stream_records(&self, batch_size: usize) -> Result<RecordStream, StreamError> {
        let batches = self.stream_batches(batch_size).await?;
        let records = batches
            .map_ok(|batch| stream::iter(batch.rows.into_iter().map(Ok::<_, StreamError>)))
            .try_flatten();
        Ok(records.boxed())
    }

    /// Record stream keeping exactly the records for which `predicate`
    /// holds, order preserved. A predicate failure terminates the stream.
    pub async fn stream_filtered<P>(
        &self,
        batch_size: usize,
        predicate: P,
    ) -> Result<RecordStream, StreamError>
    where
        P: Fn(&Record) -> Result<bool, EvalError> + Send + 'static,
    {
        let records = self.stream_records(batch_size).await?;
        let filtered = records.try_filter_map(move |record| {
            let decision = predicate(&record)
                .map(|keep| keep.then_some(record))
                .map_err(StreamError::from);
            future::ready(decision)
        });
        Ok(filtered.boxed())
    }
}
