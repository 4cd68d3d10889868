use crate::{
    error::{EvalError, StreamError},
    streamer::PagedStreamer,
};
use connectors::source::SourceConnector;
use futures_util::TryStreamExt;
use model::records::row::Record;

/// Result of a terminal fold. A stream that produced zero records is a
/// defined outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AggregateOutcome<A> {
    Empty,
    Value(A),
}

impl<A> AggregateOutcome<A> {
    pub fn value(self) -> Option<A> {
        match self {
            AggregateOutcome::Empty => None,
            AggregateOutcome::Value(v) => Some(v),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, AggregateOutcome::Empty)
    }
}

impl<C: SourceConnector> PagedStreamer<C> {
    /// Consumes the record stream, extracting one numeric value per record
    /// and folding with `combine` from `zero`. Holds no more than the
    /// current batch in memory.
    pub async fn compute_running_aggregate<A, X, F>(
        &self,
        batch_size: usize,
        extract: X,
        combine: F,
        zero: A,
    ) -> Result<AggregateOutcome<A>, StreamError>
    where
        X: Fn(&Record) -> Result<f64, EvalError>,
        F: Fn(A, f64) -> A,
    {
        let mut records = self.stream_records(batch_size).await?;
        let mut acc = zero;
        let mut seen = false;

        while let Some(record) = records.try_next().await? {
            let value = extract(&record)?;
            acc = combine(acc, value);
            seen = true;
        }

        Ok(if seen {
            AggregateOutcome::Value(acc)
        } else {
            AggregateOutcome::Empty
        })
    }

    pub async fn sum(
        &self,
        batch_size: usize,
        column: &str,
    ) -> Result<AggregateOutcome<f64>, StreamError> {
        self.compute_running_aggregate(
            batch_size,
            |record| numeric_field(record, column),
            |acc, v| acc + v,
            0.0,
        )
        .await
    }

    pub async fn average(
        &self,
        batch_size: usize,
        column: &str,
    ) -> Result<AggregateOutcome<f64>, StreamError> {
        let folded = self
            .compute_running_aggregate(
                batch_size,
                |record| numeric_field(record, column),
                |(total, count): (f64, u64), v| (total + v, count + 1),
                (0.0, 0),
            )
            .await?;

        Ok(match folded {
            AggregateOutcome::Empty => AggregateOutcome::Empty,
            AggregateOutcome::Value((total, count)) => AggregateOutcome::Value(total / count as f64),
        })
    }
}

fn numeric_field(record: &Record, column: &str) -> Result<f64, EvalError> {
    let value = record.get_value(column);
    value
        .as_f64()
        .ok_or_else(|| EvalError(format!("field '{column}' is not numeric: {value}")))
}
