use async_trait::async_trait;
use connectors::{
    error::DbError,
    query::TableQuery,
    source::{PageSource, SourceConnector},
};
use model::{
    core::value::{FieldValue, Value},
    records::row::Record,
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

/// Counter handle shared with lifecycle probes.
#[derive(Clone, Default)]
pub(crate) struct Probe(Arc<AtomicUsize>);

impl Probe {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// In-memory connector recording connection lifecycle, so tests can assert
/// acquisition and release without a live database.
pub(crate) struct MemoryConnector {
    rows: Vec<Record>,
    fail_at_offset: Option<usize>,
    acquired: Probe,
    released: Probe,
}

impl MemoryConnector {
    pub fn new(rows: Vec<Record>) -> Self {
        MemoryConnector {
            rows,
            fail_at_offset: None,
            acquired: Probe::default(),
            released: Probe::default(),
        }
    }

    /// Rows with sequential `user_id` and the given `age` values.
    pub fn users(ages: &[i64]) -> Self {
        let rows = ages
            .iter()
            .enumerate()
            .map(|(idx, age)| {
                Record::new(vec![
                    FieldValue::new("user_id", Value::Uint(idx as u64 + 1)),
                    FieldValue::new("age", Value::Int(*age)),
                ])
            })
            .collect();
        Self::new(rows)
    }

    /// Makes every fetch starting at `offset` fail.
    pub fn failing_at_offset(mut self, offset: usize) -> Self {
        self.fail_at_offset = Some(offset);
        self
    }

    pub fn acquire_probe(&self) -> Probe {
        self.acquired.clone()
    }

    pub fn release_probe(&self) -> Probe {
        self.released.clone()
    }
}

#[async_trait]
impl SourceConnector for MemoryConnector {
    async fn acquire(&self) -> Result<Box<dyn PageSource>, DbError> {
        self.acquired.bump();
        Ok(Box::new(MemorySource {
            rows: self.rows.clone(),
            fail_at_offset: self.fail_at_offset,
            released: self.released.clone(),
        }))
    }
}

struct MemorySource {
    rows: Vec<Record>,
    fail_at_offset: Option<usize>,
    released: Probe,
}

impl Drop for MemorySource {
    fn drop(&mut self) {
        self.released.bump();
    }
}

#[async_trait]
impl PageSource for MemorySource {
    async fn fetch_page(
        &mut self,
        _query: &TableQuery,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Record>, DbError> {
        if self.fail_at_offset == Some(offset) {
            return Err(DbError::Io(std::io::Error::other(
                "simulated source failure",
            )));
        }

        Ok(self
            .rows
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}
