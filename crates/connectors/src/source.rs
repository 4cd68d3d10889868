use crate::{error::DbError, query::TableQuery};
use async_trait::async_trait;
use model::records::row::Record;

/// A live connection able to execute bounded range queries.
///
/// Implementors own the underlying connection; dropping the source releases
/// it. Each `fetch_page` call issues exactly one query.
#[async_trait]
pub trait PageSource: Send {
    async fn fetch_page(
        &mut self,
        query: &TableQuery,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Record>, DbError>;
}

/// Hands out one connection per stream lifetime.
#[async_trait]
pub trait SourceConnector: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn PageSource>, DbError>;
}
