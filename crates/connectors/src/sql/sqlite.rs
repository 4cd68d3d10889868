use crate::{
    error::{ConnectorError, DbError},
    query::{Dialect, TableQuery},
    source::{PageSource, SourceConnector},
};
use async_trait::async_trait;
use model::{
    core::value::{FieldValue, Value},
    records::row::Record,
};
use sqlx::{
    Column, Row, Sqlite, TypeInfo, ValueRef, pool::PoolConnection, sqlite::SqlitePoolOptions,
    sqlite::SqliteRow,
};
use tracing::{debug, warn};

/// SQLite connector backed by a sqlx pool.
#[derive(Clone)]
pub struct SqliteConnector {
    pool: sqlx::SqlitePool,
}

impl SqliteConnector {
    pub async fn connect(url: &str) -> Result<Self, ConnectorError> {
        let pool = sqlx::SqlitePool::connect(url).await?;
        Ok(SqliteConnector { pool })
    }

    /// In-memory database on a single pooled connection. With more than one
    /// connection each would see its own empty database.
    pub async fn in_memory() -> Result<Self, ConnectorError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Ok(SqliteConnector { pool })
    }

    /// Runs a statement outside of any stream, e.g. for seeding test data.
    pub async fn execute(&self, sql: &str) -> Result<(), DbError> {
        sqlx::query(sql).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl SourceConnector for SqliteConnector {
    async fn acquire(&self) -> Result<Box<dyn PageSource>, DbError> {
        let conn = self.pool.acquire().await?;
        Ok(Box::new(SqlitePageSource { conn }))
    }
}

struct SqlitePageSource {
    conn: PoolConnection<Sqlite>,
}

#[async_trait]
impl PageSource for SqlitePageSource {
    async fn fetch_page(
        &mut self,
        query: &TableQuery,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Record>, DbError> {
        let sql = query.to_sql(Dialect::Sqlite);
        debug!(%sql, limit, offset, "executing bounded range query");

        let rows = sqlx::query(&sql)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&mut *self.conn)
            .await?;

        rows.iter().map(decode_row).collect()
    }
}

fn decode_row(row: &SqliteRow) -> Result<Record, DbError> {
    let mut fields = Vec::with_capacity(row.columns().len());

    for (idx, column) in row.columns().iter().enumerate() {
        let raw = row.try_get_raw(idx)?;
        let type_name = raw.type_info().name().to_string();
        let is_null = raw.is_null();

        let value = if is_null {
            Value::Null
        } else {
            decode_cell(row, idx, &type_name).map_err(|err| DbError::Decode {
                column: column.name().to_string(),
                message: err.to_string(),
            })?
        };

        fields.push(FieldValue::new(column.name(), value));
    }

    Ok(Record::new(fields))
}

fn decode_cell(row: &SqliteRow, idx: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    let value = match type_name {
        "INTEGER" => Value::Int(row.try_get::<i64, _>(idx)?),
        "REAL" | "NUMERIC" => Value::Float(row.try_get::<f64, _>(idx)?),
        "TEXT" => Value::String(row.try_get::<String, _>(idx)?),
        "BOOLEAN" => Value::Boolean(row.try_get(idx)?),
        "BLOB" => Value::Bytes(row.try_get::<Vec<u8>, _>(idx)?),
        other => {
            // SQLite columns are dynamically typed; degrade through the
            // storage classes before giving up on the cell.
            if let Ok(v) = row.try_get::<String, _>(idx) {
                Value::String(v)
            } else if let Ok(v) = row.try_get::<i64, _>(idx) {
                Value::Int(v)
            } else if let Ok(v) = row.try_get::<f64, _>(idx) {
                Value::Float(v)
            } else if let Ok(v) = row.try_get::<Vec<u8>, _>(idx) {
                Value::Bytes(v)
            } else {
                warn!("unsupported SQLite column type '{other}', treating as NULL");
                Value::Null
            }
        }
    };

    Ok(value)
}
