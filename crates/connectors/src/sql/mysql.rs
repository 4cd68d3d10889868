use crate::{
    error::{ConnectorError, DbError},
    query::{Dialect, TableQuery},
    source::{PageSource, SourceConnector},
};
use async_trait::async_trait;
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use model::{
    core::value::{FieldValue, Value},
    records::row::Record,
};
use sqlx::{Column, MySql, Row, TypeInfo, ValueRef, mysql::MySqlRow, pool::PoolConnection};
use tracing::{debug, warn};

/// MySQL connector backed by a sqlx pool. Each stream checks one connection
/// out of the pool and keeps it until the stream is dropped.
#[derive(Clone)]
pub struct MySqlConnector {
    pool: sqlx::MySqlPool,
}

impl MySqlConnector {
    pub async fn connect(url: &str) -> Result<Self, ConnectorError> {
        let pool = sqlx::MySqlPool::connect(url).await?;
        Ok(MySqlConnector { pool })
    }

    /// Runs a statement outside of any stream, e.g. for seeding test data.
    pub async fn execute(&self, sql: &str) -> Result<(), DbError> {
        sqlx::query(sql).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl SourceConnector for MySqlConnector {
    async fn acquire(&self) -> Result<Box<dyn PageSource>, DbError> {
        let conn = self.pool.acquire().await?;
        Ok(Box::new(MySqlPageSource { conn }))
    }
}

struct MySqlPageSource {
    conn: PoolConnection<MySql>,
}

#[async_trait]
impl PageSource for MySqlPageSource {
    async fn fetch_page(
        &mut self,
        query: &TableQuery,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Record>, DbError> {
        let sql = query.to_sql(Dialect::MySql);
        debug!(%sql, limit, offset, "executing bounded range query");

        let rows = sqlx::query(&sql)
            .bind(limit as u64)
            .bind(offset as u64)
            .fetch_all(&mut *self.conn)
            .await?;

        rows.iter().map(decode_row).collect()
    }
}

fn decode_row(row: &MySqlRow) -> Result<Record, DbError> {
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

fn decode_cell(row: &MySqlRow, idx: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    let value = match type_name {
        "BOOLEAN" => Value::Boolean(row.try_get(idx)?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            Value::Int(row.try_get::<i64, _>(idx)?)
        }
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => Value::Uint(row.try_get::<u64, _>(idx)?),
        "FLOAT" => Value::Float(row.try_get::<f32, _>(idx)? as f64),
        "DOUBLE" => Value::Float(row.try_get::<f64, _>(idx)?),
        "DECIMAL" => row
            .try_get::<BigDecimal, _>(idx)?
            .to_f64()
            .map(Value::Float)
            .unwrap_or(Value::Null),
        "CHAR" | "VARCHAR" | "TEXT" | "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET"
        | "JSON" => Value::String(row.try_get::<String, _>(idx)?),
        "DATE" => Value::String(row.try_get::<NaiveDate, _>(idx)?.to_string()),
        "TIME" => Value::String(row.try_get::<NaiveTime, _>(idx)?.to_string()),
        "DATETIME" => Value::String(row.try_get::<NaiveDateTime, _>(idx)?.to_string()),
        "TIMESTAMP" => Value::String(row.try_get::<DateTime<Utc>, _>(idx)?.to_rfc3339()),
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            Value::Bytes(row.try_get::<Vec<u8>, _>(idx)?)
        }
        other => {
            // Unknown type: degrade through the common decodings before
            // giving up on the cell.
            if let Ok(v) = row.try_get::<String, _>(idx) {
                Value::String(v)
            } else if let Ok(v) = row.try_get::<i64, _>(idx) {
                Value::Int(v)
            } else if let Ok(v) = row.try_get::<u64, _>(idx) {
                Value::Uint(v)
            } else if let Ok(v) = row.try_get::<Vec<u8>, _>(idx) {
                Value::Bytes(v)
            } else {
                warn!("unsupported MySQL column type '{other}', treating as NULL");
                Value::Null
            }
        }
    };

    Ok(value)
}
