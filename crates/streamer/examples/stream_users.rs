//! Streams a small seeded table in batches, then filters and aggregates it.
//!
//! Run with `cargo run -p streamer --example stream_users`.

use connectors::{query::TableQuery, sql::sqlite::SqliteConnector};
use futures_util::TryStreamExt;
use streamer::{AggregateOutcome, PagedStreamer};
use tracing::{Level, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    let connector = SqliteConnector::in_memory().await?;
    connector
        .execute(
            "CREATE TABLE user_data (
                user_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                age INTEGER NOT NULL
            )",
        )
        .await?;
    connector
        .execute(
            "INSERT INTO user_data VALUES
                (1, 'Dan', 20), (2, 'Glenda', 26), (3, 'Daniel', 31),
                (4, 'Ronnie', 44), (5, 'Alma', 58)",
        )
        .await?;

    let streamer = PagedStreamer::new(connector, TableQuery::new("user_data", "user_id"));

    let mut batches = streamer.stream_batches(2).await?;
    while let Some(batch) = batches.try_next().await? {
        info!(offset = batch.offset, rows = batch.len(), "batch");
        for record in &batch.rows {
            println!("{}", record.to_json());
        }
    }
    drop(batches);

    let over_25: Vec<_> = streamer
        .stream_filtered(2, |record| {
            Ok(record.get_value("age").as_i64().unwrap_or(0) > 25)
        })
        .await?
        .try_collect()
        .await?;
    info!(count = over_25.len(), "users over 25");

    match streamer.average(2, "age").await? {
        AggregateOutcome::Value(avg) => info!("average age: {avg:.2}"),
        AggregateOutcome::Empty => info!("no users found"),
    }

    Ok(())
}
