//! SQLite item store

use crate::config::SqliteConfig;
use crate::{primary_key, Item, ItemStore, StorageError};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Item store backed by one SQLite table of `(pk, item)` rows.
///
/// `pk` holds the canonical JSON text of the key attribute and `item` the
/// whole item as a JSON document.
pub struct SqliteStore {
    pool: SqlitePool,
    key_attribute: String,
    upsert_sql: String,
    select_sql: String,
    count_sql: String,
}

impl SqliteStore {
    /// Connect and create the table if it does not exist
    pub async fn connect(
        config: &SqliteConfig,
        table: &str,
        key_attribute: &str,
    ) -> Result<Self, StorageError> {
        validate_table_name(table)?;

        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new().max_connections(config.max_connections);
        if config.url.contains(":memory:") {
            // each connection to an in-memory URL opens a separate database
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }
        let pool = pool_options.connect_with(options).await?;

        let create_sql = format!(
            "CREATE TABLE IF NOT EXISTS \"{table}\" (pk TEXT PRIMARY KEY NOT NULL, item TEXT NOT NULL)"
        );
        sqlx::query(&create_sql).execute(&pool).await?;

        info!("Opened SQLite table {} at {}", table, config.url);

        Ok(Self {
            pool,
            key_attribute: key_attribute.to_string(),
            upsert_sql: format!(
                "INSERT INTO \"{table}\" (pk, item) VALUES (?1, ?2) \
                 ON CONFLICT(pk) DO UPDATE SET item = excluded.item"
            ),
            select_sql: format!("SELECT item FROM \"{table}\" WHERE pk = ?1"),
            count_sql: format!("SELECT COUNT(*) FROM \"{table}\""),
        })
    }

    /// Look up the item whose key attribute equals `key`
    pub async fn get(&self, key: &Value) -> Result<Option<Item>, StorageError> {
        let row: Option<(String,)> = sqlx::query_as(&self.select_sql)
            .bind(key.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|(payload,)| {
            serde_json::from_str(&payload)
                .map_err(|e| StorageError::SerializationError(e.to_string()))
        })
        .transpose()
    }

    /// Number of stored items
    pub async fn count(&self) -> Result<u64, StorageError> {
        let (count,): (i64,) = sqlx::query_as(&self.count_sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}

#[async_trait]
impl ItemStore for SqliteStore {
    async fn put_item(&self, item: Item) -> Result<(), StorageError> {
        let key = primary_key(&item, &self.key_attribute)?;
        let payload = serde_json::to_string(&item)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        sqlx::query(&self.upsert_sql)
            .bind(key.clone())
            .bind(payload)
            .execute(&self.pool)
            .await?;

        debug!("Stored item {}", key);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

/// Table names are interpolated into SQL, so only plain identifiers pass
fn validate_table_name(table: &str) -> Result<(), StorageError> {
    let valid = !table.is_empty()
        && table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidTable(table.to_string()))
    }
}
