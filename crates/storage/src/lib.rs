//! Storage Layer
//!
//! Key-value item stores keyed by a single primary key attribute. Every
//! backend implements [`ItemStore`], whose only write is an upsert: putting
//! an item whose key already exists replaces the stored item.

mod config;
#[cfg(feature = "dynamodb")]
mod dynamo;
mod memory;
mod sqlite;

pub use config::{DynamoConfig, SqliteConfig, StoreBackend, StoreConfig};
#[cfg(feature = "dynamodb")]
pub use dynamo::DynamoStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// A stored record: attribute names mapped to values
pub type Item = Map<String, Value>;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Item is missing key attribute '{0}'")]
    MissingKey(String),
    #[error("Invalid table name: {0:?}")]
    InvalidTable(String),
    #[error("Storage backend not available in this build: {0}")]
    BackendUnavailable(&'static str),
    /// The store refused the write; carries the store's own error text.
    #[error("{0}")]
    Rejected(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::DatabaseError(err.to_string())
    }
}

/// A key-value table supporting upsert by primary key.
///
/// Implementations are shared between concurrently running requests.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Insert `item`, replacing any stored item with the same key
    async fn put_item(&self, item: Item) -> Result<(), StorageError>;

    /// Short backend name, e.g. `"sqlite"`
    fn backend(&self) -> &'static str;
}

/// Canonical key of `item`: the JSON text of its key attribute.
///
/// `100` and `"100"` therefore address different records.
pub(crate) fn primary_key(item: &Item, key_attribute: &str) -> Result<String, StorageError> {
    match item.get(key_attribute) {
        None | Some(Value::Null) => Err(StorageError::MissingKey(key_attribute.to_string())),
        Some(value) => Ok(value.to_string()),
    }
}

/// Open the backend selected by `config`
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn ItemStore>, StorageError> {
    info!(
        "Opening {:?} store for table {} (key: {})",
        config.backend, config.table, config.key_attribute
    );

    let store: Arc<dyn ItemStore> = match config.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new(&config.key_attribute)),
        StoreBackend::Sqlite => Arc::new(
            SqliteStore::connect(&config.sqlite, &config.table, &config.key_attribute).await?,
        ),
        #[cfg(feature = "dynamodb")]
        StoreBackend::Dynamodb => Arc::new(
            DynamoStore::connect(&config.dynamodb, &config.table, &config.key_attribute).await,
        ),
        #[cfg(not(feature = "dynamodb"))]
        StoreBackend::Dynamodb => return Err(StorageError::BackendUnavailable("dynamodb")),
    };

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: Value) -> Item {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_primary_key_is_json_text() {
        let numeric = item(json!({"timestamp": 100}));
        let text = item(json!({"timestamp": "100"}));
        assert_eq!(primary_key(&numeric, "timestamp").unwrap(), "100");
        assert_eq!(primary_key(&text, "timestamp").unwrap(), "\"100\"");
    }

    #[test]
    fn test_primary_key_missing_or_null() {
        let missing = item(json!({"gsr": 1}));
        let null = item(json!({"timestamp": null}));
        assert!(matches!(
            primary_key(&missing, "timestamp"),
            Err(StorageError::MissingKey(_))
        ));
        assert!(matches!(
            primary_key(&null, "timestamp"),
            Err(StorageError::MissingKey(_))
        ));
    }

    #[tokio::test]
    async fn test_open_memory_store() {
        let store = open_store(&StoreConfig::default()).await.unwrap();
        assert_eq!(store.backend(), "memory");
        store
            .put_item(item(json!({"timestamp": 1, "gsr": 2})))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_open_sqlite_rejects_bad_table() {
        let config = StoreConfig {
            backend: StoreBackend::Sqlite,
            table: "readings; DROP TABLE x".to_string(),
            sqlite: SqliteConfig {
                url: "sqlite::memory:".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            open_store(&config).await,
            Err(StorageError::InvalidTable(_))
        ));
    }

    #[test]
    fn test_rejected_displays_store_text() {
        let err = StorageError::Rejected("ProvisionedThroughputExceeded".to_string());
        assert_eq!(err.to_string(), "ProvisionedThroughputExceeded");
    }
}
