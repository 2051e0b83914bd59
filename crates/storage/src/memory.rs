//! In-memory item store

use crate::{primary_key, Item, ItemStore, StorageError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info};

/// Item store backed by a process-local map
pub struct MemoryStore {
    /// Items by canonical key
    items: Mutex<HashMap<String, Item>>,
    /// Attribute used as the primary key
    key_attribute: String,
}

impl MemoryStore {
    /// Create an empty store keyed by `key_attribute`
    pub fn new(key_attribute: &str) -> Self {
        info!("Creating in-memory item store");
        Self {
            items: Mutex::new(HashMap::new()),
            key_attribute: key_attribute.to_string(),
        }
    }

    /// Look up the item whose key attribute equals `key`
    pub fn get(&self, key: &Value) -> Option<Item> {
        self.items
            .lock()
            .ok()
            .and_then(|items| items.get(&key.to_string()).cloned())
    }

    /// Number of stored items
    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all items (for testing)
    pub fn clear(&self) {
        if let Ok(mut items) = self.items.lock() {
            items.clear();
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("timestamp")
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn put_item(&self, item: Item) -> Result<(), StorageError> {
        let key = primary_key(&item, &self.key_attribute)?;

        let mut items = self
            .items
            .lock()
            .map_err(|e| StorageError::DatabaseError(format!("Lock error: {}", e)))?;

        if items.insert(key.clone(), item).is_some() {
            debug!("Replaced item {}", key);
        } else {
            debug!("Inserted item {}", key);
        }
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reading(timestamp: Value, gsr: i64) -> Item {
        let mut item = Item::new();
        item.insert("timestamp".to_string(), timestamp);
        item.insert("gsr".to_string(), json!(gsr));
        item
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = MemoryStore::default();

        store.put_item(reading(json!(100), 512)).await.unwrap();

        let stored = store.get(&json!(100)).unwrap();
        assert_eq!(stored["gsr"], json!(512));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_same_key_overwrites() {
        let store = MemoryStore::default();

        store.put_item(reading(json!(100), 512)).await.unwrap();
        store.put_item(reading(json!(100), 300)).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&json!(100)).unwrap()["gsr"], json!(300));
    }

    #[tokio::test]
    async fn test_numeric_and_text_keys_differ() {
        let store = MemoryStore::default();

        store.put_item(reading(json!(100), 1)).await.unwrap();
        store.put_item(reading(json!("100"), 2)).await.unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&json!("100")).unwrap()["gsr"], json!(2));
    }

    #[tokio::test]
    async fn test_missing_key_rejected() {
        let store = MemoryStore::default();
        let mut item = Item::new();
        item.insert("gsr".to_string(), json!(1));

        assert!(matches!(
            store.put_item(item).await,
            Err(StorageError::MissingKey(_))
        ));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_clear() {
        let store = MemoryStore::default();
        store.put_item(reading(json!(1), 1)).await.unwrap();
        store.clear();
        assert!(store.is_empty());
    }
}
