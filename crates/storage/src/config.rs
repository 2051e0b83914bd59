//! Store configuration

use serde::{Deserialize, Serialize};

/// Which backend holds the readings table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local map, lost on restart
    #[default]
    Memory,
    /// SQLite database via sqlx
    Sqlite,
    /// AWS DynamoDB table
    Dynamodb,
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Table name
    pub table: String,
    /// Attribute used as the primary key
    pub key_attribute: String,
    pub sqlite: SqliteConfig,
    pub dynamodb: DynamoConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            table: "GSR_Sensor_Data".to_string(),
            key_attribute: "timestamp".to_string(),
            sqlite: SqliteConfig::default(),
            dynamodb: DynamoConfig::default(),
        }
    }
}

/// SQLite backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Connection URL, e.g. `sqlite://gsr.db` or `sqlite::memory:`
    pub url: String,
    /// Pool size (forced to 1 for in-memory databases)
    pub max_connections: u32,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://gsr.db".to_string(),
            max_connections: 5,
        }
    }
}

/// DynamoDB backend settings.
///
/// Credentials always come from the standard AWS environment chain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamoConfig {
    /// Region override; the AWS default chain is used when unset
    pub region: Option<String>,
    /// Endpoint override, e.g. DynamoDB Local
    pub endpoint_url: Option<String>,
}
