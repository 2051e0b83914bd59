//! AWS DynamoDB item store

use crate::config::DynamoConfig;
use crate::{primary_key, Item, ItemStore, StorageError};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::{
    error::{DisplayErrorContext, SdkError},
    types::AttributeValue,
    Client,
};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};

/// Item store writing to a DynamoDB table with `PutItem`.
///
/// The table's partition key must be the configured key attribute.
pub struct DynamoStore {
    // Client wraps an Arc so should be low cost to clone
    client: Client,
    table: String,
    key_attribute: String,
}

impl DynamoStore {
    /// Build a client from the AWS environment, applying any overrides in `config`
    pub async fn connect(config: &DynamoConfig, table: &str, key_attribute: &str) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        info!(
            "DynamoDB table {} (region: {:?}, endpoint: {:?})",
            table,
            sdk_config.region(),
            config.endpoint_url
        );

        Self::with_client(Client::from_conf(builder.build()), table, key_attribute)
    }

    /// Use an existing client
    pub fn with_client(client: Client, table: &str, key_attribute: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
            key_attribute: key_attribute.to_string(),
        }
    }
}

#[async_trait]
impl ItemStore for DynamoStore {
    async fn put_item(&self, item: Item) -> Result<(), StorageError> {
        let key = primary_key(&item, &self.key_attribute)?;

        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(to_attributes(item)))
            .send()
            .await
            .map_err(rejected)?;

        debug!("Put item {} into {}", key, self.table);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "dynamodb"
    }
}

/// Service errors keep the service's own text; transport, credential and
/// timeout failures render their whole source chain
fn rejected<E, R>(err: SdkError<E, R>) -> StorageError
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    match err {
        SdkError::ServiceError(service) => StorageError::Rejected(service.into_err().to_string()),
        err => StorageError::Rejected(DisplayErrorContext(&err).to_string()),
    }
}

fn to_attributes(item: Item) -> HashMap<String, AttributeValue> {
    item.into_iter()
        .map(|(name, value)| (name, to_attribute(value)))
        .collect()
}

fn to_attribute(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(values) => AttributeValue::L(values.into_iter().map(to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(to_attributes(map)),
    }
}
