//! GSR Sensor Reading Model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Primary key of a stored reading.
///
/// Sensors send either an epoch number or a formatted string; both are kept
/// exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Number(Number),
    Text(String),
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Number(n) => write!(f, "{}", n),
            Timestamp::Text(s) => f.write_str(s),
        }
    }
}

impl From<Timestamp> for Value {
    fn from(timestamp: Timestamp) -> Self {
        match timestamp {
            Timestamp::Number(n) => Value::Number(n),
            Timestamp::Text(s) => Value::String(s),
        }
    }
}

/// A decoded request body.
///
/// Every field is optional at this stage: a missing key and an explicit
/// `null` both decode to `None`. Unknown keys are ignored. Readings are
/// carried as raw JSON values without any type or range checking.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SensorReading {
    /// Record key
    pub timestamp: Option<Timestamp>,
    /// Galvanic skin response
    pub gsr: Option<Value>,
    /// DHT temperature (°C)
    pub temp_dht: Option<Value>,
    /// DHT relative humidity (%)
    pub hum_dht: Option<Value>,
    /// DS18B20 temperature (°C)
    pub temp_ds18b20: Option<Value>,
}

impl SensorReading {
    /// Decode a JSON request body.
    ///
    /// Fails only when the body is not a JSON object or the timestamp is
    /// neither a number nor a string.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        let object: Map<String, Value> = serde_json::from_slice(body)?;
        serde_json::from_value(Value::Object(object))
    }
}

/// A reading that carries both required fields
#[derive(Debug, Clone, PartialEq)]
pub struct ValidReading {
    pub timestamp: Timestamp,
    pub gsr: Value,
    pub temp_dht: Option<Value>,
    pub hum_dht: Option<Value>,
    pub temp_ds18b20: Option<Value>,
}

impl ValidReading {
    /// Convert into the attribute map handed to a store.
    ///
    /// All five attributes are always present; absent optional readings
    /// become `null`.
    pub fn into_attributes(self) -> Map<String, Value> {
        let mut item = Map::with_capacity(5);
        item.insert("timestamp".to_string(), self.timestamp.into());
        item.insert("gsr".to_string(), self.gsr);
        item.insert("temp_dht".to_string(), self.temp_dht.unwrap_or(Value::Null));
        item.insert("hum_dht".to_string(), self.hum_dht.unwrap_or(Value::Null));
        item.insert(
            "temp_ds18b20".to_string(),
            self.temp_ds18b20.unwrap_or(Value::Null),
        );
        item
    }
}
