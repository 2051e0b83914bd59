//! Required Field Validation

use crate::error::ValidationError;
use crate::reading::{SensorReading, ValidReading};

/// Fields a reading cannot be stored without
pub const REQUIRED_FIELDS: [&str; 2] = ["timestamp", "gsr"];

impl SensorReading {
    /// Check required fields and promote to a [`ValidReading`].
    ///
    /// Only presence is checked. Values are neither type- nor range-checked and falsy
    /// numbers such as `gsr = 0` are accepted.
    pub fn validate(self) -> Result<ValidReading, ValidationError> {
        match (self.timestamp, self.gsr) {
            (Some(timestamp), Some(gsr)) => Ok(ValidReading {
                timestamp,
                gsr,
                temp_dht: self.temp_dht,
                hum_dht: self.hum_dht,
                temp_ds18b20: self.temp_ds18b20,
            }),
            (timestamp, gsr) => {
                let missing = [timestamp.is_none(), gsr.is_none()]
                    .into_iter()
                    .zip(REQUIRED_FIELDS)
                    .filter_map(|(absent, field)| absent.then_some(field))
                    .collect();
                Err(ValidationError::MissingRequiredFields { missing })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Timestamp;
    use proptest::prelude::*;
    use serde_json::{json, Number};

    fn decode(body: serde_json::Value) -> SensorReading {
        SensorReading::from_json(body.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn test_both_required_present() {
        let valid = decode(json!({"timestamp": 100, "gsr": 512})).validate().unwrap();
        assert_eq!(valid.timestamp, Timestamp::Number(Number::from(100)));
        assert_eq!(valid.gsr, json!(512));
    }

    #[test]
    fn test_zero_gsr_is_present() {
        assert!(decode(json!({"timestamp": 0, "gsr": 0})).validate().is_ok());
    }

    #[test]
    fn test_non_numeric_gsr_is_present() {
        let valid = decode(json!({"timestamp": 1, "gsr": "n/a", "hum_dht": false}))
            .validate()
            .unwrap();
        assert_eq!(valid.gsr, json!("n/a"));
        assert_eq!(valid.hum_dht, Some(json!(false)));
    }

    #[test]
    fn test_missing_timestamp() {
        let err = decode(json!({"gsr": 512})).validate().unwrap_err();
        assert_eq!(err.missing_fields(), &["timestamp"]);
        assert_eq!(err.to_string(), "Missing required fields: timestamp or gsr");
    }

    #[test]
    fn test_missing_both() {
        let err = decode(json!({"temp_dht": 21.5})).validate().unwrap_err();
        assert_eq!(err.missing_fields(), &["timestamp", "gsr"]);
    }

    #[test]
    fn test_optional_fields_carried() {
        let valid = decode(json!({"timestamp": 100, "gsr": 300, "temp_dht": 21.5}))
            .validate()
            .unwrap();
        assert_eq!(valid.temp_dht, Some(json!(21.5)));
        assert_eq!(valid.hum_dht, None);
    }

    proptest! {
        #[test]
        fn prop_valid_iff_required_present(
            timestamp in proptest::option::of(any::<i64>()),
            gsr in proptest::option::of(0u32..4096),
            temp in proptest::option::of(-40i32..125),
        ) {
            let mut body = serde_json::Map::new();
            if let Some(t) = timestamp {
                body.insert("timestamp".into(), json!(t));
            }
            if let Some(g) = gsr {
                body.insert("gsr".into(), json!(g));
            }
            if let Some(t) = temp {
                body.insert("temp_ds18b20".into(), json!(t));
            }

            let result = decode(serde_json::Value::Object(body)).validate();
            prop_assert_eq!(result.is_ok(), timestamp.is_some() && gsr.is_some());

            if let Ok(valid) = result {
                let item = valid.into_attributes();
                prop_assert_eq!(item.len(), 5);
                prop_assert_eq!(&item["temp_ds18b20"], &temp.map_or(json!(null), |t| json!(t)));
            }
        }
    }
}
