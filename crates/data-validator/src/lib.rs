//! Data Validation
//!
//! Decodes GSR sensor payloads and checks the fields a record cannot be stored without.

mod error;
mod reading;
mod validator;

pub use error::ValidationError;
pub use reading::{SensorReading, Timestamp, ValidReading};
pub use validator::REQUIRED_FIELDS;
