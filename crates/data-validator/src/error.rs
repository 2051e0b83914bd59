//! Validation Error Types

use thiserror::Error;

/// Errors during reading validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or both of the required fields is absent or null.
    ///
    /// The message is fixed regardless of which field is missing; `missing`
    /// carries the detail for callers that want it.
    #[error("Missing required fields: timestamp or gsr")]
    MissingRequiredFields { missing: Vec<&'static str> },
}

impl ValidationError {
    /// Names of the required fields that were absent
    pub fn missing_fields(&self) -> &[&'static str] {
        match self {
            ValidationError::MissingRequiredFields { missing } => missing,
        }
    }
}
