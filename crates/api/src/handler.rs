//! Reading Ingest Handler
//!
//! Decode → validate → persist → respond. The handler keeps no state between
//! requests apart from the shared store handle.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use data_validator::{SensorReading, ValidationError};
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::{ItemStore, StorageError};
use thiserror::Error;
use tracing::{debug, error};

/// Message returned after a successful write
pub const STORED_MESSAGE: &str = "Data successfully stored!";

/// Why a reading was not stored
#[derive(Debug, Error)]
pub enum IngestError {
    /// A required field is absent
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Body is absent or not a JSON object of readings
    #[error("{0}")]
    MalformedRequest(#[from] serde_json::Error),
    /// The store failed the write
    #[error("{0}")]
    Storage(#[from] StorageError),
}

impl IngestError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            IngestError::Validation(_) => StatusCode::BAD_REQUEST,
            IngestError::MalformedRequest(_) | IngestError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// JSON body of every ingest response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// Outcome of one ingest request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestResponse {
    pub status: StatusCode,
    pub message: String,
}

impl IngestResponse {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<IngestError> for IngestResponse {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Validation(err) => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            err => {
                error!("Error processing request: {}", err);
                Self::new(err.status(), format!("Error storing data: {}", err))
            }
        }
    }
}

impl IntoResponse for IngestResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(MessageBody {
                message: self.message,
            }),
        )
            .into_response()
    }
}

/// Stores one sensor reading per request
#[derive(Clone)]
pub struct IngestHandler {
    store: Arc<dyn ItemStore>,
}

impl IngestHandler {
    /// Create a handler writing to `store`
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    /// Backend name of the underlying store
    pub fn store_backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Handle one request body. Never fails; every error maps to a response.
    pub async fn handle(&self, body: &[u8]) -> IngestResponse {
        let response = match self.ingest(body).await {
            Ok(()) => IngestResponse::new(StatusCode::OK, STORED_MESSAGE),
            Err(err) => IngestResponse::from(err),
        };

        counter!(
            "gsr_ingest_requests_total",
            "status" => response.status.as_u16().to_string()
        )
        .increment(1);

        response
    }

    async fn ingest(&self, body: &[u8]) -> Result<(), IngestError> {
        let reading = SensorReading::from_json(body)?.validate()?;

        debug!("Storing reading {} (gsr: {})", reading.timestamp, reading.gsr);
        self.store.put_item(reading.into_attributes()).await?;

        Ok(())
    }
}
