//! Reading Routes

use axum::{body::Bytes, extract::State};
use std::sync::Arc;

use crate::handler::IngestResponse;
use crate::AppState;

/// Store one sensor reading.
///
/// The body is taken raw so that decode failures reach the handler instead
/// of being rejected by an extractor.
pub async fn post_reading(State(state): State<Arc<AppState>>, body: Bytes) -> IngestResponse {
    state.ingest.handle(&body).await
}
