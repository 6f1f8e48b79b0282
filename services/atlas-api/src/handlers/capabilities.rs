//! GetCapabilities handler.

use std::sync::Arc;

use axum::response::Response;

use atlas_protocol::CapabilitiesResponse;

use super::common;
use crate::state::AppState;

/// Answer a GetCapabilities request with the service descriptor.
pub async fn get_capabilities(state: Arc<AppState>) -> Response {
    state.metrics.record_capabilities_request();
    common::json_response(&CapabilitiesResponse::new(state.metadata.clone()))
}
