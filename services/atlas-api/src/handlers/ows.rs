//! OWS entry point.
//!
//! Dispatches on the SERVICE and REQUEST query parameters. The native
//! service name is ATLAS; the GetPrintAtlas and GetCapabilitiesAtlas
//! request names from the legacy WMS entry point still route here.

use std::sync::Arc;

use axum::extract::{Extension, Query};
use axum::http::StatusCode;
use axum::response::Response;
use tracing::instrument;
use uuid::Uuid;

use atlas_protocol::RequestParams;

use super::{capabilities, common, print};
use crate::state::AppState;

/// GET /ows - SERVICE/REQUEST dispatch.
#[instrument(skip(state, pairs))]
pub async fn ows_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let request_id = Uuid::new_v4();
    let params = RequestParams::from_pairs(pairs);
    state.metrics.record_request();

    let service = params
        .get_nonempty("SERVICE")
        .map(|s| s.to_uppercase())
        .unwrap_or_default();
    let request = params.get("REQUEST").unwrap_or("").to_lowercase();

    match service.as_str() {
        "ATLAS" => match request.as_str() {
            "getcapabilities" => capabilities::get_capabilities(state).await,
            "getprint" => print::get_print(state, &params, request_id).await,
            _ => common::json_error(
                StatusCode::BAD_REQUEST,
                &format!(
                    "Invalid REQUEST parameter: must be one of GetCapabilities, GetPrint, found '{}'",
                    request
                ),
                request_id,
            ),
        },
        "WMS" => match request.as_str() {
            "getcapabilitiesatlas" => capabilities::get_capabilities(state).await,
            "getprintatlas" => print::get_print(state, &params, request_id).await,
            _ => common::json_error(
                StatusCode::BAD_REQUEST,
                &format!(
                    "Invalid REQUEST parameter: must be one of GetCapabilitiesAtlas, GetPrintAtlas, found '{}'",
                    request
                ),
                request_id,
            ),
        },
        other => common::json_error(
            StatusCode::BAD_REQUEST,
            &format!(
                "Invalid SERVICE parameter: must be ATLAS, found '{}'",
                other.to_lowercase()
            ),
            request_id,
        ),
    }
}
