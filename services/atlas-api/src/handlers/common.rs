//! Shared response helpers used by the OWS handlers.

use axum::http::{header, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use serde::Serialize;
use uuid::Uuid;

use atlas_common::error::AtlasError;

/// Prefix put on user facing print errors.
pub const USER_ERROR_PREFIX: &str = "ATLAS - Error from the user while generating the PDF: ";

/// Message returned for any internal failure. The real error stays in the log.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal 'atlas' service error";

/// 200 response with a JSON body.
pub fn json_response<T: Serialize>(body: &T) -> Response {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(json.into())
        .unwrap()
}

/// Error response with the fixed `status: fail` JSON shape.
///
/// Every error payload carries the request id so a client report can be
/// matched against the server log.
pub fn json_error(status: StatusCode, message: &str, request_id: Uuid) -> Response {
    let body = serde_json::json!({
        "status": "fail",
        "message": message,
        "request_id": request_id.to_string(),
    });
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.to_string().into())
        .unwrap()
}

/// Map a print pipeline error onto the wire taxonomy.
///
/// User errors surface their message behind [`USER_ERROR_PREFIX`]. A missing
/// artifact keeps its message. Everything else is masked with
/// [`INTERNAL_ERROR_MESSAGE`].
pub fn atlas_error_response(err: &AtlasError, request_id: Uuid) -> Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = if err.is_user_error() {
        format!("{}{}", USER_ERROR_PREFIX, err)
    } else if status == StatusCode::NOT_FOUND {
        err.to_string()
    } else {
        INTERNAL_ERROR_MESSAGE.to_string()
    };
    json_error(status, &message, request_id)
}

/// 200 response carrying a rendered artifact.
pub fn artifact_response(content_type: &str, bytes: Bytes) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, bytes.len())
        .body(bytes.into())
        .unwrap()
}

// ============================================================================
// Tests
// ============================================================================
