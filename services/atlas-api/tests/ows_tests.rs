//! End to end tests for the OWS endpoint.
//!
//! Each test builds the full router over a temporary project directory and
//! drives it with `oneshot` requests.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use bytes::Bytes;
use tower::ServiceExt as _; // for `oneshot`

use atlas_api::app::build_router;
use atlas_api::config::ServiceConfig;
use atlas_api::state::AppState;
use test_utils::requests::GetPrintQuery;

struct TestService {
    app: Router,
    export_dir: PathBuf,
    _projects: tempfile::TempDir,
    _exports: tempfile::TempDir,
}

impl TestService {
    /// One project (`demo`), default configuration.
    fn new() -> Self {
        Self::build(false, |_| {})
    }

    /// Both fixture projects loaded.
    fn with_two_projects() -> Self {
        Self::build(true, |_| {})
    }

    fn build(second_project: bool, configure: impl FnOnce(&mut ServiceConfig)) -> Self {
        let projects = tempfile::tempdir().unwrap();
        let exports = tempfile::tempdir().unwrap();
        test_utils::write_project_file(projects.path());
        if second_project {
            test_utils::write_second_project_file(projects.path());
        }

        let mut config = ServiceConfig {
            projects_dir: projects.path().to_path_buf(),
            export_dir: exports.path().to_path_buf(),
            ..ServiceConfig::default()
        };
        configure(&mut config);

        let engine = layout_engine::MemoryEngine::new();
        let state = Arc::new(AppState::new(&engine, config).unwrap());
        Self {
            app: build_router(state),
            export_dir: exports.path().to_path_buf(),
            _projects: projects,
            _exports: exports,
        }
    }

    async fn get(&self, uri: &str) -> Response {
        self.app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn print(&self, query: &GetPrintQuery) -> Response {
        self.get(&format!("/ows?{}", query.to_query_string())).await
    }

    fn export_dir_entries(&self) -> usize {
        std::fs::read_dir(&self.export_dir).unwrap().count()
    }
}

async fn body_bytes(response: Response) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn content_type(response: &Response) -> &str {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
}

// ============================================================================
// Dispatch
// ============================================================================

#[tokio::test]
async fn test_capabilities() {
    let service = TestService::new();
    let response = service.get("/ows?SERVICE=ATLAS&REQUEST=GetCapabilities").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "application/json");

    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["metadata"]["name"], "atlas-api");
    assert!(body["metadata"]["version"].is_string());
}

#[tokio::test]
async fn test_capabilities_legacy_alias_is_identical() {
    let service = TestService::new();
    let native = service.get("/ows?SERVICE=ATLAS&REQUEST=GetCapabilities").await;
    let legacy = service
        .get("/ows?SERVICE=WMS&REQUEST=GetCapabilitiesAtlas")
        .await;
    assert_eq!(legacy.status(), StatusCode::OK);
    assert_eq!(body_bytes(native).await, body_bytes(legacy).await);
}

#[tokio::test]
async fn test_request_is_case_insensitive() {
    let service = TestService::new();
    let response = service.get("/ows?service=atlas&request=GETCAPABILITIES").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_trailing_slash_route() {
    let service = TestService::new();
    let response = service.get("/ows/?SERVICE=ATLAS&REQUEST=GetCapabilities").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_request() {
    let service = TestService::new();
    let response = service.get("/ows?SERVICE=ATLAS&REQUEST=GetWeather").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["status"], "fail");
    assert_eq!(
        body["message"],
        "Invalid REQUEST parameter: must be one of GetCapabilities, GetPrint, found 'getweather'"
    );
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn test_unknown_request_legacy_service() {
    let service = TestService::new();
    let response = service.get("/ows?SERVICE=WMS&REQUEST=GetMap").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Invalid REQUEST parameter: must be one of GetCapabilitiesAtlas, GetPrintAtlas, found 'getmap'"
    );
}

#[tokio::test]
async fn test_unknown_service() {
    let service = TestService::new();
    let response = service.get("/ows?SERVICE=WFS&REQUEST=GetPrint").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Invalid SERVICE parameter: must be ATLAS, found 'wfs'"
    );
}

#[tokio::test]
async fn test_missing_service() {
    let service = TestService::new();
    let response = service.get("/ows?REQUEST=GetPrint").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Invalid SERVICE parameter: must be ATLAS, found ''"
    );
}

// ============================================================================
// GetPrint success paths
// ============================================================================

#[tokio::test]
async fn test_print_pdf() {
    let service = TestService::new();
    let mut query = GetPrintQuery::new("layout1-atlas");
    query.exp_filter = Some("id=1".to_string());

    let response = service.print(&query).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "application/pdf");

    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(service.export_dir_entries(), 0);
}

#[tokio::test]
async fn test_print_png() {
    let service = TestService::new();
    let mut query = GetPrintQuery::new("layout1-atlas");
    query.exp_filter = Some("id=1".to_string());
    query.format = Some("png".to_string());

    let response = service.print(&query).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "image/png");
    assert!(body_bytes(response).await.starts_with(b"\x89PNG\r\n\x1a\n"));
}

#[tokio::test]
async fn test_print_jpeg() {
    let service = TestService::new();
    let mut query = GetPrintQuery::new("layout1-atlas");
    query.exp_filter = Some("id=1".to_string());
    query.format = Some("jpeg".to_string());

    let response = service.print(&query).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "image/jpeg");
    assert!(body_bytes(response).await.starts_with(b"\xFF\xD8\xFF"));
}

#[tokio::test]
async fn test_unknown_format_defaults_to_pdf() {
    let service = TestService::new();
    let mut query = GetPrintQuery::new("layout1-atlas");
    query.exp_filter = Some("id=1".to_string());
    query.format = Some("docx".to_string());

    let response = service.print(&query).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "application/pdf");
}

#[tokio::test]
async fn test_print_legacy_alias() {
    let service = TestService::new();
    let mut query = GetPrintQuery::new("layout1-atlas");
    query.service = "WMS".to_string();
    query.request = "GetPrintAtlas".to_string();
    query.exp_filter = Some("id=1".to_string());

    let response = service.print(&query).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "application/pdf");
}

#[tokio::test]
async fn test_print_with_scales_and_substitutions() {
    let service = TestService::new();
    let mut query = GetPrintQuery::new("layout1-atlas");
    query.exp_filter = Some("id in (1, 2)".to_string());
    query.scales = Some("20000,10000".to_string());
    query.extras.push(("TITLE".to_string(), "My map".to_string()));

    let response = service.print(&query).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_report_prints_without_filter() {
    let service = TestService::new();
    let query = GetPrintQuery::new("layout2-report");

    let response = service.print(&query).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "application/pdf");
}

#[tokio::test]
async fn test_dollar_id_filter_prints() {
    let service = TestService::new();
    let mut query = GetPrintQuery::new("layout1-atlas");
    query.exp_filter = Some("$id in (1, 2)".to_string());

    let response = service.print(&query).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// GetPrint user errors
// ============================================================================

#[tokio::test]
async fn test_missing_template() {
    let service = TestService::new();
    let response = service.get("/ows?SERVICE=ATLAS&REQUEST=GetPrint").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["status"], "fail");
    assert_eq!(
        body["message"],
        "ATLAS - Error from the user while generating the PDF: TEMPLATE is required"
    );
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn test_missing_filter() {
    let service = TestService::new();
    let query = GetPrintQuery::new("layout1-atlas");

    let response = service.print(&query).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "ATLAS - Error from the user while generating the PDF: \
         EXP_FILTER is mandatory to print an atlas layout"
    );
}

#[tokio::test]
async fn test_scale_conflict() {
    let service = TestService::new();
    let mut query = GetPrintQuery::new("layout1-atlas");
    query.exp_filter = Some("id=1".to_string());
    query.scale = Some("5000".to_string());
    query.scales = Some("10000,5000".to_string());

    let response = service.print(&query).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "ATLAS - Error from the user while generating the PDF: \
         SCALE and SCALES can not be used together."
    );
}

#[tokio::test]
async fn test_invalid_scale() {
    let service = TestService::new();
    let mut query = GetPrintQuery::new("layout1-atlas");
    query.exp_filter = Some("id=1".to_string());
    query.scale = Some("5000n".to_string());

    let response = service.print(&query).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "ATLAS - Error from the user while generating the PDF: Invalid number in SCALE."
    );
}

#[tokio::test]
async fn test_unknown_layout() {
    let service = TestService::new();
    let mut query = GetPrintQuery::new("nope");
    query.exp_filter = Some("id=1".to_string());

    let response = service.print(&query).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "ATLAS - Error from the user while generating the PDF: Layout `nope` not found"
    );
}

#[tokio::test]
async fn test_layout_without_atlas() {
    let service = TestService::new();
    let mut query = GetPrintQuery::new("layout3-simple");
    query.exp_filter = Some("id=1".to_string());

    let response = service.print(&query).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "ATLAS - Error from the user while generating the PDF: \
         Layout `layout3-simple` is neither an atlas layout nor a report"
    );
}

#[tokio::test]
async fn test_invalid_expression() {
    let service = TestService::new();
    let mut query = GetPrintQuery::new("layout1-atlas");
    query.exp_filter = Some("id in (1, 2".to_string());

    let response = service.print(&query).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "ATLAS - Error from the user while generating the PDF: \
         Expression is invalid: syntax error, unexpected end of input, expecting ',' or ')'"
    );
}

#[tokio::test]
async fn test_unknown_column() {
    let service = TestService::new();
    let mut query = GetPrintQuery::new("layout1-atlas");
    query.exp_filter = Some("fakeId in (1, 2)".to_string());

    let response = service.print(&query).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "ATLAS - Error from the user while generating the PDF: \
         Expression is invalid, eval error: Column 'fakeId' not found"
    );
}

// ============================================================================
// Project resolution
// ============================================================================

#[tokio::test]
async fn test_unknown_map() {
    let service = TestService::new();
    let mut query = GetPrintQuery::new("layout1-atlas");
    query.map = Some("nope".to_string());
    query.exp_filter = Some("id=1".to_string());

    let response = service.print(&query).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "ATLAS - Error from the user while generating the PDF: Project `nope` not found"
    );
}

#[tokio::test]
async fn test_two_projects_require_map() {
    let service = TestService::with_two_projects();
    let mut query = GetPrintQuery::new("layout1-atlas");
    query.exp_filter = Some("id=1".to_string());

    let response = service.print(&query).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "ATLAS - Error from the user while generating the PDF: MAP is required"
    );
}

#[tokio::test]
async fn test_explicit_map_with_pk_rewrite() {
    let service = TestService::with_two_projects();
    let mut query = GetPrintQuery::new("overview-atlas");
    query.map = Some("regions".to_string());
    query.exp_filter = Some("$id=3".to_string());

    let response = service.print(&query).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "application/pdf");
}

#[tokio::test]
async fn test_default_project_serves_mapless_requests() {
    let service = TestService::build(true, |config| {
        config.default_project = Some("demo".to_string());
    });
    let mut query = GetPrintQuery::new("layout1-atlas");
    query.exp_filter = Some("id=1".to_string());

    let response = service.print(&query).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Engine failures
// ============================================================================

#[tokio::test]
async fn test_engine_failure_is_masked() {
    let service = TestService::new();
    let mut query = GetPrintQuery::new("layout4-broken");
    query.exp_filter = Some("id=1".to_string());

    let response = service.print(&query).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Internal 'atlas' service error");
    assert!(body["request_id"].is_string());
    assert_eq!(service.export_dir_entries(), 0);
}

#[tokio::test]
async fn test_missing_artifact_is_404() {
    let service = TestService::new();
    let mut query = GetPrintQuery::new("layout5-vanishing");
    query.exp_filter = Some("id=1".to_string());

    let response = service.print(&query).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["status"], "fail");
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Export artifact not found: layout5vanishing_"));
    assert!(message.ends_with(".pdf"));
}

// ============================================================================
// Monitoring endpoints
// ============================================================================

#[tokio::test]
async fn test_health() {
    let service = TestService::new();
    let response = service.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(&body_bytes(response).await[..], b"OK");
}

#[tokio::test]
async fn test_metrics_exposition() {
    let service = TestService::new();

    let mut query = GetPrintQuery::new("layout1-atlas");
    query.exp_filter = Some("id=1".to_string());
    assert_eq!(service.print(&query).await.status(), StatusCode::OK);

    let response = service.get("/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("text/plain"));

    let text = String::from_utf8(body_bytes(response).await.to_vec()).unwrap();
    assert!(text.contains("atlas_requests_total 1"));
    assert!(text.contains("atlas_prints_total 1"));
    assert!(text.contains("atlas_print_errors_total 0"));
    assert!(text.contains("atlas_export_time_avg_ms"));
    assert!(text.contains("atlas_projects_loaded 1"));
}
