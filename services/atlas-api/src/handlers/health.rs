//! Health check and metrics endpoints.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::Extension;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::instrument;

use crate::state::AppState;

/// GET /health - Basic health check
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /metrics - Prometheus metrics endpoint
#[instrument(skip(state))]
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let timing = state.metrics.export_timing();

    let mut output = String::new();

    // Request counts
    output.push_str(&format!(
        "# HELP atlas_requests_total Total OWS requests\n# TYPE atlas_requests_total counter\natlas_requests_total {}\n",
        state.metrics.requests.load(Ordering::Relaxed)
    ));
    output.push_str(&format!(
        "# HELP atlas_capabilities_requests_total Total GetCapabilities requests\n# TYPE atlas_capabilities_requests_total counter\natlas_capabilities_requests_total {}\n",
        state.metrics.capabilities_requests.load(Ordering::Relaxed)
    ));
    output.push_str(&format!(
        "# HELP atlas_prints_total Total GetPrint requests\n# TYPE atlas_prints_total counter\natlas_prints_total {}\n",
        state.metrics.print_requests.load(Ordering::Relaxed)
    ));
    output.push_str(&format!(
        "# HELP atlas_print_errors_total GetPrint requests that failed in the engine\n# TYPE atlas_print_errors_total counter\natlas_print_errors_total {}\n",
        state.metrics.print_errors.load(Ordering::Relaxed)
    ));

    // Engine export timing
    output.push_str(&format!(
        "# HELP atlas_exports_completed Engine exports measured\n# TYPE atlas_exports_completed counter\natlas_exports_completed {}\n",
        timing.count
    ));
    output.push_str(&format!(
        "# HELP atlas_export_time_avg_ms Average engine export time\n# TYPE atlas_export_time_avg_ms gauge\natlas_export_time_avg_ms {:.3}\n",
        timing.avg_ms
    ));
    output.push_str(&format!(
        "# HELP atlas_export_time_max_ms Slowest engine export\n# TYPE atlas_export_time_max_ms gauge\natlas_export_time_max_ms {:.3}\n",
        timing.max_ms
    ));
    output.push_str(&format!(
        "# HELP atlas_export_time_last_ms Most recent engine export\n# TYPE atlas_export_time_last_ms gauge\natlas_export_time_last_ms {:.3}\n",
        timing.last_ms
    ));

    // Loaded project count
    output.push_str(&format!(
        "# HELP atlas_projects_loaded Projects available to print from\n# TYPE atlas_projects_loaded gauge\natlas_projects_loaded {}\n",
        state.projects.len()
    ));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; version=0.0.4")
        .body(output.into())
        .unwrap()
}
