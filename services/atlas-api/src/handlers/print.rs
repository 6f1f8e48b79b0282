//! GetPrint handler.
//!
//! Orchestrates a print request end to end: resolve the project, validate
//! the parameters, hand an export job to the layout engine on a blocking
//! thread, then read the artifact back and delete it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::response::Response;
use bytes::Bytes;
use tracing::{error, info, warn};
use uuid::Uuid;

use atlas_common::error::{AtlasError, AtlasResult};
use atlas_protocol::{resolve_print, validate_print_params, RequestParams, ResolvedPrint};
use layout_engine::export::ExportJob;
use layout_engine::{scales, OutputFormat, Project};

use super::common;
use crate::metrics::Timer;
use crate::sanitize::sanitize_layout_name;
use crate::state::AppState;

/// Answer a GetPrint request with the rendered artifact or an error payload.
pub async fn get_print(state: Arc<AppState>, params: &RequestParams, request_id: Uuid) -> Response {
    state.metrics.record_print_request();

    match print_layout(&state, params).await {
        Ok((format, bytes)) => {
            info!(
                request_id = %request_id,
                format = format.extension(),
                size = bytes.len(),
                "Print complete"
            );
            common::artifact_response(format.content_type(), bytes)
        }
        Err(err) if err.is_user_error() => {
            warn!(request_id = %request_id, error = %err, "Print request rejected");
            common::atlas_error_response(&err, request_id)
        }
        Err(err) => {
            error!(request_id = %request_id, error = %err, "Print request failed");
            state.metrics.record_print_error();
            common::atlas_error_response(&err, request_id)
        }
    }
}

async fn print_layout(
    state: &Arc<AppState>,
    params: &RequestParams,
) -> AtlasResult<(OutputFormat, Bytes)> {
    let project = state.projects.resolve(params.get_nonempty("MAP"))?;
    let print_params = validate_print_params(params)?;
    let resolved = resolve_print(project.as_ref(), print_params, state.config.pk_policy)?;

    let format = resolved.params.format;
    let file_name = format!(
        "{}_{}.{}",
        sanitize_layout_name(&resolved.layout.name),
        Uuid::new_v4(),
        format.extension()
    );
    let output_path = state.config.export_dir.join(&file_name);
    let job = build_job(project.as_ref(), &resolved, output_path.clone());

    info!(
        layout = %resolved.layout.name,
        format = format.extension(),
        filter = resolved.filter.as_deref().unwrap_or(""),
        "Starting export"
    );

    // Engine exports are synchronous and can take seconds. Keep them off
    // the async worker threads.
    let timer = Timer::start();
    let task_project = Arc::clone(project);
    let status = tokio::task::spawn_blocking(move || task_project.export(&job))
        .await
        .map_err(|e| AtlasError::Internal(format!("Export task panicked: {}", e)))?
        .map_err(|e| AtlasError::Internal(e.to_string()))?;
    state.metrics.record_export_duration(timer.elapsed_us());

    if !status.is_success() {
        // A failed export may still have written a partial file.
        let _ = std::fs::remove_file(&output_path);
        return Err(AtlasError::ExportFailed(status.description().to_string()));
    }

    read_artifact(&output_path, &file_name).map(|bytes| (format, bytes))
}

fn build_job(project: &dyn Project, resolved: &ResolvedPrint, output_path: PathBuf) -> ExportJob {
    let mut job = ExportJob::new(
        resolved.layout.name.clone(),
        resolved.params.format,
        output_path,
    );
    job.filter = resolved.filter.clone();
    job.text_substitutions = resolved.params.substitutions.clone();

    // Reports have no map to scale.
    if !resolved.layout.is_report() {
        job.fixed_scale = resolved.params.fixed_scale;
        job.predefined_scales = predefined_scales(project, resolved);
    }
    job
}

/// SCALES from the request wins outright. Without it, layouts that rely on
/// predefined scaling fall back to the project's list, then to the built-in
/// defaults.
fn predefined_scales(project: &dyn Project, resolved: &ResolvedPrint) -> Option<Vec<f64>> {
    if let Some(requested) = &resolved.params.scales {
        return Some(requested.iter().map(|s| *s as f64).collect());
    }
    if resolved.layout.uses_predefined_scales {
        let list = project
            .predefined_scales()
            .map(<[f64]>::to_vec)
            .unwrap_or_else(scales::default_scales);
        return Some(list);
    }
    None
}

/// Read the artifact and delete it. Deletion happens whether or not the
/// read worked; nothing may accumulate in the export directory.
fn read_artifact(path: &Path, file_name: &str) -> AtlasResult<Bytes> {
    let result = std::fs::read(path);
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "Failed to remove export artifact");
        }
    }
    match result {
        Ok(data) => Ok(Bytes::from(data)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(AtlasError::ArtifactMissing(file_name.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

// ============================================================================
// Tests
// ============================================================================
