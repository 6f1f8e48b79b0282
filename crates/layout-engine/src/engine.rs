//! Engine-facing traits and layout metadata.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use atlas_common::schema::LayerSchema;

use crate::export::{ExportJob, ExportStatus};

/// Errors raised by the engine outside of the export result codes.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid project definition: {0}")]
    ProjectInvalid(String),

    #[error("Unknown layout: {0}")]
    LayoutUnknown(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Kind of a master layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    Print,
    Report,
}

/// Atlas configuration of a print layout.
#[derive(Debug, Clone)]
pub struct AtlasInfo {
    pub enabled: bool,
    /// Name of the vector layer the atlas iterates over.
    pub coverage_layer: String,
}

/// Metadata of a layout as exposed by the engine.
#[derive(Debug, Clone)]
pub struct LayoutInfo {
    pub name: String,
    pub kind: LayoutKind,
    pub atlas: Option<AtlasInfo>,
    /// Whether the reference map is configured for predefined scaling.
    pub uses_predefined_scales: bool,
}

impl LayoutInfo {
    /// A print layout whose atlas is enabled.
    pub fn is_atlas(&self) -> bool {
        self.kind == LayoutKind::Print && self.atlas.as_ref().map(|a| a.enabled).unwrap_or(false)
    }

    pub fn is_report(&self) -> bool {
        self.kind == LayoutKind::Report
    }
}

/// A loaded map project.
pub trait Project: Send + Sync {
    fn name(&self) -> &str;

    /// Look up a layout by its exact name.
    fn layout(&self, name: &str) -> Option<LayoutInfo>;

    /// Schema of a vector layer, by layer name.
    fn layer_schema(&self, layer: &str) -> Option<&LayerSchema>;

    /// Scale denominators configured at the project level, if any.
    fn predefined_scales(&self) -> Option<&[f64]>;

    /// Run an export of one layout to `job.output_path`.
    ///
    /// The call blocks until the document is produced and cannot be
    /// cancelled once started. A non-[`ExportStatus::Success`] code is a
    /// completed call whose outcome failed; `Err` is the engine itself
    /// failing.
    fn export(&self, job: &ExportJob) -> Result<ExportStatus, EngineError>;
}

/// Entry point into a rendering engine: project loading.
pub trait LayoutEngine: Send + Sync {
    fn open_project(&self, path: &Path) -> Result<Arc<dyn Project>, EngineError>;
}

// ============================================================================
// Tests
// ============================================================================
