//! Export jobs, output formats and engine result codes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Output document format for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pdf,
    Png,
    Jpeg,
}

impl OutputFormat {
    /// Map a FORMAT parameter value, MIME type or short name, to a format.
    ///
    /// SVG is aliased to PDF, and unknown values fall back to PDF, the
    /// format this service has always produced by default.
    pub fn from_param(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "png" | "image/png" => OutputFormat::Png,
            "jpeg" | "jpg" | "image/jpeg" => OutputFormat::Jpeg,
            "svg" | "image/svg" | "image/svg+xml" => OutputFormat::Pdf,
            _ => OutputFormat::Pdf,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }

    /// File extension used for artifact names, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

/// Result codes reported by the engine for a finished export call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportStatus {
    Success,
    Canceled,
    MemoryError,
    FileError,
    PrintError,
    SvgLayerError,
    IteratorError,
    Unknown,
}

impl ExportStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ExportStatus::Success)
    }

    /// Human readable description of the result code.
    pub fn description(&self) -> &'static str {
        match self {
            ExportStatus::Success => "success",
            ExportStatus::Canceled => "export canceled",
            ExportStatus::MemoryError => "not enough memory",
            ExportStatus::FileError => "could not write to the output file",
            ExportStatus::PrintError => "could not start the print device",
            ExportStatus::SvgLayerError => "could not create the SVG layers",
            ExportStatus::IteratorError => "error while iterating over the atlas features",
            ExportStatus::Unknown => "unknown export error",
        }
    }
}

/// A single export request handed to the engine.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Exact layout name in the project.
    pub layout: String,
    pub format: OutputFormat,
    pub output_path: PathBuf,

    /// Feature filter for atlas layouts, already validated and optimized.
    pub filter: Option<String>,

    /// Fixed scale denominator forced on the reference map.
    pub fixed_scale: Option<i64>,

    /// Predefined scale denominators forced on the atlas context.
    pub predefined_scales: Option<Vec<f64>>,

    /// Lower-cased layout text item ids and their replacement values.
    /// Ids with no matching item are ignored by the engine.
    pub text_substitutions: Vec<(String, String)>,
}

impl ExportJob {
    pub fn new(layout: impl Into<String>, format: OutputFormat, output_path: PathBuf) -> Self {
        Self {
            layout: layout.into(),
            format,
            output_path,
            filter: None,
            fixed_scale: None,
            predefined_scales: None,
            text_substitutions: Vec::new(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
