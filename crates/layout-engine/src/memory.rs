//! In-memory layout engine over declarative project definitions.
//!
//! Projects are YAML documents describing layouts and layer schemas. Exports
//! write a minimal but well-formed artifact for the requested format, which
//! is all the HTTP layer needs: real deployments plug a cartographic engine
//! into the same traits.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use atlas_common::schema::LayerSchema;

use crate::engine::{AtlasInfo, EngineError, LayoutEngine, LayoutInfo, LayoutKind, Project};
use crate::export::{ExportJob, ExportStatus, OutputFormat};

/// Declarative project definition consumed by [`MemoryEngine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDefinition {
    pub name: String,

    #[serde(default)]
    pub layouts: Vec<LayoutDefinition>,

    /// Vector layer schemas by layer name.
    #[serde(default)]
    pub layers: BTreeMap<String, LayerSchema>,

    /// Project level predefined scale denominators.
    #[serde(default)]
    pub scales: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutDefinition {
    pub name: String,
    pub kind: LayoutKind,

    #[serde(default)]
    pub atlas: Option<AtlasDefinition>,

    #[serde(default)]
    pub uses_predefined_scales: bool,

    /// Ids of label items that accept text substitutions.
    #[serde(default)]
    pub text_items: Vec<String>,

    /// Report this result code instead of exporting. Test hook.
    #[serde(default)]
    pub fail_status: Option<ExportStatus>,

    /// Report success without writing the artifact. Test hook.
    #[serde(default)]
    pub skip_artifact: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasDefinition {
    #[serde(default)]
    pub enabled: bool,
    pub coverage_layer: String,
}

/// In-memory engine for development and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryEngine;

impl MemoryEngine {
    pub fn new() -> Self {
        Self
    }

    /// Wrap an already parsed definition as a project.
    pub fn project_from_definition(&self, definition: ProjectDefinition) -> Arc<dyn Project> {
        Arc::new(MemoryProject { definition })
    }
}

impl LayoutEngine for MemoryEngine {
    fn open_project(&self, path: &Path) -> Result<Arc<dyn Project>, EngineError> {
        let text = std::fs::read_to_string(path)?;
        let definition: ProjectDefinition =
            serde_yaml::from_str(&text).map_err(|e| EngineError::ProjectInvalid(e.to_string()))?;
        Ok(self.project_from_definition(definition))
    }
}

struct MemoryProject {
    definition: ProjectDefinition,
}

impl MemoryProject {
    fn layout_definition(&self, name: &str) -> Option<&LayoutDefinition> {
        self.definition.layouts.iter().find(|l| l.name == name)
    }
}

impl Project for MemoryProject {
    fn name(&self) -> &str {
        &self.definition.name
    }

    fn layout(&self, name: &str) -> Option<LayoutInfo> {
        self.layout_definition(name).map(|def| LayoutInfo {
            name: def.name.clone(),
            kind: def.kind,
            atlas: def.atlas.as_ref().map(|a| AtlasInfo {
                enabled: a.enabled,
                coverage_layer: a.coverage_layer.clone(),
            }),
            uses_predefined_scales: def.uses_predefined_scales,
        })
    }

    fn layer_schema(&self, layer: &str) -> Option<&LayerSchema> {
        self.definition.layers.get(layer)
    }

    fn predefined_scales(&self) -> Option<&[f64]> {
        self.definition.scales.as_deref()
    }

    fn export(&self, job: &ExportJob) -> Result<ExportStatus, EngineError> {
        let def = self
            .layout_definition(&job.layout)
            .ok_or_else(|| EngineError::LayoutUnknown(job.layout.clone()))?;

        for (id, value) in &job.text_substitutions {
            if def.text_items.iter().any(|item| item == id) {
                debug!(item = %id, value = %value, "applying text substitution");
            } else {
                debug!(item = %id, "no layout item matches parameter");
            }
        }

        if let Some(status) = def.fail_status {
            return Ok(status);
        }
        if def.skip_artifact {
            return Ok(ExportStatus::Success);
        }

        std::fs::write(&job.output_path, artifact_bytes(job.format))?;
        Ok(ExportStatus::Success)
    }
}

// ============================================================================
// Artifact writers
// ============================================================================

fn artifact_bytes(format: OutputFormat) -> Vec<u8> {
    match format {
        OutputFormat::Pdf => minimal_pdf(),
        OutputFormat::Png => minimal_png(),
        OutputFormat::Jpeg => minimal_jpeg(),
    }
}

/// One empty A4 page with a correct xref table.
fn minimal_pdf() -> Vec<u8> {
    let objects = [
        "1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n",
        "2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n",
        "3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 595 842] >>\nendobj\n",
    ];

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::new();
    for object in objects {
        offsets.push(out.len());
        out.extend_from_slice(object.as_bytes());
    }

    let xref_start = out.len();
    out.extend_from_slice(b"xref\n0 4\n0000000000 65535 f \n");
    for offset in &offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(b"trailer\n<< /Size 4 /Root 1 0 R >>\nstartxref\n");
    out.extend_from_slice(xref_start.to_string().as_bytes());
    out.extend_from_slice(b"\n%%EOF\n");
    out
}

/// A 1x1 grayscale PNG.
fn minimal_png() -> Vec<u8> {
    let mut data = Vec::new();

    // PNG signature
    data.extend_from_slice(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);

    // IHDR chunk
    let mut ihdr = Vec::new();
    ihdr.extend_from_slice(&1u32.to_be_bytes());
    ihdr.extend_from_slice(&1u32.to_be_bytes());
    ihdr.push(8); // bit depth
    ihdr.push(0); // color type (grayscale)
    ihdr.push(0); // compression method
    ihdr.push(0); // filter method
    ihdr.push(0); // interlace method
    write_chunk(&mut data, b"IHDR", &ihdr);

    // IDAT chunk: one scanline, filter type none, one white pixel
    let raw = [0u8, 255u8];
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&raw).unwrap();
    let compressed = encoder.finish().unwrap();
    write_chunk(&mut data, b"IDAT", &compressed);

    // IEND chunk
    write_chunk(&mut data, b"IEND", &[]);

    data
}

/// Write a PNG chunk with CRC.
fn write_chunk(out: &mut Vec<u8>, name: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(name);
    out.extend_from_slice(data);
    let mut crc_data = Vec::new();
    crc_data.extend_from_slice(name);
    crc_data.extend_from_slice(data);
    let crc = crc32fast::hash(&crc_data);
    out.extend_from_slice(&crc.to_be_bytes());
}

/// JPEG envelope: SOI, a JFIF APP0 segment and EOI.
fn minimal_jpeg() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    data.extend_from_slice(&[0xFF, 0xE0]); // APP0
    data.extend_from_slice(&16u16.to_be_bytes());
    data.extend_from_slice(b"JFIF\0");
    data.extend_from_slice(&[0x01, 0x01]); // version 1.1
    data.push(0x00); // density units
    data.extend_from_slice(&1u16.to_be_bytes());
    data.extend_from_slice(&1u16.to_be_bytes());
    data.extend_from_slice(&[0x00, 0x00]); // no thumbnail
    data.extend_from_slice(&[0xFF, 0xD9]); // EOI
    data
}

// ============================================================================
// Tests
// ============================================================================
