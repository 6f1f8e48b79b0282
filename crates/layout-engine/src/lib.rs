//! Layout engine boundary for atlas printing.
//!
//! The cartographic engine is a black box reached through a small surface:
//! open a project, resolve a layout by name, inspect its atlas configuration
//! and export it to a document. This crate defines that surface, the filter
//! expression language the engine understands, and an in-memory engine used
//! for development and tests.

pub mod engine;
pub mod export;
pub mod expression;
pub mod memory;
pub mod scales;

pub use engine::{AtlasInfo, EngineError, LayoutEngine, LayoutInfo, LayoutKind, Project};
pub use export::{ExportJob, ExportStatus, OutputFormat};
pub use memory::{MemoryEngine, ProjectDefinition};
