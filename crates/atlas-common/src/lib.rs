//! Common types shared across all atlas-print services.

pub mod error;
pub mod schema;

pub use error::{AtlasError, AtlasResult};
pub use schema::{Field, FieldType, LayerSchema};
