//! Vector layer schemas used to validate and rewrite filter expressions.

use serde::{Deserialize, Serialize};

/// Storage type of a layer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Integer,
    Long,
    Double,
    String,
    Bool,
    Date,
}

impl FieldType {
    /// Integer-valued types.
    pub fn is_integer(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Long)
    }

    /// Numeric types, integer or floating point.
    pub fn is_numeric(&self) -> bool {
        self.is_integer() || matches!(self, FieldType::Double)
    }
}

/// A single field of a vector layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Schema of a vector layer: its fields and the declared primary key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerSchema {
    pub fields: Vec<Field>,

    /// Indexes into `fields` of the primary key columns. Empty when the
    /// data provider declares no primary key.
    #[serde(default)]
    pub primary_key_indexes: Vec<usize>,
}

impl LayerSchema {
    /// Build a schema, discarding primary key indexes that do not point at a
    /// field.
    pub fn new(fields: Vec<Field>, primary_key_indexes: Vec<usize>) -> Self {
        let primary_key_indexes = primary_key_indexes
            .into_iter()
            .filter(|i| *i < fields.len())
            .collect();
        Self {
            fields,
            primary_key_indexes,
        }
    }

    /// Look up a field by exact name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// The primary key field, when exactly one is declared.
    ///
    /// Composite and absent keys both yield `None`: a row-identifier rewrite
    /// is only meaningful against a single key column.
    pub fn single_primary_key(&self) -> Option<&Field> {
        match self.primary_key_indexes.as_slice() {
            [index] => self.fields.get(*index),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
