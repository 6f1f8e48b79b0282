//! GetCapabilities response types.

use serde::{Deserialize, Serialize};

/// Service identification reported by GetCapabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMetadata {
    pub name: String,
    pub version: String,
}

impl ServiceMetadata {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Body of a successful GetCapabilities response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilitiesResponse {
    pub status: String,
    pub metadata: ServiceMetadata,
}

impl CapabilitiesResponse {
    pub fn new(metadata: ServiceMetadata) -> Self {
        Self {
            status: "success".to_string(),
            metadata,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
