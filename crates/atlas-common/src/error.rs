//! Error types for atlas-print services.

use thiserror::Error;

/// Result type alias using AtlasError.
pub type AtlasResult<T> = Result<T, AtlasError>;

/// Primary error type for atlas print operations.
#[derive(Debug, Error)]
pub enum AtlasError {
    // === Request validation errors ===
    #[error("{0} is required")]
    MissingParameter(String),

    #[error("EXP_FILTER is mandatory to print an atlas layout")]
    FilterRequired,

    #[error("SCALE and SCALES can not be used together.")]
    ConflictingScales,

    #[error("Invalid number in {0}.")]
    InvalidNumber(String),

    #[error("Expression is invalid: {0}")]
    ExpressionSyntax(String),

    #[error("Expression is invalid, eval error: {0}")]
    ExpressionEval(String),

    // === Resolution errors ===
    #[error("Project `{0}` not found")]
    ProjectNotFound(String),

    #[error("Layout `{0}` not found")]
    LayoutNotFound(String),

    #[error("Layout `{0}` is neither an atlas layout nor a report")]
    UnsupportedLayout(String),

    // === Export errors ===
    #[error("Export failed: {0}")]
    ExportFailed(String),

    #[error("Export artifact not found: {0}")]
    ArtifactMissing(String),

    // === Infrastructure errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AtlasError {
    /// Whether this error was caused by the request rather than the server.
    ///
    /// User errors are answered with their full message; everything else is
    /// logged server-side and answered generically.
    pub fn is_user_error(&self) -> bool {
        self.http_status_code() == 400
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            AtlasError::MissingParameter(_)
            | AtlasError::FilterRequired
            | AtlasError::ConflictingScales
            | AtlasError::InvalidNumber(_)
            | AtlasError::ExpressionSyntax(_)
            | AtlasError::ExpressionEval(_)
            | AtlasError::ProjectNotFound(_)
            | AtlasError::LayoutNotFound(_)
            | AtlasError::UnsupportedLayout(_) => 400,

            AtlasError::ArtifactMissing(_) => 404,

            AtlasError::ExportFailed(_) | AtlasError::Internal(_) => 500,
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for AtlasError {
    fn from(err: std::io::Error) -> Self {
        AtlasError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AtlasError {
    fn from(err: serde_json::Error) -> Self {
        AtlasError::Internal(format!("JSON error: {}", err))
    }
}
