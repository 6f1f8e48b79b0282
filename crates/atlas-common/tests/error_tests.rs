//! Tests for the error taxonomy and its HTTP mapping.

use atlas_common::error::AtlasError;

// ============================================================================
// Status code mapping
// ============================================================================

#[test]
fn test_validation_errors_are_400() {
    let errors = [
        AtlasError::MissingParameter("TEMPLATE".to_string()),
        AtlasError::FilterRequired,
        AtlasError::ConflictingScales,
        AtlasError::InvalidNumber("SCALE".to_string()),
        AtlasError::ExpressionSyntax("syntax error".to_string()),
        AtlasError::ExpressionEval("Column 'x' not found".to_string()),
        AtlasError::ProjectNotFound("demo".to_string()),
        AtlasError::LayoutNotFound("layout1".to_string()),
        AtlasError::UnsupportedLayout("layout1".to_string()),
    ];
    for err in errors {
        assert_eq!(err.http_status_code(), 400, "{err}");
        assert!(err.is_user_error(), "{err}");
    }
}

#[test]
fn test_missing_artifact_is_404() {
    let err = AtlasError::ArtifactMissing("/tmp/out.pdf".to_string());
    assert_eq!(err.http_status_code(), 404);
    assert!(!err.is_user_error());
}

#[test]
fn test_internal_errors_are_500() {
    let err = AtlasError::ExportFailed("not enough memory".to_string());
    assert_eq!(err.http_status_code(), 500);
    assert!(!err.is_user_error());

    let err = AtlasError::Internal("boom".to_string());
    assert_eq!(err.http_status_code(), 500);
    assert!(!err.is_user_error());
}

// ============================================================================
// Message wording
// ============================================================================

#[test]
fn test_validation_messages() {
    assert_eq!(
        AtlasError::MissingParameter("TEMPLATE".to_string()).to_string(),
        "TEMPLATE is required"
    );
    assert_eq!(
        AtlasError::FilterRequired.to_string(),
        "EXP_FILTER is mandatory to print an atlas layout"
    );
    assert_eq!(
        AtlasError::ConflictingScales.to_string(),
        "SCALE and SCALES can not be used together."
    );
    assert_eq!(
        AtlasError::InvalidNumber("SCALES".to_string()).to_string(),
        "Invalid number in SCALES."
    );
    assert_eq!(
        AtlasError::LayoutNotFound("Fakelayout1-atlas".to_string()).to_string(),
        "Layout `Fakelayout1-atlas` not found"
    );
}

#[test]
fn test_expression_messages() {
    let err = AtlasError::ExpressionEval("Column 'fakeId' not found".to_string());
    assert_eq!(
        err.to_string(),
        "Expression is invalid, eval error: Column 'fakeId' not found"
    );

    let err = AtlasError::ExpressionSyntax("syntax error, unexpected end of input".to_string());
    assert!(err.to_string().starts_with("Expression is invalid: "));
}

#[test]
fn test_io_error_maps_to_internal() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: AtlasError = io.into();
    assert_eq!(err.http_status_code(), 500);
}
