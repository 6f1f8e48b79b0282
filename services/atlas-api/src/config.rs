//! Runtime configuration for the atlas API service.

use std::path::PathBuf;

use atlas_protocol::PkPolicy;

/// Service configuration, built once in `main` from CLI arguments and
/// environment variables, then handed to [`crate::state::AppState`].
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Listen address, e.g. `0.0.0.0:8080`.
    pub listen: String,

    /// Directory scanned for project definition files.
    pub projects_dir: PathBuf,

    /// Project used when requests omit MAP.
    pub default_project: Option<String>,

    /// Directory export artifacts are written to while a request is in
    /// flight. Every artifact is deleted again once its bytes have been
    /// read back.
    pub export_dir: PathBuf,

    /// Primary key types eligible for the `$id` rewrite.
    pub pk_policy: PkPolicy,

    /// Enables debug logging.
    pub debug: bool,
}

impl ServiceConfig {
    /// Export directory used when none is configured. A dedicated
    /// subdirectory of the OS temp dir, so the stale artifact sweeper
    /// never touches unrelated files.
    pub fn default_export_dir() -> PathBuf {
        std::env::temp_dir().join("atlas-exports")
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
            projects_dir: PathBuf::from("projects"),
            default_project: None,
            export_dir: Self::default_export_dir(),
            pk_policy: PkPolicy::default(),
            debug: false,
        }
    }
}
