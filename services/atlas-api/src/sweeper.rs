//! Stale artifact cleanup background task.
//!
//! Export artifacts are deleted as soon as their bytes are read back, so
//! under normal operation the export directory stays empty. Files survive
//! only when the process dies mid-request; this task sweeps those up.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use anyhow::Result;
use tokio::time::interval;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// File extensions the export pipeline produces. The sweeper refuses to
/// touch anything else.
const ARTIFACT_EXTENSIONS: &[&str] = &["pdf", "png", "jpg"];

/// Configuration for the artifact sweeper.
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// Whether the sweeper runs at all.
    pub enabled: bool,
    /// Seconds between sweeps.
    pub interval_secs: u64,
    /// Artifacts older than this are removed.
    pub max_age: Duration,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 300,
            max_age: Duration::from_secs(600),
        }
    }
}

/// Statistics from a sweep run.
#[derive(Debug, Default, Clone)]
pub struct SweepStats {
    pub removed: u64,
    pub errors: u64,
}

/// Background sweeper over the export directory.
pub struct ExportSweeper {
    export_dir: PathBuf,
    config: SweeperConfig,
}

impl ExportSweeper {
    pub fn new(export_dir: PathBuf, config: SweeperConfig) -> Self {
        Self { export_dir, config }
    }

    /// Run one sweep.
    pub fn sweep_once(&self) -> Result<SweepStats> {
        let mut stats = SweepStats::default();
        let cutoff = SystemTime::now() - self.config.max_age;

        for entry in WalkDir::new(&self.export_dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let is_artifact = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ARTIFACT_EXTENSIONS.contains(&ext));
            if !is_artifact {
                continue;
            }

            let modified = entry.metadata()?.modified()?;
            if modified >= cutoff {
                continue;
            }

            match std::fs::remove_file(path) {
                Ok(()) => {
                    debug!(path = %path.display(), "Removed stale export artifact");
                    stats.removed += 1;
                }
                Err(e) => {
                    // The file may have been claimed by its request between
                    // the scan and the unlink.
                    warn!(path = %path.display(), error = %e, "Failed to remove stale artifact");
                    stats.errors += 1;
                }
            }
        }

        if stats.removed > 0 {
            info!(
                removed = stats.removed,
                errors = stats.errors,
                "Sweep complete"
            );
        }
        Ok(stats)
    }

    /// Run the sweeper in a loop.
    pub async fn run_forever(self) {
        if !self.config.enabled {
            info!("Artifact sweeper disabled");
            return;
        }

        info!(
            interval_secs = self.config.interval_secs,
            max_age_secs = self.config.max_age.as_secs(),
            dir = %self.export_dir.display(),
            "Starting artifact sweeper"
        );

        let mut ticker = interval(Duration::from_secs(self.config.interval_secs));

        loop {
            ticker.tick().await;
            if let Err(e) = self.sweep_once() {
                error!(error = %e, "Sweep failed");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
