//! Application state and shared resources.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use walkdir::WalkDir;

use atlas_common::error::{AtlasError, AtlasResult};
use atlas_protocol::ServiceMetadata;
use layout_engine::{LayoutEngine, Project};

use crate::config::ServiceConfig;
use crate::metrics::MetricsCollector;

/// Shared application state.
pub struct AppState {
    pub projects: ProjectRegistry,
    pub config: ServiceConfig,
    pub metadata: ServiceMetadata,
    pub metrics: Arc<MetricsCollector>,
}

impl AppState {
    pub fn new(engine: &dyn LayoutEngine, config: ServiceConfig) -> Result<Self> {
        let projects = ProjectRegistry::load(
            engine,
            &config.projects_dir,
            config.default_project.clone(),
        )?;
        std::fs::create_dir_all(&config.export_dir)?;

        Ok(Self {
            projects,
            config,
            metadata: ServiceMetadata::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            metrics: Arc::new(MetricsCollector::new()),
        })
    }
}

// ============================================================================
// Project Registry
// ============================================================================

/// Projects opened at startup, keyed by file stem.
///
/// The registry is read-only after startup; request handlers share it
/// through the `AppState` `Arc`.
pub struct ProjectRegistry {
    projects: BTreeMap<String, Arc<dyn Project>>,
    default_project: Option<String>,
}

impl ProjectRegistry {
    /// Scan `dir` for `*.yaml` / `*.yml` project definitions and open each
    /// with the engine. Files that fail to open are skipped with a warning
    /// so one broken project cannot take the service down.
    pub fn load(
        engine: &dyn LayoutEngine,
        dir: &Path,
        default_project: Option<String>,
    ) -> Result<Self> {
        let mut projects: BTreeMap<String, Arc<dyn Project>> = BTreeMap::new();

        if !dir.exists() {
            warn!(path = %dir.display(), "Projects directory not found");
            return Ok(Self {
                projects,
                default_project,
            });
        }

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            let path = entry.path();
            if !path
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
            {
                continue;
            }

            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            match engine.open_project(path) {
                Ok(project) => {
                    info!(project = %name, path = %path.display(), "Loaded project");
                    projects.insert(name.to_string(), project);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to load project");
                }
            }
        }

        if let Some(default) = &default_project {
            if !projects.contains_key(default) {
                warn!(project = %default, "Configured default project was not loaded");
            }
        }

        info!(count = projects.len(), "Loaded projects");
        Ok(Self {
            projects,
            default_project,
        })
    }

    /// Resolve the project a request addresses.
    ///
    /// Explicit MAP wins; then the configured default; a lone loaded
    /// project serves MAP-less requests on its own.
    pub fn resolve(&self, map: Option<&str>) -> AtlasResult<&Arc<dyn Project>> {
        if let Some(name) = map {
            return self
                .projects
                .get(name)
                .ok_or_else(|| AtlasError::ProjectNotFound(name.to_string()));
        }

        if let Some(default) = &self.default_project {
            return self
                .projects
                .get(default)
                .ok_or_else(|| AtlasError::ProjectNotFound(default.clone()));
        }

        let mut values = self.projects.values();
        match (values.next(), values.next()) {
            (Some(only), None) => Ok(only),
            _ => Err(AtlasError::MissingParameter("MAP".to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
