//! Common test fixtures for atlas-print tests.
//!
//! The fixtures describe small projects for the in-memory layout engine.
//! The `demo` project covers the interesting layout shapes: an atlas
//! layout, a report, a plain print layout, and layouts that simulate
//! engine failures.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use layout_engine::{MemoryEngine, Project, ProjectDefinition};

/// The `demo` project.
///
/// Layouts:
/// - `layout1-atlas`: atlas over the `countries` layer
/// - `layout2-report`: a report, no coverage layer
/// - `layout3-simple`: print layout without an atlas
/// - `layout4-broken`: atlas whose export always reports a print error
/// - `layout5-vanishing`: atlas whose export succeeds without an artifact
/// - `layout6-scaled`: atlas using the project's predefined scales
pub const PROJECT_YAML: &str = r#"
name: demo
layouts:
  - name: layout1-atlas
    kind: print
    atlas:
      enabled: true
      coverage_layer: countries
    text_items: [title, subtitle]
  - name: layout2-report
    kind: report
  - name: layout3-simple
    kind: print
  - name: layout4-broken
    kind: print
    atlas:
      enabled: true
      coverage_layer: countries
    fail_status: print_error
  - name: layout5-vanishing
    kind: print
    atlas:
      enabled: true
      coverage_layer: countries
    skip_artifact: true
  - name: layout6-scaled
    kind: print
    atlas:
      enabled: true
      coverage_layer: countries
    uses_predefined_scales: true
layers:
  countries:
    fields:
      - name: id
        type: integer
      - name: name
        type: string
      - name: population
        type: long
    primary_key_indexes: [0]
scales: [100000.0, 50000.0, 25000.0]
"#;

/// The `regions` project. Its primary key is the second field, a long.
pub const SECOND_PROJECT_YAML: &str = r#"
name: regions
layouts:
  - name: overview-atlas
    kind: print
    atlas:
      enabled: true
      coverage_layer: zones
layers:
  zones:
    fields:
      - name: code
        type: string
      - name: zone_id
        type: long
    primary_key_indexes: [1]
"#;

/// Parse the `demo` project definition.
pub fn project_definition() -> ProjectDefinition {
    serde_yaml::from_str(PROJECT_YAML).expect("demo project fixture must parse")
}

/// Open the `demo` project with the in-memory engine.
pub fn atlas_project() -> Arc<dyn Project> {
    MemoryEngine::new().project_from_definition(project_definition())
}

/// Write the `demo` project into `dir` as `demo.yaml`.
pub fn write_project_file(dir: &Path) -> PathBuf {
    let path = dir.join("demo.yaml");
    std::fs::write(&path, PROJECT_YAML).expect("write demo project fixture");
    path
}

/// Write the `regions` project into `dir` as `regions.yaml`.
pub fn write_second_project_file(dir: &Path) -> PathBuf {
    let path = dir.join("regions.yaml");
    std::fs::write(&path, SECOND_PROJECT_YAML).expect("write regions project fixture");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_project_parses() {
        let definition = project_definition();
        assert_eq!(definition.name, "demo");
        assert_eq!(definition.layouts.len(), 6);
        assert!(definition.layers.contains_key("countries"));
    }

    #[test]
    fn test_demo_project_layout_shapes() {
        let project = atlas_project();
        assert!(project.layout("layout1-atlas").unwrap().is_atlas());
        assert!(project.layout("layout2-report").unwrap().is_report());
        assert!(!project.layout("layout3-simple").unwrap().is_atlas());
        assert!(project.layout("layout6-scaled").unwrap().uses_predefined_scales);
    }

    #[test]
    fn test_demo_project_primary_key() {
        let project = atlas_project();
        let schema = project.layer_schema("countries").unwrap();
        assert_eq!(schema.single_primary_key().unwrap().name, "id");
    }

    #[test]
    fn test_second_project_primary_key_not_first_field() {
        let definition: ProjectDefinition =
            serde_yaml::from_str(SECOND_PROJECT_YAML).expect("regions fixture must parse");
        let project = MemoryEngine::new().project_from_definition(definition);
        let schema = project.layer_schema("zones").unwrap();
        assert_eq!(schema.single_primary_key().unwrap().name, "zone_id");
    }

    #[test]
    fn test_write_project_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_project_file(dir.path());
        assert!(path.exists());
        assert_eq!(path.file_name().unwrap(), "demo.yaml");

        let engine = MemoryEngine::new();
        use layout_engine::LayoutEngine;
        assert_eq!(engine.open_project(&path).unwrap().name(), "demo");
    }
}
