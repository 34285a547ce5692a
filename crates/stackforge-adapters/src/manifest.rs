//! Thin implementations of the downstream ports.
//!
//! The real template engine and installer live outside this repository;
//! these adapters stand in for them at the same seams:
//!
//! - [`ManifestGenerator`] writes a `stackforge.json` manifest describing
//!   the resolved stack into the project directory.
//! - [`PreviewInstaller`] logs the package-manager invocation it would run.
//! - [`RecordingGenerator`] records calls for tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use tracing::info;

use stackforge_core::application::ports::{DependencyInstaller, ProjectGenerator};
use stackforge_core::domain::StackConfig;
use stackforge_core::error::{StackforgeError, StackforgeResult};
use stackforge_core::serialize::serialize_command;

/// Project generator that emits a `stackforge.json` manifest.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestGenerator;

impl ManifestGenerator {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Serialize)]
struct Manifest<'a> {
    name: &'a str,
    generator: &'static str,
    command: String,
    stack: &'a StackConfig,
}

impl ProjectGenerator for ManifestGenerator {
    fn generate(
        &self,
        name: &str,
        output_root: &Path,
        config: &StackConfig,
    ) -> StackforgeResult<()> {
        let project_dir = output_root.join(name);
        std::fs::create_dir_all(&project_dir).map_err(|e| StackforgeError::Generation {
            message: format!("failed to create {}: {e}", project_dir.display()),
        })?;

        let manifest = Manifest {
            name,
            generator: concat!("stackforge ", env!("CARGO_PKG_VERSION")),
            command: serialize_command(config),
            stack: config,
        };
        let body =
            serde_json::to_string_pretty(&manifest).map_err(|e| StackforgeError::Internal {
                message: format!("manifest serialization failed: {e}"),
            })?;

        let manifest_path = project_dir.join("stackforge.json");
        std::fs::write(&manifest_path, body).map_err(|e| StackforgeError::Generation {
            message: format!("failed to write {}: {e}", manifest_path.display()),
        })?;

        info!(project = name, path = %manifest_path.display(), "manifest written");
        Ok(())
    }
}

/// Installer that only logs what it would run.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewInstaller;

impl PreviewInstaller {
    pub fn new() -> Self {
        Self
    }
}

impl DependencyInstaller for PreviewInstaller {
    fn install(&self, project_root: &Path, config: &StackConfig) -> StackforgeResult<()> {
        info!(
            package_manager = %config.package_manager,
            path = %project_root.display(),
            "would run: {} install",
            config.package_manager
        );
        Ok(())
    }
}

/// Test double that records every generate call.
#[derive(Debug, Default)]
pub struct RecordingGenerator {
    calls: Mutex<Vec<(String, PathBuf, StackConfig)>>,
}

impl RecordingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(String, PathBuf, StackConfig)> {
        self.calls.lock().expect("recording lock poisoned").clone()
    }
}

impl ProjectGenerator for RecordingGenerator {
    fn generate(
        &self,
        name: &str,
        output_root: &Path,
        config: &StackConfig,
    ) -> StackforgeResult<()> {
        self.calls
            .lock()
            .expect("recording lock poisoned")
            .push((name.to_string(), output_root.to_path_buf(), config.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackforge_core::domain::registry::default_config;

    #[test]
    fn manifest_is_written_and_decodes_to_the_same_stack() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = default_config();

        ManifestGenerator::new()
            .generate("my-app", dir.path(), &cfg)
            .unwrap();

        let raw = std::fs::read_to_string(dir.path().join("my-app/stackforge.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["name"], "my-app");
        assert_eq!(parsed["command"], "");

        let stack: StackConfig = serde_json::from_value(parsed["stack"].clone()).unwrap();
        assert_eq!(stack, cfg);
    }

    #[test]
    fn generation_failure_surfaces_the_path() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the project directory should go.
        std::fs::write(dir.path().join("occupied"), "x").unwrap();

        let err = ManifestGenerator::new()
            .generate("occupied/app", dir.path(), &default_config())
            .unwrap_err();
        assert!(matches!(err, StackforgeError::Generation { .. }));
    }

    #[test]
    fn preview_installer_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        assert!(
            PreviewInstaller::new()
                .install(dir.path(), &default_config())
                .is_ok()
        );
    }

    #[test]
    fn recording_generator_captures_calls() {
        let recorder = RecordingGenerator::new();
        recorder
            .generate("a", Path::new("/tmp"), &default_config())
            .unwrap();
        recorder
            .generate("b", Path::new("/tmp"), &default_config())
            .unwrap();
        let calls = recorder.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, "a");
    }
}
