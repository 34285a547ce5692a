//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the resolver's consumers look like from the
//! core's point of view. The `stackforge-adapters` crate provides
//! implementations; tests use mocks.
//!
//! ## Port Types
//!
//! - [`ProjectGenerator`]: consumes a fully resolved [`StackConfig`] plus a
//!   project name and output root, and emits files. The real template engine
//!   lives outside this repository; the adapters crate ships a manifest
//!   writer standing in for it.
//! - [`DependencyInstaller`]: reads the package-manager and feature fields
//!   of a resolved configuration and runs the install step.
//!
//! Both ports only ever see a configuration that has already been through
//! [`crate::resolver::Resolver`] — they never participate in resolving it.

use std::path::Path;

use crate::domain::StackConfig;
use crate::error::StackforgeResult;

/// Port for project file generation.
///
/// Implemented by:
/// - `stackforge_adapters::ManifestGenerator` (writes a project manifest)
/// - `stackforge_adapters::RecordingGenerator` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait ProjectGenerator: Send + Sync {
    /// Generate the project named `name` under `output_root` from a
    /// resolved configuration.
    fn generate(&self, name: &str, output_root: &Path, config: &StackConfig)
    -> StackforgeResult<()>;
}

/// Port for dependency installation.
///
/// Implemented by:
/// - `stackforge_adapters::PreviewInstaller` (logs the invocation)
#[cfg_attr(test, mockall::automock)]
pub trait DependencyInstaller: Send + Sync {
    /// Install dependencies for the project at `project_root`.
    ///
    /// Reads `config.package_manager` and the feature fields; must only be
    /// called when `config.install` is set.
    fn install(&self, project_root: &Path, config: &StackConfig) -> StackforgeResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::default_config;

    #[test]
    fn generator_mock_sees_the_resolved_config() {
        let mut generator = MockProjectGenerator::new();
        generator
            .expect_generate()
            .withf(|name, _, config| name == "my-app" && config.install)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let cfg = default_config();
        generator
            .generate("my-app", Path::new("/tmp"), &cfg)
            .unwrap();
    }

    #[test]
    fn installer_mock_reports_failures() {
        let mut installer = MockDependencyInstaller::new();
        installer.expect_install().returning(|_, _| {
            Err(crate::error::StackforgeError::Generation {
                message: "npm exited nonzero".into(),
            })
        });

        let cfg = default_config();
        assert!(installer.install(Path::new("/tmp"), &cfg).is_err());
    }
}
