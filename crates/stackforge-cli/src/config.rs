//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Config file (`--config`, or the platform default location)
//! 3. Built-in defaults (always present)
//!
//! The `[defaults]` table holds per-field stack overrides keyed by flag
//! name, e.g. `database = "postgres"` or `auth = "false"`. They seed the
//! resolver as *non-explicit* values: a seeded default that loses to a
//! cascade is corrected silently, unlike a typed flag.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use stackforge_core::domain::{DomainError, FieldId, PartialConfig};
use stackforge_core::serialize::parse_assign;

use crate::error::{CliError, CliResult};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Per-field stack default overrides, keyed by flag name.
    pub defaults: BTreeMap<String, String>,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `config_file` (the `--config` value), or the
    /// default location when `None`.
    ///
    /// A missing file at the *default* location is fine — built-in defaults
    /// apply. A missing file the user pointed at explicitly is an error.
    pub fn load(config_file: Option<&PathBuf>) -> CliResult<Self> {
        let (path, explicit) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };

        if !path.exists() {
            if explicit {
                return Err(CliError::ConfigFileNotFound { path });
            }
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path).map_err(|e| CliError::ConfigError {
            message: format!("failed to read {}", path.display()),
            source: Some(Box::new(e)),
        })?;
        let config: AppConfig = toml::from_str(&raw).map_err(|e| CliError::ConfigError {
            message: format!("failed to parse {}", path.display()),
            source: Some(Box::new(e)),
        })?;

        // Surface bad stack defaults at load time, not mid-resolve.
        config.seeds()?;
        Ok(config)
    }

    /// Persist this configuration to `path`.
    pub fn save(&self, path: &Path) -> CliResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CliError::ConfigError {
                message: format!("failed to create {}", parent.display()),
                source: Some(Box::new(e)),
            })?;
        }
        let body = toml::to_string_pretty(self).map_err(|e| CliError::ConfigError {
            message: format!("failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })?;
        std::fs::write(path, body).map_err(|e| CliError::ConfigError {
            message: format!("failed to write {}", path.display()),
            source: Some(Box::new(e)),
        })
    }

    /// The stack defaults as a partial configuration for seeding the
    /// resolver.
    pub fn seeds(&self) -> CliResult<PartialConfig> {
        let mut partial = PartialConfig::default();
        for (key, value) in &self.defaults {
            let assign = parse_default(key, value).map_err(|e| CliError::ConfigError {
                message: format!("invalid stack default '{key} = \"{value}\"': {e}"),
                source: Some(Box::new(e)),
            })?;
            partial.set(assign);
        }
        Ok(partial)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.stackforge.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "stackforge", "stackforge")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".stackforge.toml"))
    }
}

fn parse_default(key: &str, value: &str) -> Result<stackforge_core::domain::Assign, DomainError> {
    let field = FieldId::from_flag(key).ok_or_else(|| DomainError::MalformedInput {
        source_kind: "config file",
        reason: format!("unknown stack field '{key}'"),
    })?;
    parse_assign(field, value)
}
