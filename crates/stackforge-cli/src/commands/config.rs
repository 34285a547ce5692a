//! `stackforge config` — read and write configuration values.
//!
//! Stack default keys live under `defaults.` and are named by flag, e.g.
//! `defaults.database`. `set` validates the value against the field's
//! domain before persisting, so a config file can never hold a value the
//! resolver would reject.

use stackforge_core::domain::FieldId;
use stackforge_core::serialize::parse_assign;

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.print(&format!("{key} = {value}"))?;
        }

        ConfigCommands::Set { key, value } => {
            let mut config = config;
            set_config_value(&mut config, &key, &value)?;
            let path = AppConfig::config_path();
            config.save(&path)?;
            output.success(&format!("{key} = {value} ({})", path.display()))?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let serialised = toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                message: format!("Failed to serialise config: {e}"),
                source: Some(Box::new(e)),
            })?;
            output.print(&serialised)?;
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::config_path().display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    if let Some(field) = key.strip_prefix("defaults.") {
        return config
            .defaults
            .get(field)
            .cloned()
            .ok_or_else(|| CliError::ConfigError {
                message: format!("No default set for '{field}'"),
                source: None,
            });
    }
    match key {
        "output.no_color" => Ok(config.output.no_color.to_string()),
        "output.format" => Ok(config.output.format.clone()),
        _ => Err(CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        }),
    }
}

fn set_config_value(config: &mut AppConfig, key: &str, value: &str) -> CliResult<()> {
    if let Some(flag) = key.strip_prefix("defaults.") {
        let field = FieldId::from_flag(flag).ok_or_else(|| CliError::ConfigError {
            message: format!("Unknown stack field: '{flag}'"),
            source: None,
        })?;
        // Domain-check the value before it can poison a future run.
        parse_assign(field, value).map_err(CliError::UnsupportedValue)?;
        config.defaults.insert(flag.to_string(), value.to_string());
        return Ok(());
    }
    match key {
        "output.no_color" => {
            config.output.no_color = value.parse().map_err(|_| CliError::ConfigError {
                message: format!("output.no_color must be true or false, got '{value}'"),
                source: None,
            })?;
            Ok(())
        }
        "output.format" => {
            config.output.format = value.to_string();
            Ok(())
        }
        _ => Err(CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        }),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_stack_default() {
        let mut cfg = AppConfig::default();
        set_config_value(&mut cfg, "defaults.database", "postgres").unwrap();
        assert_eq!(
            get_config_value(&cfg, "defaults.database").unwrap(),
            "postgres"
        );
    }

    #[test]
    fn set_rejects_out_of_domain_values() {
        let mut cfg = AppConfig::default();
        assert!(matches!(
            set_config_value(&mut cfg, "defaults.database", "oracle"),
            Err(CliError::UnsupportedValue(_))
        ));
    }

    #[test]
    fn set_rejects_unknown_fields() {
        let mut cfg = AppConfig::default();
        assert!(set_config_value(&mut cfg, "defaults.framework", "axum").is_err());
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn output_keys_round_trip() {
        let mut cfg = AppConfig::default();
        set_config_value(&mut cfg, "output.no_color", "true").unwrap();
        assert_eq!(get_config_value(&cfg, "output.no_color").unwrap(), "true");
        assert!(set_config_value(&mut cfg, "output.no_color", "maybe").is_err());
    }

    #[test]
    fn set_accepts_set_valued_defaults() {
        let mut cfg = AppConfig::default();
        set_config_value(&mut cfg, "defaults.addons", "biome,turborepo").unwrap();
        set_config_value(&mut cfg, "defaults.frontend", "none").unwrap();
        assert!(cfg.seeds().is_ok());
    }
}
