//! `crab config`: inspect the effective configuration.

use crab_core::config::CrabConfig;

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Show => {
            let config = project_config(&global)?;
            let serialised = toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                message: format!("Failed to serialise config: {e}"),
                source: Some(Box::new(e)),
            })?;
            output.data(serialised.trim_end())?;
        }

        ConfigCommands::Get { key } => {
            let config = project_config(&global)?;
            output.data(&get_config_value(&config, &key)?)?;
        }

        ConfigCommands::Path => match AppConfig::config_path() {
            Some(path) => output.data(&path.display().to_string())?,
            None => {
                return Err(CliError::ConfigError {
                    message: "Could not determine the user settings directory".into(),
                    source: None,
                });
            }
        },
    }

    Ok(())
}

fn project_config(global: &GlobalArgs) -> CliResult<CrabConfig> {
    let cwd = std::env::current_dir().with_cli_context(|| "Failed to determine current directory")?;
    super::load_project_config(global.config.as_deref(), &cwd)
}

// ── helpers ───────────────────────────────────────────────────────────────────

/// Look up a dotted key such as `paths.source` or `test.coverage.threshold`.
///
/// Strings print bare; everything else prints as TOML.
fn get_config_value(config: &CrabConfig, key: &str) -> CliResult<String> {
    let unknown = || CliError::InvalidInput {
        message: format!("Unknown config key: '{key}'"),
    };

    let root = toml::Value::try_from(config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;

    let mut value = &root;
    for segment in key.split('.') {
        value = value
            .as_table()
            .and_then(|table| table.get(segment))
            .ok_or_else(unknown)?;
    }

    Ok(match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Table(table) => toml::to_string_pretty(table)
            .map_err(|e| CliError::ConfigError {
                message: format!("Failed to serialise config: {e}"),
                source: Some(Box::new(e)),
            })?
            .trim_end()
            .to_string(),
        other => other.to_string(),
    })
}

// ── tests ─────────────────────────────────────────────────────────────────────
