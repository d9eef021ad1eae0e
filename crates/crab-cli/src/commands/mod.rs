//! Command handlers, one module per subcommand.

use std::path::Path;

use tracing::debug;

use crab_core::config::{ConfigError, CrabConfig, STANDALONE_FILE_NAMES};

use crate::error::{CliError, CliResult};

pub mod completions;
pub mod config;
pub mod init;
pub mod list;

/// Name of the document searched for a `[tool.crab]` table.
pub const PYPROJECT_FILE_NAME: &str = "pyproject.toml";

/// Load the project configuration.
///
/// An explicit `--config` file must exist and parse. Without one, `cwd` is
/// searched for a standalone `crab.toml`, then a `pyproject.toml`; a
/// `pyproject.toml` without a `[tool.crab]` table, or no document at all,
/// yields the defaults.
pub fn load_project_config(explicit: Option<&Path>, cwd: &Path) -> CliResult<CrabConfig> {
    if let Some(path) = explicit {
        return CrabConfig::discover(path).map_err(core_config_error);
    }

    for name in STANDALONE_FILE_NAMES {
        let candidate = cwd.join(name);
        if candidate.is_file() {
            debug!(path = %candidate.display(), "using standalone project config");
            return CrabConfig::load_standalone(&candidate).map_err(core_config_error);
        }
    }

    let pyproject = cwd.join(PYPROJECT_FILE_NAME);
    if pyproject.is_file() {
        match CrabConfig::load(&pyproject) {
            Ok(config) => {
                debug!(path = %pyproject.display(), "using [tool.crab] from pyproject.toml");
                return Ok(config);
            }
            Err(ConfigError::MissingSection { .. }) => {
                debug!(path = %pyproject.display(), "no [tool.crab] table, using defaults");
            }
            Err(e) => return Err(core_config_error(e)),
        }
    }

    Ok(CrabConfig::default())
}

fn core_config_error(err: ConfigError) -> CliError {
    CliError::Core(err.into())
}
