//! User settings.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns these settings; the core crate never sees them.  Project
//! configuration (`[tool.crab]`) is a separate document, see
//! [`crab_core::config::CrabConfig`].
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `CRAB_*` environment variables (`CRAB_AUTHOR`, `CRAB_NO_COLOR`,
//!    `CRAB_TEMPLATES_DIR`), including those loaded from `.env`
//! 3. `<config dir>/crab/config.toml`
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Prefix of the environment variables read into [`AppConfig`].
pub const ENV_PREFIX: &str = "CRAB";

/// Author used when nothing else provides one.
pub const DEFAULT_AUTHOR: &str = "Anonymous";

/// User settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Author used for new projects when `--author` is not given.
    pub author: Option<String>,
    /// Disable colored output.
    pub no_color: bool,
    /// Directory holding the template sets.
    pub templates_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load settings from the default file location and the environment.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Self::config_path().as_deref())
    }

    /// Load settings from `file` (if it exists) and the environment.
    pub fn load_from(file: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = file {
            debug!(path = %path.display(), "reading user settings");
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to read user settings")?;

        settings
            .try_deserialize()
            .context("Invalid user settings")
    }

    /// Path to the user settings file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness.
    /// `None` when no home directory can be determined.
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "crab").map(|d| d.config_dir().join("config.toml"))
    }

    /// Configured author, if it is not blank.
    pub fn author(&self) -> Option<&str> {
        self.author
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }
}

/// Load `CRAB_*` variables from a `.env` file in the current directory or
/// its parents.
///
/// A missing file is fine. A file that cannot be read or parsed is returned
/// so startup can report it.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
    ignore_missing(dotenvy::dotenv())
}

fn ignore_missing(
    loaded: Result<PathBuf, dotenvy::Error>,
) -> Result<Option<PathBuf>, dotenvy::Error> {
    match loaded {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
