//! Settings resolution for the CLI.
//!
//! An explicit `--config` file wins; otherwise the nearest
//! `.cmake-formatter.toml` above the working directory is used. Command-line
//! overrides are applied last.

use std::path::{Path, PathBuf};

use anyhow::Context;
use cmake_formatter_core::{LogLevel, Settings};

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub executable: Option<PathBuf>,
    pub needed_version: Option<String>,
    pub log_level: Option<LogLevel>,
    pub arguments: Vec<String>,
}

/// Build the settings snapshot for a run started in `cwd`.
pub fn resolve(
    config: Option<&Path>,
    cwd: &Path,
    overrides: &Overrides,
) -> anyhow::Result<Settings> {
    let config_path = match config {
        Some(path) => Some(path.to_path_buf()),
        None => Settings::discover(cwd),
    };

    let mut settings = match &config_path {
        Some(path) => {
            tracing::debug!("Loading settings from {}", path.display());
            Settings::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?
        }
        None => Settings::default(),
    };

    if let Some(executable) = &overrides.executable {
        settings.executable_path = executable.to_string_lossy().into_owned();
    }
    if let Some(version) = &overrides.needed_version {
        settings.needed_version = Some(version.clone());
    }
    if let Some(level) = overrides.log_level {
        settings.log_level = level;
    }
    if !overrides.arguments.is_empty() {
        settings.arguments = overrides.arguments.clone();
    }

    Ok(settings)
}
