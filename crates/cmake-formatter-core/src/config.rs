//! Formatter settings
//!
//! [`Settings`] is a read-only snapshot of the `cmake-formatter` configuration
//! namespace. Hosts produce a fresh snapshot for every operation; nothing in
//! the core caches it.
//!
//! The same shape is accepted from editor JSON (camelCase keys) and from
//! `.cmake-formatter.toml` files (camelCase or snake_case keys):
//!
//! ```toml
//! executablePath = "/usr/local/bin/cmake-format"
//! arguments = ["--line-width", "100", "-"]
//! neededVersion = "0.6.13"
//! formatOnSave = true
//! logLevel = "warn"
//! ```

use crate::error::{FormatError, FormatResult};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;

/// Configuration namespace used by editors (`cmake-formatter.formatOnSave`, ...).
pub const CONFIG_SECTION: &str = "cmake-formatter";

/// File name looked up by hosts that read settings from disk.
pub const CONFIG_FILE_NAME: &str = ".cmake-formatter.toml";

/// Verbosity of the coordinator's own log lines.
///
/// Ordered from least to most verbose; a line is emitted when its level is
/// less than or equal to the configured one.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
}

impl LogLevel {
    /// Parse a level name. Unknown names yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            _ => None,
        }
    }

    /// Whether a line at `level` passes this threshold.
    pub fn allows(self, level: LogLevel) -> bool {
        level <= self
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Unknown level names fall back to the default instead of failing the whole
// snapshot.
impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(LogLevel::parse(&raw).unwrap_or_default())
    }
}

/// Snapshot of the formatter settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Format CMake files automatically after they are saved.
    #[serde(alias = "format_on_save", deserialize_with = "null_as_default")]
    #[schemars(description = "Format CMake files automatically after they are saved")]
    pub format_on_save: bool,

    /// Path to the `cmake-format` executable. Empty means unset.
    #[serde(alias = "executable_path", deserialize_with = "null_as_default")]
    #[schemars(description = "Absolute path to the cmake-format executable")]
    pub executable_path: String,

    /// Extra arguments passed before the document path, in order.
    #[serde(deserialize_with = "null_as_default")]
    #[schemars(description = "Extra arguments passed to cmake-format before the file path")]
    pub arguments: Vec<String>,

    /// Version string `cmake-format --version` is expected to print.
    #[serde(alias = "needed_version")]
    #[schemars(
        description = "Expected output of `cmake-format --version`; a warning is shown on mismatch"
    )]
    pub needed_version: Option<String>,

    #[serde(alias = "log_level", deserialize_with = "null_as_default")]
    #[schemars(description = "Verbosity of formatter log output: error, warn or info")]
    pub log_level: LogLevel,
}

// Editors report unset keys as `null`; such a key takes its default and the
// rest of the snapshot is kept.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Settings {
    /// Parse settings from a JSON value as sent by editors.
    ///
    /// Accepts either the bare section object or an object wrapping it under
    /// [`CONFIG_SECTION`]. `null` yields the defaults.
    pub fn from_json(value: serde_json::Value) -> FormatResult<Self> {
        let value = match value {
            serde_json::Value::Null => return Ok(Self::default()),
            serde_json::Value::Object(mut map) if map.contains_key(CONFIG_SECTION) => {
                map.remove(CONFIG_SECTION).unwrap_or_default()
            }
            other => other,
        };

        if value.is_null() {
            return Ok(Self::default());
        }

        serde_json::from_value(value).map_err(|e| FormatError::Settings {
            message: e.to_string(),
        })
    }

    /// Parse settings from TOML text.
    pub fn from_toml_str(content: &str) -> FormatResult<Self> {
        toml::from_str(content).map_err(|e| FormatError::Settings {
            message: e.to_string(),
        })
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> FormatResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| FormatError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    /// Find the nearest [`CONFIG_FILE_NAME`] in `start` or its ancestors.
    pub fn discover(start: &Path) -> Option<std::path::PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// Configured version requirement, with empty strings treated as unset.
    pub fn required_version(&self) -> Option<&str> {
        self.needed_version
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Generate the JSON schema describing these settings.
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(Settings);
        serde_json::to_value(&schema).unwrap_or(serde_json::Value::Null)
    }
}
