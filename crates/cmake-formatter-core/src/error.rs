//! Error types for format operations

use rust_i18n::t;
use std::path::PathBuf;
use thiserror::Error;

pub type FormatResult<T> = Result<T, FormatError>;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Not a CMake file: {path}")]
    NotCMakeFile { path: PathBuf },

    #[error("Invalid cmake-format path: \"{path}\"")]
    InvalidExecutable { path: String },

    #[error("Failed to start {program}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The formatter ran but reported failure. `details` holds its stderr,
    /// or a description of the exit status when stderr was empty.
    #[error("cmake-format failed: {details}")]
    ProcessFailed { details: String },

    #[error("Formatter output is not valid UTF-8")]
    InvalidOutput(#[source] std::string::FromUtf8Error),

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Editor rejected the operation: {message}")]
    Host { message: String },

    #[error("Invalid settings: {message}")]
    Settings { message: String },

    #[error("No active document")]
    NoActiveDocument,
}

impl FormatError {
    /// Text shown to the user when this error aborts an operation.
    pub fn user_message(&self) -> String {
        match self {
            FormatError::NotCMakeFile { .. } => t!("messages.not_cmake_file").into_owned(),
            FormatError::NoActiveDocument => t!("messages.no_active_editor").into_owned(),
            FormatError::InvalidExecutable { path } => {
                t!("messages.invalid_executable", path = path).into_owned()
            }
            FormatError::Spawn { source, .. } => {
                t!("messages.formatter_error", details = source.to_string()).into_owned()
            }
            FormatError::ProcessFailed { details } => {
                t!("messages.formatter_error", details = details).into_owned()
            }
            FormatError::InvalidOutput(e) => {
                t!("messages.formatter_error", details = e.to_string()).into_owned()
            }
            other => t!("messages.operation_failed", details = other.to_string()).into_owned(),
        }
    }

    /// Whether the failure is shown to the user, as opposed to only logged.
    ///
    /// Classification, executable and subprocess failures are shown; editor
    /// and file failures while applying the result are logged.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            FormatError::NotCMakeFile { .. }
                | FormatError::InvalidExecutable { .. }
                | FormatError::Spawn { .. }
                | FormatError::ProcessFailed { .. }
                | FormatError::InvalidOutput(_)
                | FormatError::NoActiveDocument
        )
    }

    /// True for failures raised before any subprocess was started.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            FormatError::NotCMakeFile { .. }
                | FormatError::InvalidExecutable { .. }
                | FormatError::Settings { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_failure_message_keeps_stderr_verbatim() {
        let err = FormatError::ProcessFailed {
            details: "syntax error line 4".to_string(),
        };
        assert!(err.user_message().contains("syntax error line 4"));
        assert!(err.to_string().contains("syntax error line 4"));
    }

    #[test]
    fn test_invalid_executable_message_names_path() {
        let err = FormatError::InvalidExecutable {
            path: "/opt/missing/cmake-format".to_string(),
        };
        assert!(err.user_message().contains("/opt/missing/cmake-format"));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_spawn_error_uses_io_message() {
        let err = FormatError::Spawn {
            program: PathBuf::from("cmake-format"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.user_message().contains("denied"));
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_user_facing_split() {
        assert!(FormatError::NotCMakeFile {
            path: PathBuf::from("a.txt")
        }
        .is_user_facing());
        assert!(FormatError::NoActiveDocument.is_user_facing());
        assert!(!FormatError::Host {
            message: "x".to_string()
        }
        .is_user_facing());
    }

    #[test]
    fn test_host_error_falls_back_to_display() {
        let err = FormatError::Host {
            message: "edit not applied".to_string(),
        };
        assert!(err.user_message().contains("edit not applied"));
    }
}
