//! Level-gated logging for format operations.
//!
//! A [`Logger`] is built from the settings snapshot of the operation it
//! serves, so the configured `logLevel` applies without any global state.
//! Lines that pass the threshold are emitted through `tracing`; the
//! subscriber installed by the binary decides where they end up.

use crate::config::{LogLevel, Settings};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Logger {
    threshold: LogLevel,
}

impl Logger {
    pub fn new(threshold: LogLevel) -> Self {
        Self { threshold }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.log_level)
    }

    pub fn threshold(&self) -> LogLevel {
        self.threshold
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.threshold.allows(level)
    }

    pub fn info(&self, message: &str) {
        if self.enabled(LogLevel::Info) {
            tracing::info!(target: "cmake_formatter", "{message}");
        }
    }

    pub fn warn(&self, message: &str) {
        if self.enabled(LogLevel::Warn) {
            tracing::warn!(target: "cmake_formatter", "{message}");
        }
    }

    pub fn error(&self, message: &str) {
        if self.enabled(LogLevel::Error) {
            tracing::error!(target: "cmake_formatter", "{message}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logger_is_info() {
        let logger = Logger::default();
        assert_eq!(logger.threshold(), LogLevel::Info);
        assert!(logger.enabled(LogLevel::Info));
    }

    #[test]
    fn test_error_threshold_suppresses_info_and_warn() {
        let logger = Logger::new(LogLevel::Error);
        assert!(logger.enabled(LogLevel::Error));
        assert!(!logger.enabled(LogLevel::Warn));
        assert!(!logger.enabled(LogLevel::Info));
    }

    #[test]
    fn test_from_settings_reads_log_level() {
        let settings = Settings {
            log_level: LogLevel::Warn,
            ..Default::default()
        };
        let logger = Logger::from_settings(&settings);
        assert!(logger.enabled(LogLevel::Warn));
        assert!(!logger.enabled(LogLevel::Info));
    }
}
