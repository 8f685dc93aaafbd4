//! # cmake-formatter-core
//!
//! Coordination between an editor and the external `cmake-format`
//! executable.
//!
//! - Detects CMake files (`CMakeLists.txt`, `*.cmake`)
//! - Runs `cmake-format` on them and applies the output as one edit
//! - Serializes format operations with a process-wide guard
//! - Debounces format-on-save
//!
//! Editors plug in through [`EditorHost`] and [`SettingsStore`]:
//!
//! ```ignore
//! let coordinator = FormatCoordinator::new(host, settings);
//! coordinator.format_document(Path::new("CMakeLists.txt"), false).await;
//! ```

rust_i18n::i18n!("locales", fallback = "en");

pub mod config;
pub mod coordinator;
pub mod debounce;
pub mod error;
pub mod file_types;
pub mod fs;
pub mod guard;
pub mod host;
pub mod i18n;
pub mod logging;
pub mod process;
pub mod text;

pub use config::{CONFIG_FILE_NAME, CONFIG_SECTION, LogLevel, Settings};
pub use coordinator::{FormatCoordinator, FormatCoordinatorBuilder, FormatOutcome, SaveAction};
pub use debounce::{DEFAULT_DEBOUNCE_DELAY, Debouncer};
pub use error::{FormatError, FormatResult};
pub use file_types::{DOCUMENT_PATTERNS, FileType, detect_file_type, is_cmake_file};
pub use fs::{FileSystem, RealFileSystem};
pub use guard::{FormattingGuard, GuardTicket};
pub use host::{EditorHost, MemorySettings, SettingsStore};
pub use logging::Logger;
pub use process::{ProcessOutput, ProcessRunner, TokioProcessRunner};
pub use text::{Position, TextEdit, TextRange, full_range, offset_at, position_at};
