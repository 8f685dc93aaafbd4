//! Format coordinator.
//!
//! Gates, executes and applies formatting operations against an
//! [`EditorHost`]. All guarded operations share one [`FormattingGuard`], so
//! at most one runs at a time process-wide. Save-triggered formatting goes
//! through a single shared [`Debouncer`].
//!
//! [`FormatCoordinator::provide_formatting_edits`] is deliberately not
//! guarded: it serves the editor's own "format document" request, which may
//! run while a guarded operation is in flight.

use crate::config::Settings;
use crate::debounce::{DEFAULT_DEBOUNCE_DELAY, Debouncer};
use crate::error::{FormatError, FormatResult};
use crate::file_types::is_cmake_file;
use crate::fs::{FileSystem, RealFileSystem};
use crate::guard::FormattingGuard;
use crate::host::{EditorHost, SettingsStore};
use crate::logging::Logger;
use crate::process::{ProcessRunner, TokioProcessRunner, probe_version, run_formatter};
use crate::text::TextEdit;
use rust_i18n::t;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Result of a guarded format operation.
#[derive(Debug)]
pub enum FormatOutcome {
    /// The document was formatted (and saved, when requested).
    Formatted,
    /// Another operation held the guard; nothing was done.
    Skipped,
    /// The operation ran and failed. The failure has already been reported.
    Failed(FormatError),
}

impl FormatOutcome {
    pub fn is_formatted(&self) -> bool {
        matches!(self, FormatOutcome::Formatted)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, FormatOutcome::Skipped)
    }
}

/// What a save notification led to.
#[derive(Debug)]
pub enum SaveAction {
    /// A debounced format was scheduled. The handle completes once the
    /// scheduled call has run or been superseded.
    Scheduled(JoinHandle<()>),
    /// The save came from a format operation on the same document.
    SkippedInProgress,
    SkippedDisabled,
    SkippedNotCMake,
    SkippedInvalidExecutable,
}

impl SaveAction {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, SaveAction::Scheduled(_))
    }
}

struct Inner {
    host: Arc<dyn EditorHost>,
    settings: Arc<dyn SettingsStore>,
    runner: Arc<dyn ProcessRunner>,
    fs: Arc<dyn FileSystem>,
    guard: FormattingGuard,
    debouncer: Debouncer,
}

/// Owns the formatting guard and mediates every format operation.
///
/// Cheap to clone; clones share the guard and the debouncer.
#[derive(Clone)]
pub struct FormatCoordinator {
    inner: Arc<Inner>,
}

impl FormatCoordinator {
    /// Coordinator using the real process runner and file system.
    pub fn new(host: Arc<dyn EditorHost>, settings: Arc<dyn SettingsStore>) -> Self {
        Self::builder(host, settings).build()
    }

    pub fn builder(
        host: Arc<dyn EditorHost>,
        settings: Arc<dyn SettingsStore>,
    ) -> FormatCoordinatorBuilder {
        FormatCoordinatorBuilder {
            host,
            settings,
            runner: None,
            fs: None,
            debounce_delay: DEFAULT_DEBOUNCE_DELAY,
        }
    }

    /// Whether `path` belongs to the CMake dialect.
    pub fn classify(&self, path: &Path) -> bool {
        is_cmake_file(path)
    }

    pub fn guard(&self) -> &FormattingGuard {
        &self.inner.guard
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.inner.debouncer
    }

    /// Format `path` in the editor, saving afterwards when `apply_on_save`.
    ///
    /// Silently skipped while any other guarded operation runs or while the
    /// same path is mid-format. Failures are reported to the user or logged
    /// here and never propagate.
    pub async fn format_document(&self, path: &Path, apply_on_save: bool) -> FormatOutcome {
        let Some(_ticket) = self.inner.guard.try_acquire(path) else {
            tracing::debug!(path = %path.display(), "Format already in progress, skipping");
            return FormatOutcome::Skipped;
        };

        let mut logger = Logger::default();
        match self.format_guarded(path, apply_on_save, &mut logger).await {
            Ok(()) => FormatOutcome::Formatted,
            Err(e) => {
                if e.is_user_facing() {
                    self.inner.host.show_error(&e.user_message()).await;
                }
                logger.error(&format!("Failed to apply cmake-format: {e}"));
                FormatOutcome::Failed(e)
            }
        }
    }

    async fn format_guarded(
        &self,
        path: &Path,
        apply_on_save: bool,
        logger: &mut Logger,
    ) -> FormatResult<()> {
        if !is_cmake_file(path) {
            return Err(FormatError::NotCMakeFile {
                path: path.to_path_buf(),
            });
        }

        let settings = self.inner.settings.load().await;
        *logger = Logger::from_settings(&settings);

        let executable = self.validate_executable(&settings)?;
        self.check_version(&executable, settings.required_version(), logger)
            .await;

        let formatted = run_formatter(
            self.inner.runner.as_ref(),
            &executable,
            &settings.arguments,
            path,
        )
        .await?;

        let host = &self.inner.host;
        host.show_document(path).await?;
        let current = host.document_text(path).await?;
        host.apply_edit(path, TextEdit::replace_all(&current, formatted))
            .await?;

        if apply_on_save {
            host.save_document(path).await?;
        }

        logger.info(&format!("Applied cmake-format to: {}", path.display()));
        Ok(())
    }

    /// Edits for the editor's native format request.
    ///
    /// Not mediated by the guard. Returns a single whole-document replacement
    /// on success and an empty list on any failure.
    pub async fn provide_formatting_edits(&self, path: &Path) -> Vec<TextEdit> {
        let settings = self.inner.settings.load().await;
        let logger = Logger::from_settings(&settings);

        let executable = match self.validate_executable(&settings) {
            Ok(executable) => executable,
            Err(e) => {
                self.inner.host.show_error(&e.user_message()).await;
                return Vec::new();
            }
        };

        let formatted = match run_formatter(
            self.inner.runner.as_ref(),
            &executable,
            &settings.arguments,
            path,
        )
        .await
        {
            Ok(formatted) => formatted,
            Err(e) => {
                self.inner.host.show_error(&e.user_message()).await;
                return Vec::new();
            }
        };

        match self.inner.host.document_text(path).await {
            Ok(current) => vec![TextEdit::replace_all(&current, formatted)],
            Err(e) => {
                logger.error(&format!(
                    "Cannot read {} for formatting: {e}",
                    path.display()
                ));
                Vec::new()
            }
        }
    }

    /// Handle a completed save of `path`.
    ///
    /// Saves caused by this coordinator's own formatting are ignored. A new
    /// schedule replaces any pending one, whichever document it was for.
    pub async fn on_did_save(&self, path: &Path) -> SaveAction {
        let settings = self.inner.settings.load().await;
        let logger = Logger::from_settings(&settings);

        if self.inner.guard.is_formatting(path) {
            logger.info(&format!(
                "Skipping format-on-save for {} (already formatting)",
                path.display()
            ));
            return SaveAction::SkippedInProgress;
        }

        logger.info(&format!("Save triggered for {}", path.display()));

        if !settings.format_on_save {
            return SaveAction::SkippedDisabled;
        }
        if !is_cmake_file(path) {
            return SaveAction::SkippedNotCMake;
        }
        if let Err(e) = self.validate_executable(&settings) {
            logger.warn(&format!("Format-on-save skipped: {e}"));
            return SaveAction::SkippedInvalidExecutable;
        }

        let coordinator = self.clone();
        let target = path.to_path_buf();
        let handle = self
            .inner
            .debouncer
            .schedule(path.to_path_buf(), move || async move {
                coordinator.format_document(&target, true).await;
            });
        SaveAction::Scheduled(handle)
    }

    /// Flip `formatOnSave` at global scope and report the new state.
    pub async fn toggle_format_on_save(&self) -> FormatResult<bool> {
        let enabled = !self.inner.settings.load().await.format_on_save;

        if let Err(e) = self.inner.settings.set_format_on_save(enabled).await {
            self.inner.host.show_error(&e.user_message()).await;
            return Err(e);
        }

        let message = if enabled {
            t!("messages.format_on_save_enabled")
        } else {
            t!("messages.format_on_save_disabled")
        };
        self.inner.host.show_info(&message).await;
        Ok(enabled)
    }

    /// "Apply format now" on the active document, without saving.
    pub async fn apply_format_command(&self, active: Option<&Path>) -> FormatOutcome {
        match active {
            Some(path) => self.format_document(path, false).await,
            None => {
                let err = FormatError::NoActiveDocument;
                self.inner.host.show_error(&err.user_message()).await;
                FormatOutcome::Failed(err)
            }
        }
    }

    fn validate_executable(&self, settings: &Settings) -> FormatResult<PathBuf> {
        let raw = settings.executable_path.as_str();
        if raw.trim().is_empty() || !self.inner.fs.exists(Path::new(raw)) {
            return Err(FormatError::InvalidExecutable {
                path: raw.to_string(),
            });
        }
        Ok(PathBuf::from(raw))
    }

    /// Best-effort version probe. Never fails the calling operation.
    async fn check_version(&self, executable: &Path, needed: Option<&str>, logger: &Logger) {
        let version = match probe_version(self.inner.runner.as_ref(), executable).await {
            Ok(version) => {
                logger.info(&format!("cmake-format version: \"{version}\""));
                Some(version)
            }
            Err(e) => {
                logger.error(&format!("Failed to get cmake-format version: {e}"));
                None
            }
        };

        if let Some(needed) = needed
            && version.as_deref() != Some(needed)
        {
            let actual = version.unwrap_or_else(|| t!("messages.version_unknown").into_owned());
            self.inner
                .host
                .show_warning(&t!(
                    "messages.version_mismatch",
                    expected = needed,
                    actual = actual
                ))
                .await;
        }
    }
}

pub struct FormatCoordinatorBuilder {
    host: Arc<dyn EditorHost>,
    settings: Arc<dyn SettingsStore>,
    runner: Option<Arc<dyn ProcessRunner>>,
    fs: Option<Arc<dyn FileSystem>>,
    debounce_delay: Duration,
}

impl FormatCoordinatorBuilder {
    /// Set the process runner used for the formatter.
    pub fn runner(&mut self, runner: Arc<dyn ProcessRunner>) -> &mut Self {
        self.runner = Some(runner);
        self
    }

    /// Set the filesystem abstraction used to check the executable.
    pub fn fs(&mut self, fs: Arc<dyn FileSystem>) -> &mut Self {
        self.fs = Some(fs);
        self
    }

    /// Override the save debounce window.
    pub fn debounce_delay(&mut self, delay: Duration) -> &mut Self {
        self.debounce_delay = delay;
        self
    }

    pub fn build(&mut self) -> FormatCoordinator {
        FormatCoordinator {
            inner: Arc::new(Inner {
                host: Arc::clone(&self.host),
                settings: Arc::clone(&self.settings),
                runner: self
                    .runner
                    .take()
                    .unwrap_or_else(|| Arc::new(TokioProcessRunner)),
                fs: self.fs.take().unwrap_or_else(|| Arc::new(RealFileSystem)),
                guard: FormattingGuard::new(),
                debouncer: Debouncer::new(self.debounce_delay),
            }),
        }
    }
}
