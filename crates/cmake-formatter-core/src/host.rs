//! Capabilities the coordinator consumes from the editor it runs in.
//!
//! The LSP server and the CLI each implement [`EditorHost`] and
//! [`SettingsStore`]; the coordinator never talks to an editor directly.

use crate::config::Settings;
use crate::error::FormatResult;
use crate::text::TextEdit;
use async_trait::async_trait;
use std::path::Path;
use std::sync::RwLock;

/// Editor primitives used by format operations.
#[async_trait]
pub trait EditorHost: Send + Sync {
    /// Show a blocking error message to the user.
    async fn show_error(&self, message: &str);

    /// Show a non-blocking warning.
    async fn show_warning(&self, message: &str);

    async fn show_info(&self, message: &str);

    /// Current text of the document, including unsaved changes.
    async fn document_text(&self, path: &Path) -> FormatResult<String>;

    /// Make the document visible in an editor before it is edited.
    async fn show_document(&self, path: &Path) -> FormatResult<()>;

    /// Apply `edit` to the document as one atomic change.
    async fn apply_edit(&self, path: &Path, edit: TextEdit) -> FormatResult<()>;

    /// Persist the document.
    async fn save_document(&self, path: &Path) -> FormatResult<()>;
}

/// Source of [`Settings`] snapshots.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read the current settings. Called once per operation.
    async fn load(&self) -> Settings;

    /// Persist `formatOnSave` at global scope.
    async fn set_format_on_save(&self, enabled: bool) -> FormatResult<()>;
}

/// In-memory [`SettingsStore`].
#[derive(Debug, Default)]
pub struct MemorySettings {
    settings: RwLock<Settings>,
}

impl MemorySettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }

    pub fn replace(&self, settings: Settings) {
        *self.settings.write().unwrap_or_else(|e| e.into_inner()) = settings;
    }

    pub fn snapshot(&self) -> Settings {
        self.settings
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn load(&self) -> Settings {
        self.snapshot()
    }

    async fn set_format_on_save(&self, enabled: bool) -> FormatResult<()> {
        self.settings
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .format_on_save = enabled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_settings_round_trip() {
        let store = MemorySettings::new(Settings {
            executable_path: "/bin/cmake-format".to_string(),
            ..Default::default()
        });

        assert!(!store.load().await.format_on_save);
        store.set_format_on_save(true).await.unwrap();

        let loaded = store.load().await;
        assert!(loaded.format_on_save);
        assert_eq!(loaded.executable_path, "/bin/cmake-format");
    }

    #[tokio::test]
    async fn test_memory_settings_replace() {
        let store = MemorySettings::default();
        store.replace(Settings {
            arguments: vec!["-c".to_string(), "style.py".to_string()],
            ..Default::default()
        });
        assert_eq!(store.load().await.arguments, vec!["-c", "style.py"]);
    }
}
