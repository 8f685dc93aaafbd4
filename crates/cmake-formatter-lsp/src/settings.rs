//! [`SettingsStore`] backed by the client's `cmake-formatter` section.

use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use cmake_formatter_core::{CONFIG_SECTION, FormatResult, Settings, SettingsStore};
use serde_json::Value;
use tower_lsp::Client;
use tower_lsp::lsp_types::ConfigurationItem;

/// Reads settings from the client on every load.
///
/// Clients that support `workspace/configuration` are asked each time.
/// Otherwise the last value pushed through `initializationOptions` or
/// `workspace/didChangeConfiguration` is used. The format-on-save toggle
/// is a server-wide override on top of either source.
pub struct ClientSettings {
    client: Client,
    pull_supported: AtomicBool,
    pushed: RwLock<Value>,
    format_on_save_override: RwLock<Option<bool>>,
}

impl ClientSettings {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            pull_supported: AtomicBool::new(false),
            pushed: RwLock::new(Value::Null),
            format_on_save_override: RwLock::new(None),
        }
    }

    pub(crate) fn set_pull_supported(&self, supported: bool) {
        self.pull_supported.store(supported, Ordering::Relaxed);
    }

    /// Store settings pushed by the client.
    ///
    /// A push is an explicit configuration change, so it clears the toggle
    /// override.
    pub fn update_pushed(&self, value: Value) {
        *self.pushed.write().unwrap_or_else(|e| e.into_inner()) = value;
        *self
            .format_on_save_override
            .write()
            .unwrap_or_else(|e| e.into_inner()) = None;
    }

    fn pushed(&self) -> Value {
        self.pushed
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn format_on_save_override(&self) -> Option<bool> {
        *self
            .format_on_save_override
            .read()
            .unwrap_or_else(|e| e.into_inner())
    }

    async fn pull(&self) -> Option<Value> {
        if !self.pull_supported.load(Ordering::Relaxed) {
            return None;
        }

        let items = vec![ConfigurationItem {
            scope_uri: None,
            section: Some(CONFIG_SECTION.to_string()),
        }];
        match self.client.configuration(items).await {
            Ok(values) => values.into_iter().next().filter(|v| !v.is_null()),
            Err(e) => {
                tracing::warn!("workspace/configuration failed: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl SettingsStore for ClientSettings {
    async fn load(&self) -> Settings {
        let value = match self.pull().await {
            Some(value) => value,
            None => self.pushed(),
        };

        let mut settings = Settings::from_json(value).unwrap_or_else(|e| {
            tracing::warn!("Ignoring invalid {CONFIG_SECTION} settings: {e}");
            Settings::default()
        });
        if let Some(enabled) = self.format_on_save_override() {
            settings.format_on_save = enabled;
        }
        settings
    }

    async fn set_format_on_save(&self, enabled: bool) -> FormatResult<()> {
        *self
            .format_on_save_override
            .write()
            .unwrap_or_else(|e| e.into_inner()) = Some(enabled);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmake_formatter_core::LogLevel;
    use serde_json::json;
    use tower_lsp::LspService;
    use tower_lsp::lsp_types::{InitializeParams, InitializeResult};

    struct StubServer {
        settings: ClientSettings,
    }

    #[tower_lsp::async_trait]
    impl tower_lsp::LanguageServer for StubServer {
        async fn initialize(
            &self,
            _: InitializeParams,
        ) -> tower_lsp::jsonrpc::Result<InitializeResult> {
            Ok(InitializeResult::default())
        }

        async fn shutdown(&self) -> tower_lsp::jsonrpc::Result<()> {
            Ok(())
        }
    }

    fn service() -> (LspService<StubServer>, tower_lsp::ClientSocket) {
        LspService::new(|client| StubServer {
            settings: ClientSettings::new(client),
        })
    }

    #[tokio::test]
    async fn test_defaults_without_any_configuration() {
        let (service, _socket) = service();
        let settings = service.inner().settings.load().await;
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn test_pushed_section_is_used() {
        let (service, _socket) = service();
        let store = &service.inner().settings;
        store.update_pushed(json!({
            "cmake-formatter": {
                "formatOnSave": true,
                "executablePath": "/usr/bin/cmake-format",
                "arguments": ["-c", "style.py"],
                "logLevel": "warn"
            }
        }));

        let settings = store.load().await;
        assert!(settings.format_on_save);
        assert_eq!(settings.executable_path, "/usr/bin/cmake-format");
        assert_eq!(settings.arguments, vec!["-c", "style.py"]);
        assert_eq!(settings.log_level, LogLevel::Warn);
    }

    #[tokio::test]
    async fn test_invalid_settings_fall_back_to_defaults() {
        let (service, _socket) = service();
        let store = &service.inner().settings;
        store.update_pushed(json!({ "executablePath": 42 }));

        assert_eq!(store.load().await, Settings::default());
    }

    #[tokio::test]
    async fn test_unset_key_keeps_remaining_settings() {
        let (service, _socket) = service();
        let store = &service.inner().settings;
        store.update_pushed(json!({
            "formatOnSave": true,
            "executablePath": null,
            "arguments": ["-c", "style.py"],
            "neededVersion": "0.6.13"
        }));

        let settings = store.load().await;
        assert!(settings.format_on_save);
        assert!(settings.executable_path.is_empty());
        assert_eq!(settings.arguments, vec!["-c", "style.py"]);
        assert_eq!(settings.required_version(), Some("0.6.13"));
    }

    #[tokio::test]
    async fn test_toggle_override_applies_until_next_push() {
        let (service, _socket) = service();
        let store = &service.inner().settings;
        store.update_pushed(json!({ "formatOnSave": false }));

        store.set_format_on_save(true).await.unwrap();
        assert!(store.load().await.format_on_save);

        store.update_pushed(json!({ "formatOnSave": false }));
        assert!(!store.load().await.format_on_save);
    }

    #[tokio::test]
    async fn test_pull_failure_uses_pushed_value() {
        let (service, _socket) = service();
        let store = &service.inner().settings;
        // Requests fail before the client is initialized
        store.set_pull_supported(true);
        store.update_pushed(json!({ "executablePath": "/opt/cmake-format" }));

        assert_eq!(store.load().await.executable_path, "/opt/cmake-format");
    }
}
