//! LSP backend implementation for cmake-formatter.
//!
//! Implements the Language Server Protocol using tower-lsp, exposing the
//! format coordinator to the client as a formatting provider, a save hook
//! and two commands.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cmake_formatter_core::{
    DOCUMENT_PATTERNS, FormatCoordinator, ProcessRunner, TokioProcessRunner,
};
use serde_json::Value;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::host::{LspHost, to_lsp_edit};
use crate::settings::ClientSettings;

mod events;
mod helpers;

/// Formats the document named by the first argument (a URI) without saving.
pub const APPLY_FORMAT_COMMAND: &str = "cmake-formatter.applyCmakeFormat";

/// Flips `formatOnSave` for the whole server.
pub const TOGGLE_FORMAT_ON_SAVE_COMMAND: &str = "cmake-formatter.toggleFormatOnSave";

const FORMATTING_REGISTRATION_ID: &str = "cmake-formatter-formatting";

/// LSP backend that routes client requests to the format coordinator.
pub struct Backend {
    client: Client,
    host: Arc<LspHost>,
    settings: Arc<ClientSettings>,
    coordinator: FormatCoordinator,
    dynamic_formatting: AtomicBool,
}

impl Backend {
    /// Create a new backend instance with the given client connection.
    pub fn new(client: Client) -> Self {
        Self::with_runner(client, Arc::new(TokioProcessRunner))
    }

    /// Create a backend that launches the formatter through `runner`.
    pub fn with_runner(client: Client, runner: Arc<dyn ProcessRunner>) -> Self {
        let host = Arc::new(LspHost::new(client.clone()));
        let settings = Arc::new(ClientSettings::new(client.clone()));
        let coordinator = FormatCoordinator::builder(host.clone(), settings.clone())
            .runner(runner)
            .build();

        Self {
            client,
            host,
            settings,
            coordinator,
            dynamic_formatting: AtomicBool::new(false),
        }
    }

    fn formatting_registration() -> Registration {
        let document_selector = DOCUMENT_PATTERNS
            .iter()
            .map(|pattern| DocumentFilter {
                language: None,
                scheme: Some("file".to_string()),
                pattern: Some((*pattern).to_string()),
            })
            .collect();
        let options = TextDocumentRegistrationOptions {
            document_selector: Some(document_selector),
        };

        Registration {
            id: FORMATTING_REGISTRATION_ID.to_string(),
            method: "textDocument/formatting".to_string(),
            register_options: serde_json::to_value(options).ok(),
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let locale = crate::locale::init_from_client(params.locale.as_deref());
        tracing::debug!("Using locale {locale}");

        if let Some(options) = params.initialization_options {
            self.settings.update_pushed(options);
        }

        let capabilities = &params.capabilities;
        let pull_supported = capabilities
            .workspace
            .as_ref()
            .and_then(|w| w.configuration)
            .unwrap_or(false);
        let show_document_supported = capabilities
            .window
            .as_ref()
            .and_then(|w| w.show_document.as_ref())
            .is_some_and(|s| s.support);
        let dynamic_formatting = capabilities
            .text_document
            .as_ref()
            .and_then(|t| t.formatting.as_ref())
            .and_then(|f| f.dynamic_registration)
            .unwrap_or(false);

        self.settings.set_pull_supported(pull_supported);
        self.host.set_show_document_supported(show_document_supported);
        self.dynamic_formatting
            .store(dynamic_formatting, Ordering::Relaxed);

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::FULL),
                        save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                            include_text: Some(false),
                        })),
                        ..Default::default()
                    },
                )),
                // Registered in `initialized` with the CMake document selector
                document_formatting_provider: if dynamic_formatting {
                    None
                } else {
                    Some(OneOf::Left(true))
                },
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: vec![
                        APPLY_FORMAT_COMMAND.to_string(),
                        TOGGLE_FORMAT_ON_SAVE_COMMAND.to_string(),
                    ],
                    work_done_progress_options: Default::default(),
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "cmake-formatter-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        if self.dynamic_formatting.load(Ordering::Relaxed)
            && let Err(e) = self
                .client
                .register_capability(vec![Self::formatting_registration()])
                .await
        {
            self.client
                .log_message(
                    MessageType::WARNING,
                    format!("Failed to register formatting provider: {e}"),
                )
                .await;
        }

        self.client
            .log_message(MessageType::INFO, "cmake-formatter-lsp initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        self.coordinator.debouncer().cancel();
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.handle_did_open(params).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        self.handle_did_change(params).await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        self.handle_did_save(params).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.handle_did_close(params).await;
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.settings.update_pushed(params.settings);
    }

    async fn formatting(&self, params: DocumentFormattingParams) -> Result<Option<Vec<TextEdit>>> {
        let Some(path) = helpers::file_path(&params.text_document.uri) else {
            return Ok(None);
        };
        if !self.coordinator.classify(&path) {
            return Ok(None);
        }

        let edits = self.coordinator.provide_formatting_edits(&path).await;
        Ok(Some(edits.into_iter().map(to_lsp_edit).collect()))
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        match params.command.as_str() {
            APPLY_FORMAT_COMMAND => {
                let target: Option<PathBuf> = helpers::command_target(&params.arguments);
                let outcome = self.coordinator.apply_format_command(target.as_deref()).await;
                Ok(Some(Value::Bool(outcome.is_formatted())))
            }
            TOGGLE_FORMAT_ON_SAVE_COMMAND => {
                match self.coordinator.toggle_format_on_save().await {
                    Ok(enabled) => Ok(Some(Value::Bool(enabled))),
                    Err(_) => Ok(None),
                }
            }
            other => Err(tower_lsp::jsonrpc::Error::invalid_params(format!(
                "Unknown command: {other}"
            ))),
        }
    }
}
