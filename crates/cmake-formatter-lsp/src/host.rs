//! [`EditorHost`] over an LSP client connection.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use cmake_formatter_core::{EditorHost, FormatError, FormatResult, TextEdit};
use tokio::sync::RwLock;
use tower_lsp::Client;
use tower_lsp::lsp_types::{self, MessageType, ShowDocumentParams, Url, WorkspaceEdit};

/// A document the client has opened, keyed by its file path.
#[derive(Debug, Clone)]
struct OpenDocument {
    uri: Url,
    text: Arc<String>,
}

/// Editor primitives backed by LSP requests and the server's text mirror.
pub struct LspHost {
    client: Client,
    documents: RwLock<HashMap<PathBuf, OpenDocument>>,
    show_document_supported: AtomicBool,
}

impl LspHost {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: RwLock::new(HashMap::new()),
            show_document_supported: AtomicBool::new(false),
        }
    }

    pub(crate) fn set_show_document_supported(&self, supported: bool) {
        self.show_document_supported
            .store(supported, Ordering::Relaxed);
    }

    /// Record the full text of an open document.
    pub async fn update_document(&self, uri: Url, path: PathBuf, text: String) {
        let mut docs = self.documents.write().await;
        docs.insert(
            path,
            OpenDocument {
                uri,
                text: Arc::new(text),
            },
        );
    }

    pub async fn close_document(&self, path: &Path) {
        self.documents.write().await.remove(path);
    }

    /// Cached text for `path`, if the client has the document open.
    pub async fn cached_text(&self, path: &Path) -> Option<Arc<String>> {
        let docs = self.documents.read().await;
        docs.get(path).map(|doc| Arc::clone(&doc.text))
    }

    async fn uri_for(&self, path: &Path) -> FormatResult<Url> {
        if let Some(doc) = self.documents.read().await.get(path) {
            return Ok(doc.uri.clone());
        }
        Url::from_file_path(path).map_err(|()| FormatError::Host {
            message: format!("Cannot build a file URI for {}", path.display()),
        })
    }
}

/// Convert a core edit into its protocol form.
pub(crate) fn to_lsp_edit(edit: TextEdit) -> lsp_types::TextEdit {
    let position = |p: cmake_formatter_core::Position| lsp_types::Position {
        line: p.line,
        character: p.character,
    };
    lsp_types::TextEdit {
        range: lsp_types::Range {
            start: position(edit.range.start),
            end: position(edit.range.end),
        },
        new_text: edit.new_text,
    }
}

#[async_trait]
impl EditorHost for LspHost {
    async fn show_error(&self, message: &str) {
        self.client.show_message(MessageType::ERROR, message).await;
    }

    async fn show_warning(&self, message: &str) {
        self.client.show_message(MessageType::WARNING, message).await;
    }

    async fn show_info(&self, message: &str) {
        self.client.show_message(MessageType::INFO, message).await;
    }

    async fn document_text(&self, path: &Path) -> FormatResult<String> {
        if let Some(text) = self.cached_text(path).await {
            return Ok(text.as_str().to_string());
        }
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| FormatError::FileRead {
                path: path.to_path_buf(),
                source,
            })
    }

    async fn show_document(&self, path: &Path) -> FormatResult<()> {
        if !self.show_document_supported.load(Ordering::Relaxed) {
            return Ok(());
        }

        let uri = self.uri_for(path).await?;
        let shown = self
            .client
            .show_document(ShowDocumentParams {
                uri,
                external: None,
                take_focus: Some(true),
                selection: None,
            })
            .await
            .map_err(|e| FormatError::Host {
                message: e.to_string(),
            })?;

        if shown {
            Ok(())
        } else {
            Err(FormatError::Host {
                message: format!("Client could not show {}", path.display()),
            })
        }
    }

    async fn apply_edit(&self, path: &Path, edit: TextEdit) -> FormatResult<()> {
        let uri = self.uri_for(path).await?;
        let new_text = edit.new_text.clone();

        let mut changes = HashMap::new();
        changes.insert(uri.clone(), vec![to_lsp_edit(edit)]);
        let response = self
            .client
            .apply_edit(WorkspaceEdit {
                changes: Some(changes),
                ..Default::default()
            })
            .await
            .map_err(|e| FormatError::Host {
                message: e.to_string(),
            })?;

        if !response.applied {
            return Err(FormatError::Host {
                message: response
                    .failure_reason
                    .unwrap_or_else(|| "workspace edit was not applied".to_string()),
            });
        }

        // The client's didChange may arrive after the save below
        self.update_document(uri, path.to_path_buf(), new_text).await;
        Ok(())
    }

    async fn save_document(&self, path: &Path) -> FormatResult<()> {
        let Some(text) = self.cached_text(path).await else {
            return Err(FormatError::Host {
                message: format!("{} is not open", path.display()),
            });
        };
        tokio::fs::write(path, text.as_bytes())
            .await
            .map_err(|source| FormatError::FileWrite {
                path: path.to_path_buf(),
                source,
            })
    }
}
