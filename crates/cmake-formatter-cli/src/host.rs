//! [`EditorHost`] for a terminal: documents are files, messages go to stderr.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use cmake_formatter_core::{EditorHost, FormatError, FormatResult, TextEdit};
use colored::Colorize;
use rust_i18n::t;

/// What saving a document does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// Write changed documents back to disk.
    Write,
    /// Leave files alone; only record which ones would change.
    Check,
}

#[derive(Debug, Clone)]
struct Buffer {
    on_disk: String,
    current: String,
}

/// A document whose saved content differs from what was on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedDocument {
    pub path: PathBuf,
    pub original: String,
    pub formatted: String,
}

/// Buffers files in memory while the coordinator edits them.
#[derive(Debug)]
pub struct TerminalHost {
    mode: SaveMode,
    buffers: Mutex<HashMap<PathBuf, Buffer>>,
    changed: Mutex<Vec<ChangedDocument>>,
}

impl TerminalHost {
    pub fn new(mode: SaveMode) -> Self {
        Self {
            mode,
            buffers: Mutex::new(HashMap::new()),
            changed: Mutex::new(Vec::new()),
        }
    }

    /// Documents changed by saves so far, in save order.
    pub fn changed(&self) -> Vec<ChangedDocument> {
        self.changed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn buffer(&self, path: &Path) -> Option<Buffer> {
        self.buffers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(path)
            .cloned()
    }

    async fn load(&self, path: &Path) -> FormatResult<Buffer> {
        if let Some(buffer) = self.buffer(path) {
            return Ok(buffer);
        }

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| FormatError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
        let buffer = Buffer {
            on_disk: text.clone(),
            current: text,
        };
        self.buffers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.to_path_buf(), buffer.clone());
        Ok(buffer)
    }

    fn store(&self, path: &Path, buffer: Buffer) {
        self.buffers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.to_path_buf(), buffer);
    }
}

#[async_trait]
impl EditorHost for TerminalHost {
    async fn show_error(&self, message: &str) {
        eprintln!("{}: {}", t!("cli.error_label").red().bold(), message);
    }

    async fn show_warning(&self, message: &str) {
        eprintln!("{}: {}", t!("cli.warning_label").yellow().bold(), message);
    }

    async fn show_info(&self, message: &str) {
        eprintln!("{message}");
    }

    async fn document_text(&self, path: &Path) -> FormatResult<String> {
        Ok(self.load(path).await?.current)
    }

    async fn show_document(&self, path: &Path) -> FormatResult<()> {
        self.load(path).await.map(|_| ())
    }

    async fn apply_edit(&self, path: &Path, edit: TextEdit) -> FormatResult<()> {
        let mut buffer = self.load(path).await?;
        buffer.current = edit.apply_to(&buffer.current);
        self.store(path, buffer);
        Ok(())
    }

    async fn save_document(&self, path: &Path) -> FormatResult<()> {
        let buffer = self.load(path).await?;
        if buffer.current == buffer.on_disk {
            return Ok(());
        }

        if self.mode == SaveMode::Write {
            tokio::fs::write(path, buffer.current.as_bytes())
                .await
                .map_err(|source| FormatError::FileWrite {
                    path: path.to_path_buf(),
                    source,
                })?;
        }

        self.changed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ChangedDocument {
                path: path.to_path_buf(),
                original: buffer.on_disk.clone(),
                formatted: buffer.current.clone(),
            });
        self.store(
            path,
            Buffer {
                on_disk: buffer.current.clone(),
                current: buffer.current,
            },
        );
        Ok(())
    }
}
