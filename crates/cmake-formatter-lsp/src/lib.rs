//! # cmake-formatter-lsp
//!
//! Language Server Protocol front-end for `cmake-format`.
//!
//! Lets any LSP editor (VS Code, Neovim, Helix, Zed, ...) format CMake files
//! through the `cmake-formatter-core` coordinator.
//!
//! ## Features
//!
//! - `textDocument/formatting` for `CMakeLists.txt` and `*.cmake`
//! - Format-on-save, debounced, driven by `textDocument/didSave`
//! - Commands `cmake-formatter.applyCmakeFormat` and
//!   `cmake-formatter.toggleFormatOnSave`
//! - Settings read from the `cmake-formatter` configuration section
//!
//! ## Usage
//!
//! ```bash
//! cmake-formatter-lsp
//! ```
//!
//! The server communicates over stdin/stdout using the LSP protocol.

mod backend;
mod host;
pub mod locale;
mod settings;

pub use backend::{APPLY_FORMAT_COMMAND, Backend, TOGGLE_FORMAT_ON_SAVE_COMMAND};
pub use host::LspHost;
pub use settings::ClientSettings;

use tower_lsp::{LspService, Server};

/// Install the tracing subscriber for the server process.
///
/// Logs go to stderr; stdout carries the protocol. `RUST_LOG` overrides the
/// default `info` filter.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

/// Start the LSP server.
///
/// This function sets up stdin/stdout communication and runs the server
/// until shutdown is requested.
///
/// # Errors
///
/// Returns an error if the server fails to start or encounters a fatal error.
pub async fn start_server() -> anyhow::Result<()> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;
    Ok(())
}
