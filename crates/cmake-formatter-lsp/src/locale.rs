//! Locale initialization for the LSP server.
//!
//! At startup only the environment is known. Once the client sends
//! `initialize`, its reported locale is used unless `CMAKE_FORMATTER_LOCALE`
//! overrides it. The OS locale from `sys-locale` is the last resort.

use cmake_formatter_core::i18n::init_locale;

/// Initialize locale from environment variables.
pub fn init_from_env() -> String {
    init_locale(None, sys_locale::get_locale().as_deref())
}

/// Re-initialize locale using the client's `initialize` locale as a hint.
pub fn init_from_client(client_locale: Option<&str>) -> String {
    let hint = client_locale
        .map(str::to_string)
        .or_else(sys_locale::get_locale);
    init_locale(None, hint.as_deref())
}

/// Mutex to serialize tests that modify the process-global locale.
#[cfg(test)]
pub(crate) static LOCALE_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
