//! Locale detection and initialization for the cmake-formatter CLI.
//!
//! Locale resolution order:
//! 1. `--locale` CLI flag (highest priority)
//! 2. `CMAKE_FORMATTER_LOCALE` environment variable
//! 3. System locale detection via `sys-locale`
//! 4. `LC_ALL` / `LANG` environment variable
//! 5. Fallback to "en" (English)

use cmake_formatter_core::i18n::{init_locale, is_supported, normalize_locale};
use colored::Colorize;
use rust_i18n::t;

/// Initialize the locale for the process and return the one in effect.
///
/// An unsupported `--locale` value is reported and ignored.
pub fn init(cli_locale: Option<&str>) -> String {
    let explicit = cli_locale.filter(|l| {
        let supported = is_supported(&normalize_locale(l));
        if !supported {
            eprintln!(
                "{}: {}",
                t!("cli.warning_label").yellow().bold(),
                t!("cli.unsupported_locale", locale = l)
            );
        }
        supported
    });

    init_locale(explicit, sys_locale::get_locale().as_deref())
}
