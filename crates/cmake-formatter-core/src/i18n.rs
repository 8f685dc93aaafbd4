//! Locale selection for user-facing messages.
//!
//! Shared by the LSP server and the CLI so both resolve locales the same way:
//! an explicit choice first, then `CMAKE_FORMATTER_LOCALE`, then the host's
//! hint (the caller's fallback), then `LC_ALL` / `LANG`, then English.

/// Supported locale codes.
pub const SUPPORTED_LOCALES: &[&str] = &["en", "es", "zh-CN"];

/// Environment variable overriding the detected locale.
pub const LOCALE_ENV_VAR: &str = "CMAKE_FORMATTER_LOCALE";

/// Normalize a locale string to a supported code where possible.
///
/// - "en_US.UTF-8" -> "en"
/// - "es-MX" -> "es"
/// - "zh_CN" / "zh-Hans" -> "zh-CN"
///
/// Unsupported locales come back as their lowercase language code.
pub fn normalize_locale(locale: &str) -> String {
    let locale = locale.trim();
    let base = locale.split(['.', '@']).next().unwrap_or(locale);

    let lower = base.to_lowercase();
    if lower.starts_with("zh") && (lower.contains("cn") || lower.contains("hans")) {
        return "zh-CN".to_string();
    }

    let lang = base.split(['_', '-']).next().unwrap_or(base);
    SUPPORTED_LOCALES
        .iter()
        .find(|code| {
            base.eq_ignore_ascii_case(code)
                || code
                    .split('-')
                    .next()
                    .is_some_and(|code_lang| code_lang.eq_ignore_ascii_case(lang))
        })
        .map(|code| code.to_string())
        .unwrap_or_else(|| lang.to_lowercase())
}

pub fn is_supported(locale: &str) -> bool {
    SUPPORTED_LOCALES.contains(&locale)
}

/// Resolve the locale to use.
///
/// `explicit` is a user choice (CLI flag); `fallback` is a host hint such as
/// the locale an LSP client reports. Unsupported candidates are skipped.
pub fn resolve_locale(explicit: Option<&str>, fallback: Option<&str>) -> String {
    let env_locale = std::env::var(LOCALE_ENV_VAR).ok();
    let system_locale = std::env::var("LC_ALL")
        .ok()
        .or_else(|| std::env::var("LANG").ok());

    [
        explicit.map(str::to_string),
        env_locale,
        fallback.map(str::to_string),
        system_locale,
    ]
    .into_iter()
    .flatten()
    .map(|candidate| normalize_locale(&candidate))
    .find(|candidate| is_supported(candidate))
    .unwrap_or_else(|| "en".to_string())
}

/// Resolve and activate the locale for this process.
pub fn init_locale(explicit: Option<&str>, fallback: Option<&str>) -> String {
    let locale = resolve_locale(explicit, fallback);
    rust_i18n::set_locale(&locale);
    locale
}
