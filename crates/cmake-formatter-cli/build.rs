// Rebuild when locale files change so rust_i18n re-embeds translations.
fn main() {
    for locale in ["en", "es", "zh-CN"] {
        println!("cargo:rerun-if-changed=locales/{locale}.yml");
    }
}
