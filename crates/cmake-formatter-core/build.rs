// Translations are embedded by rust_i18n at compile time; rebuild on edits.
fn main() {
    for locale in ["en", "es", "zh-CN"] {
        println!("cargo:rerun-if-changed=locales/{locale}.yml");
    }
}
