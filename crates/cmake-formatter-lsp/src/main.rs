#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && (args[1] == "--version" || args[1] == "-V") {
        println!("cmake-formatter-lsp {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    cmake_formatter_lsp::init_tracing();
    cmake_formatter_lsp::locale::init_from_env();

    if let Err(e) = cmake_formatter_lsp::start_server().await {
        tracing::error!("LSP server error: {e}");
        eprintln!("LSP server error: {e}");
        std::process::exit(1);
    }
}
