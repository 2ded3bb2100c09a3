//! Guard LSP - Language Server for the Guard policy language
//!
//! # How this works
//!
//! 1. This binary is started by the editor
//! 2. Communication happens over stdin/stdout using JSON-RPC
//! 3. The editor sends requests (initialize, textDocument/*, etc.)
//! 4. We respond with results or send notifications (diagnostics, etc.)
//!
//! # Why we use stderr for logging
//!
//! Since stdin/stdout are used for the LSP protocol, we CANNOT use
//! println!() for debugging. Instead, we use the `tracing` crate
//! which writes to stderr.

use guard_lsp::GuardLanguageServer;
use tower_lsp::{LspService, Server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Set RUST_LOG=debug to see debug messages
    // Example: RUST_LOG=guard_lsp=debug,guard_analyzer=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr) // stdout carries the protocol
        .init();

    tracing::info!("Starting guard-lsp server");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    // The Client handed to the closure is how we talk TO the editor
    let (service, socket) = LspService::build(GuardLanguageServer::new).finish();

    // Runs until the editor disconnects
    Server::new(stdin, stdout, socket).serve(service).await;

    tracing::info!("guard-lsp server stopped");
}
