mod client;
mod completions;
mod coordinator;
mod diagnostics;
mod logging;
mod server;
mod session;

use anyhow::Result;
use camino::Utf8PathBuf;
use tower_lsp_server::LspService;
use tower_lsp_server::Server;

pub use completions::completions_at;
pub use completions::WELL_KNOWN_TAGS;
pub use coordinator::Coordinator;
pub use diagnostics::to_lsp_diagnostic;
pub use diagnostics::translate_for_file;
pub use server::XcsLanguageServer;

/// Run the language server over stdio until the client disconnects.
pub fn run(root: Utf8PathBuf) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        logging::init();

        let settings =
            xcsls_conf::Settings::new(&root).unwrap_or_else(|_| xcsls_conf::Settings::default());

        let stdin = tokio::io::stdin();
        let stdout = tokio::io::stdout();

        let (service, socket) = LspService::build(|client| {
            client::init_client(client);
            XcsLanguageServer::new(root, &settings)
        })
        .finish();

        Server::new(stdin, stdout, socket).serve(service).await;

        Ok(())
    })
}
