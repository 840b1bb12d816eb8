use std::fmt::Display;
use std::sync::Arc;
use std::sync::OnceLock;

use tower_lsp_server::lsp_types::Diagnostic;
use tower_lsp_server::lsp_types::MessageType;
use tower_lsp_server::lsp_types::Uri;
use tower_lsp_server::Client;

static CLIENT: OnceLock<Arc<Client>> = OnceLock::new();

pub fn init_client(client: Client) {
    let client_arc = Arc::new(client);
    CLIENT
        .set(client_arc)
        .expect("client should only be initialized once");
}

fn get_client() -> Option<Arc<Client>> {
    CLIENT.get().cloned()
}

/// Generates a fire-and-forget notification function that spawns an
/// async task calling the client method; nothing waits on the result.
macro_rules! notify {
    ($name:ident, $($param:ident: $type:ty),*) => {
        pub fn $name($($param: $type),*) {
            if let Some(client) = get_client() {
                tokio::spawn(async move {
                    client.$name($($param),*).await;
                });
            }
        }
    };
}

notify!(log_message, message_type: MessageType, message: String);
notify!(publish_diagnostics, uri: Uri, diagnostics: Vec<Diagnostic>, version: Option<i32>);

/// Log to both the LSP client and the tracing side-channel.
pub fn log_info(message: impl Display) {
    let message = message.to_string();
    tracing::info!("{message}");
    log_message(MessageType::INFO, message);
}

pub fn log_error(message: impl Display) {
    let message = message.to_string();
    tracing::error!("{message}");
    log_message(MessageType::ERROR, message);
}
