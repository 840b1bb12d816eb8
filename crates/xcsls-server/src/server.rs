use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use camino::Utf8PathBuf;
use tokio::sync::RwLock;
use tower_lsp_server::jsonrpc::Result as LspResult;
use tower_lsp_server::lsp_types::CompletionOptions;
use tower_lsp_server::lsp_types::CompletionParams;
use tower_lsp_server::lsp_types::CompletionResponse;
use tower_lsp_server::lsp_types::DidChangeTextDocumentParams;
use tower_lsp_server::lsp_types::DidCloseTextDocumentParams;
use tower_lsp_server::lsp_types::DidOpenTextDocumentParams;
use tower_lsp_server::lsp_types::Hover;
use tower_lsp_server::lsp_types::HoverParams;
use tower_lsp_server::lsp_types::HoverProviderCapability;
use tower_lsp_server::lsp_types::InitializeParams;
use tower_lsp_server::lsp_types::InitializeResult;
use tower_lsp_server::lsp_types::InitializedParams;
use tower_lsp_server::lsp_types::Position;
use tower_lsp_server::lsp_types::ServerCapabilities;
use tower_lsp_server::lsp_types::ServerInfo;
use tower_lsp_server::lsp_types::TextDocumentSyncCapability;
use tower_lsp_server::lsp_types::TextDocumentSyncKind;
use tower_lsp_server::lsp_types::Uri;
use tower_lsp_server::LanguageServer;
use xcsls_source::ByteOffset;
use xcsls_source::LineCol;
use xcsls_source::LineIndex;

use rustc_hash::FxHashMap;
use xcsls_compiler::CompilerDiagnostic;

use crate::client;
use crate::completions::completions_at;
use crate::coordinator::Coordinator;
use crate::diagnostics::translate_for_file;
use crate::session::Session;

const SERVER_NAME: &str = "XCS Language Server";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct XcsLanguageServer {
    session: Arc<RwLock<Session>>,
    coordinator: Arc<Coordinator>,
}

impl XcsLanguageServer {
    #[must_use]
    pub fn new(root: Utf8PathBuf, settings: &xcsls_conf::Settings) -> Self {
        let generator = xcsls_markup::GeneratorConfig {
            factory: settings.factory.clone(),
            method: settings.method.clone(),
            indent_width: settings.indent_width,
        };
        let coordinator = Arc::new(Coordinator::new(
            root.clone(),
            generator,
            Duration::from_millis(settings.debounce_ms),
        ));

        // Successful transformations clear any stale diagnostics for the
        // file; translated compiler diagnostics arrive separately.
        coordinator.subscribe(Arc::new(|payload| {
            let uri_string = xcsls_workspace::paths::path_to_uri(&payload.file);
            if let Ok(uri) = Uri::from_str(&uri_string) {
                client::publish_diagnostics(uri, Vec::new(), None);
            }
        }));

        let mut session = Session::default();
        *session.root_mut() = Some(root.clone());
        *session.settings_mut() = settings.clone();
        *session.suppressions_mut() = xcsls_conf::load_suppressions(&root);

        Self {
            session: Arc::new(RwLock::new(session)),
            coordinator,
        }
    }

    /// Entry point for diagnostics reported by the downstream compiler
    /// against derived files: translate each batch back into original
    /// coordinates and publish it for the owning source file.
    pub async fn publish_compiler_diagnostics(&self, diagnostics: Vec<CompilerDiagnostic>) {
        let suppressions = self
            .with_session(|session| session.suppressions().clone())
            .await;

        let mut by_target: FxHashMap<Utf8PathBuf, Vec<CompilerDiagnostic>> = FxHashMap::default();
        for diagnostic in diagnostics {
            by_target
                .entry(diagnostic.file.clone())
                .or_default()
                .push(diagnostic);
        }

        for (target, batch) in by_target {
            let Some((source_path, metadata)) =
                self.coordinator.store().get_by_target(&target)
            else {
                continue;
            };
            let Some(source) = self.coordinator.buffers().read(&source_path) else {
                continue;
            };
            let translated = translate_for_file(&batch, &metadata, &source, &suppressions);
            let uri_string = xcsls_workspace::paths::path_to_uri(&source_path);
            if let Ok(uri) = Uri::from_str(&uri_string) {
                client::publish_diagnostics(uri, translated, None);
            }
        }
    }

    pub async fn with_session<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        let session = self.session.read().await;
        f(&session)
    }

    pub async fn with_session_mut<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut session = self.session.write().await;
        f(&mut session)
    }

    fn document_path(uri: &Uri) -> Option<Utf8PathBuf> {
        xcsls_workspace::paths::uri_to_path(uri.as_str())
    }
}

impl LanguageServer for XcsLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> LspResult<InitializeResult> {
        self.with_session_mut(|session| {
            *session.client_capabilities_mut() = Some(params.capabilities);
        })
        .await;

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(true),
                    ..CompletionOptions::default()
                }),
                ..ServerCapabilities::default()
            },
            server_info: Some(ServerInfo {
                name: SERVER_NAME.to_string(),
                version: Some(SERVER_VERSION.to_string()),
            }),
            offset_encoding: None,
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        let (root, call_shape) = self
            .with_session(|session| {
                (
                    session.root().cloned(),
                    format!("{}.{}", session.settings().factory, session.settings().method),
                )
            })
            .await;
        match root {
            Some(root) => client::log_info(format!(
                "{SERVER_NAME} ready ({call_shape}); workspace at {root}"
            )),
            None => client::log_info(format!("{SERVER_NAME} ready ({call_shape})")),
        }
    }

    async fn shutdown(&self) -> LspResult<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let Some(path) = Self::document_path(&params.text_document.uri) else {
            client::log_error(format!(
                "unsupported document URI: {}",
                params.text_document.uri.as_str()
            ));
            return;
        };
        self.coordinator
            .document_changed(path, Arc::from(params.text_document.text.as_str()));
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let Some(path) = Self::document_path(&params.text_document.uri) else {
            return;
        };
        // Full-document sync: the last change carries the whole text.
        let Some(change) = params.content_changes.into_iter().last() else {
            return;
        };
        self.coordinator
            .document_changed(path, Arc::from(change.text.as_str()));
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        if let Some(path) = Self::document_path(&params.text_document.uri) {
            self.coordinator.buffers().remove(&path);
        }
    }

    async fn completion(&self, params: CompletionParams) -> LspResult<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let Some(path) = Self::document_path(&uri) else {
            return Ok(None);
        };
        let Some(source) = self.coordinator.buffers().read(&path) else {
            return Ok(None);
        };

        let offset = offset_of(&source, position);
        Ok(Some(CompletionResponse::Array(completions_at(
            &source, offset,
        ))))
    }

    async fn hover(&self, _params: HoverParams) -> LspResult<Option<Hover>> {
        Ok(None)
    }
}

fn offset_of(source: &str, position: Position) -> usize {
    let index = LineIndex::from_text(source);
    index
        .to_offset(LineCol::new(position.line, position.character))
        .map_or(source.len(), |offset: ByteOffset| {
            (offset.offset() as usize).min(source.len())
        })
}
