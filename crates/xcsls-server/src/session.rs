use camino::Utf8PathBuf;
use rustc_hash::FxHashSet;
use tower_lsp_server::lsp_types::ClientCapabilities;
use xcsls_conf::Settings;

/// Mutable per-connection state behind the server's `RwLock`.
#[derive(Default)]
pub struct Session {
    settings: Settings,
    suppressions: FxHashSet<String>,
    root: Option<Utf8PathBuf>,
    client_capabilities: Option<ClientCapabilities>,
}

impl Session {
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    #[must_use]
    pub fn suppressions(&self) -> &FxHashSet<String> {
        &self.suppressions
    }

    pub fn suppressions_mut(&mut self) -> &mut FxHashSet<String> {
        &mut self.suppressions
    }

    #[must_use]
    pub fn root(&self) -> Option<&Utf8PathBuf> {
        self.root.as_ref()
    }

    pub fn root_mut(&mut self) -> &mut Option<Utf8PathBuf> {
        &mut self.root
    }

    pub fn client_capabilities_mut(&mut self) -> &mut Option<ClientCapabilities> {
        &mut self.client_capabilities
    }
}
