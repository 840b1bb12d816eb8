use std::sync::Arc;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use dashmap::DashMap;

/// In-memory overlay of open documents. The IDE's buffer contents win
/// over the file system while a document is open.
#[derive(Debug, Default)]
pub struct Buffers {
    inner: DashMap<Utf8PathBuf, Arc<str>>,
}

impl Buffers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, path: Utf8PathBuf, content: Arc<str>) {
        self.inner.insert(path, content);
    }

    #[must_use]
    pub fn get(&self, path: &Utf8Path) -> Option<Arc<str>> {
        self.inner.get(path).map(|entry| Arc::clone(&entry))
    }

    pub fn remove(&self, path: &Utf8Path) {
        self.inner.remove(path);
    }

    /// Buffer content if open, otherwise the file on disk.
    #[must_use]
    pub fn read(&self, path: &Utf8Path) -> Option<Arc<str>> {
        if let Some(content) = self.get(path) {
            return Some(content);
        }
        std::fs::read_to_string(path).ok().map(Arc::from)
    }
}
