use std::sync::Arc;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use dashmap::DashMap;
use xcsls_source::SourceMap;

/// Shadow state for one source file: where its derived file lives, the
/// derived text, and the map between them. Replaced wholesale on every
/// successful retransform.
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub target_path: Utf8PathBuf,
    pub transformed_content: String,
    pub source_maps: SourceMap,
}

/// Concurrent map of shadow state keyed by normalized source path.
/// Entries are `Arc`-swapped, so readers always see a complete snapshot
/// or the absence of one, never a partial update.
#[derive(Debug, Default)]
pub struct MetadataStore {
    inner: DashMap<Utf8PathBuf, Arc<FileMetadata>>,
}

impl MetadataStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, source: Utf8PathBuf, metadata: FileMetadata) {
        self.inner.insert(source, Arc::new(metadata));
    }

    #[must_use]
    pub fn get(&self, source: &Utf8Path) -> Option<Arc<FileMetadata>> {
        self.inner.get(source).map(|entry| Arc::clone(&entry))
    }

    /// Look up shadow state by the derived file's path. Diagnostics from
    /// the downstream compiler arrive in derived coordinates.
    #[must_use]
    pub fn get_by_target(&self, target: &Utf8Path) -> Option<(Utf8PathBuf, Arc<FileMetadata>)> {
        self.inner.iter().find_map(|entry| {
            if entry.value().target_path == target {
                Some((entry.key().clone(), Arc::clone(entry.value())))
            } else {
                None
            }
        })
    }

    pub fn remove(&self, source: &Utf8Path) -> Option<Arc<FileMetadata>> {
        self.inner.remove(source).map(|(_, metadata)| metadata)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
