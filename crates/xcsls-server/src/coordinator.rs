use std::sync::Arc;
use std::sync::RwLock;
use std::time::Duration;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use xcsls_compiler::transform_source;
use xcsls_compiler::FileTransformedPayload;
use xcsls_markup::GeneratorConfig;
use xcsls_workspace::paths;
use xcsls_workspace::remove_derived;
use xcsls_workspace::write_derived;
use xcsls_workspace::Buffers;
use xcsls_workspace::Debouncer;
use xcsls_workspace::FileMetadata;
use xcsls_workspace::MetadataStore;
use xcsls_workspace::ProcessingGate;

pub type TransformObserver = Arc<dyn Fn(&FileTransformedPayload) + Send + Sync>;

/// Passive wiring between change events and the compile core.
///
/// "File changed" debounces, passes the gate, transforms, persists, and
/// notifies observers; "file removed" deletes the derived counterpart.
/// Per-file work is independent: no two tasks share mutable state for
/// the same path.
pub struct Coordinator {
    root: Utf8PathBuf,
    generator: GeneratorConfig,
    store: Arc<MetadataStore>,
    buffers: Arc<Buffers>,
    gate: Arc<ProcessingGate>,
    debouncer: Debouncer,
    observers: Arc<RwLock<Vec<TransformObserver>>>,
}

impl Coordinator {
    #[must_use]
    pub fn new(root: Utf8PathBuf, generator: GeneratorConfig, debounce: Duration) -> Self {
        Self {
            root,
            generator,
            store: Arc::new(MetadataStore::new()),
            buffers: Arc::new(Buffers::new()),
            gate: Arc::new(ProcessingGate::new()),
            debouncer: Debouncer::new(debounce),
            observers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn subscribe(&self, observer: TransformObserver) {
        if let Ok(mut observers) = self.observers.write() {
            observers.push(observer);
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<MetadataStore> {
        &self.store
    }

    #[must_use]
    pub fn buffers(&self) -> &Arc<Buffers> {
        &self.buffers
    }

    #[must_use]
    pub fn gate_in_flight(&self, path: &Utf8Path) -> bool {
        self.gate.is_in_flight(path)
    }

    /// Entry point for `didOpen`/`didChange`: record the buffer and
    /// schedule a transformation.
    pub fn document_changed(&self, path: Utf8PathBuf, content: Arc<str>) {
        self.buffers.set(path.clone(), content);
        self.file_changed(path);
    }

    /// Entry point for raw change events. Events for paths that are
    /// InFlight or not transformable sources are dropped here.
    pub fn file_changed(&self, path: Utf8PathBuf) {
        if !paths::is_source_path(&path) {
            return;
        }
        if self.gate.is_in_flight(&path) {
            tracing::debug!(%path, "change event dropped; transformation in flight");
            return;
        }

        let root = self.root.clone();
        let generator = self.generator.clone();
        let store = Arc::clone(&self.store);
        let buffers = Arc::clone(&self.buffers);
        let gate = Arc::clone(&self.gate);
        let observers = Arc::clone(&self.observers);
        self.debouncer.debounce(path.clone(), move || async move {
            transform_one(&root, &generator, &store, &buffers, &gate, &observers, &path);
        });
    }

    /// Entry point for workspace removals.
    pub fn file_removed(&self, path: &Utf8Path) {
        self.debouncer.cancel(path);
        self.buffers.remove(path);

        let target = self
            .store
            .remove(path)
            .map(|metadata| metadata.target_path.clone())
            .or_else(|| paths::derived_path(&self.root, path));
        if let Some(target) = target {
            if let Err(err) = remove_derived(&target) {
                tracing::error!(%target, %err, "failed to remove derived file");
            }
        }
    }
}

/// One whole-file transformation, executed to completion. The gate stays
/// raised until the derived file has been written (or the attempt
/// failed), which is what breaks the write→change feedback loop.
fn transform_one(
    root: &Utf8Path,
    generator: &GeneratorConfig,
    store: &MetadataStore,
    buffers: &Buffers,
    gate: &ProcessingGate,
    observers: &RwLock<Vec<TransformObserver>>,
    path: &Utf8Path,
) {
    if !gate.try_begin(path) {
        return;
    }

    let Some(source) = buffers.read(path) else {
        tracing::warn!(%path, "source unreadable; skipping transformation");
        gate.finish(path);
        return;
    };

    let (content, source_maps) = transform_source(&source, generator);

    let Some(target) = paths::derived_path(root, path) else {
        tracing::warn!(%path, "source is outside the workspace root");
        gate.finish(path);
        return;
    };

    let payload = FileTransformedPayload {
        file: path.to_path_buf(),
        content,
        source_maps,
    };

    store.insert(
        path.to_path_buf(),
        FileMetadata {
            target_path: target.clone(),
            transformed_content: payload.content.clone(),
            source_maps: payload.source_maps.clone(),
        },
    );

    if let Err(err) = write_derived(&target, &payload.content) {
        // Discard this result; the gate opens so the next change event
        // can retry.
        tracing::error!(%path, %target, %err, "failed to write derived file");
        gate.finish(path);
        return;
    }

    if let Ok(observers) = observers.read() {
        for observer in observers.iter() {
            observer(&payload);
        }
    }

    gate.finish(path);
}
