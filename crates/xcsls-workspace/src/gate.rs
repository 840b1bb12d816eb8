use camino::Utf8Path;
use camino::Utf8PathBuf;
use dashmap::DashMap;

/// Per-path Idle/InFlight flag. Writing a derived file raises a change
/// notification for it; the gate keeps that notification from
/// re-triggering a transformation of the source.
#[derive(Debug, Default)]
pub struct ProcessingGate {
    in_flight: DashMap<Utf8PathBuf, ()>,
}

impl ProcessingGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the path to InFlight. Returns `false` when it already was,
    /// in which case the caller must drop the event.
    pub fn try_begin(&self, path: &Utf8Path) -> bool {
        use dashmap::mapref::entry::Entry;

        match self.in_flight.entry(path.to_path_buf()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(());
                true
            }
        }
    }

    #[must_use]
    pub fn is_in_flight(&self, path: &Utf8Path) -> bool {
        self.in_flight.contains_key(path)
    }

    /// Back to Idle; called once the transformation's output has been
    /// observed.
    pub fn finish(&self, path: &Utf8Path) {
        self.in_flight.remove(path);
    }
}
