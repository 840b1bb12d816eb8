use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use dashmap::DashMap;
use tokio::task::JoinHandle;

/// Per-path trailing-edge debouncer. Each change event cancels the
/// path's pending timer and starts a new one; the action runs only when
/// the timer survives the full interval.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    timers: Arc<DashMap<Utf8PathBuf, JoinHandle<()>>>,
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            timers: Arc::new(DashMap::new()),
        }
    }

    /// Restart the timer for `path`; `action` runs after the delay unless
    /// another event arrives first.
    pub fn debounce<F, Fut>(&self, path: Utf8PathBuf, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if let Some((_, previous)) = self.timers.remove(&path) {
            previous.abort();
        }

        let delay = self.delay;
        let timers = Arc::clone(&self.timers);
        let timer_key = path.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            timers.remove(&timer_key);
            action().await;
        });
        self.timers.insert(path, handle);
    }

    /// Drop a pending timer without running its action.
    pub fn cancel(&self, path: &Utf8Path) {
        if let Some((_, handle)) = self.timers.remove(path) {
            handle.abort();
        }
    }

    #[must_use]
    pub fn pending(&self, path: &Utf8Path) -> bool {
        self.timers.contains_key(path)
    }
}
