use std::{
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::{task::JoinHandle, time};

type Sink<T> = Arc<dyn Fn(T) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Trailing-edge debounce: every call restarts the quiet window, and only the last
/// value handed in before the window elapses reaches the sink.
///
/// Once the window has elapsed the sink runs as its own task, so a later call can
/// never cut a running sink short; it only schedules the next one.
pub struct DebounceGate<T> {
    quiet: Duration,
    sink: Sink<T>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> DebounceGate<T> {
    pub fn new<F, Fut>(quiet: Duration, sink: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            quiet,
            sink: Arc::new(move |value| -> Pin<Box<dyn Future<Output = ()> + Send>> {
                Box::pin(sink(value))
            }),
            pending: Mutex::new(None),
        }
    }

    pub fn trigger(&self, value: T) {
        let sink = Arc::clone(&self.sink);
        let quiet = self.quiet;

        let mut pending = self.lock_pending();
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(tokio::spawn(async move {
            time::sleep(quiet).await;
            tokio::spawn(sink(value));
        }));
    }

    /// Drop a value that is still waiting out its quiet window.
    pub fn cancel(&self) {
        if let Some(previous) = self.lock_pending().take() {
            previous.abort();
        }
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<T> Drop for DebounceGate<T> {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(handle) = pending.take() {
                handle.abort();
            }
        }
    }
}
