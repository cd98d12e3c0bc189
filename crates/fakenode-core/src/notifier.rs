//! Workload change notification
//!
//! A single observer is told about every committed workload transition. The
//! observer is registered once at startup (or replaced later); before that,
//! transitions are dropped without error.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::trace;

use crate::types::Workload;

/// Callback invoked with a read-only snapshot of a changed workload
pub type WorkloadCallback = Arc<dyn Fn(&Workload) + Send + Sync>;

/// Holds the currently registered observer
#[derive(Default)]
pub struct Notifier {
    callback: RwLock<Option<WorkloadCallback>>,
}

impl Notifier {
    /// Create a notifier with no observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the observer, replacing any previous one
    pub fn register<F>(&self, callback: F)
    where
        F: Fn(&Workload) + Send + Sync + 'static,
    {
        self.register_arc(Arc::new(callback));
    }

    /// Register an already shared observer, replacing any previous one
    pub fn register_arc(&self, callback: WorkloadCallback) {
        *self.callback.write() = Some(callback);
    }

    /// Whether an observer is registered
    pub fn is_registered(&self) -> bool {
        self.callback.read().is_some()
    }

    /// Deliver a snapshot to the observer, if any
    pub fn notify(&self, workload: &Workload) {
        // Clone the handle so the observer runs without holding the slot lock
        let callback = self.callback.read().clone();

        match callback {
            Some(callback) => callback(workload),
            None => trace!(workload = %workload.key(), "No observer registered, dropping notification"),
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("registered", &self.is_registered())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_notify_without_observer_is_dropped() {
        let notifier = Notifier::new();
        assert!(!notifier.is_registered());
        notifier.notify(&Workload::new("default", "w1"));
    }

    #[test]
    fn test_notify_delivers_snapshot() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let notifier = Notifier::new();

        let sink = Arc::clone(&seen);
        notifier.register(move |w: &Workload| sink.lock().push(w.key()));

        notifier.notify(&Workload::new("default", "w1"));
        notifier.notify(&Workload::new("default", "w2"));

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].name, "w1");
        assert_eq!(seen[1].name, "w2");
    }

    #[test]
    fn test_last_registration_wins() {
        let first = Arc::new(Mutex::new(0u32));
        let second = Arc::new(Mutex::new(0u32));
        let notifier = Notifier::new();

        let sink = Arc::clone(&first);
        notifier.register(move |_: &Workload| *sink.lock() += 1);
        notifier.notify(&Workload::new("default", "w1"));

        let sink = Arc::clone(&second);
        notifier.register(move |_: &Workload| *sink.lock() += 1);
        notifier.notify(&Workload::new("default", "w1"));
        notifier.notify(&Workload::new("default", "w2"));

        assert_eq!(*first.lock(), 1);
        assert_eq!(*second.lock(), 2);
    }

    #[test]
    fn test_observer_may_reregister_from_callback() {
        let notifier = Arc::new(Notifier::new());
        let count = Arc::new(Mutex::new(0u32));

        let inner = Arc::clone(&notifier);
        let sink = Arc::clone(&count);
        notifier.register(move |_: &Workload| {
            *sink.lock() += 1;
            inner.register(|_: &Workload| {});
        });

        notifier.notify(&Workload::new("default", "w1"));
        notifier.notify(&Workload::new("default", "w1"));
        assert_eq!(*count.lock(), 1);
    }
}
