//! # Process-wide backend instance.
//!
//! [`BackendCell`] holds at most one [`Backend`] and initializes it exactly once with
//! double-checked locking:
//!
//! ```text
//! get_or_init(init)
//!   ├─► slot.load_full()  Some ─► return            (lock-free fast path)
//!   └─► lock(init_lock)
//!         ├─► slot.load_full()  Some ─► return      (lost the race)
//!         └─► init() ─► slot.store(Some) ─► return  (negotiation runs here, once)
//! ```
//!
//! The crate keeps one cell for the whole process behind [`Backend::instance`].
//! Prefer building a backend explicitly and passing the `Arc` around; the global is for
//! code that cannot thread it through.
//!
//! `reset` exists only for tests (`cfg(test)` or the `test-util` feature).

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use parking_lot::Mutex;

use crate::core::backend::Backend;
use crate::core::builder::BackendBuilder;

/// Lazily initialized, shareable backend slot.
pub struct BackendCell {
    slot: ArcSwapOption<Backend>,
    init_lock: Mutex<()>,
}

impl BackendCell {
    /// Creates an empty cell (usable in `static`).
    pub const fn new() -> Self {
        Self {
            slot: ArcSwapOption::const_empty(),
            init_lock: parking_lot::const_mutex(()),
        }
    }

    /// Returns the backend if it was already initialized.
    pub fn get(&self) -> Option<Arc<Backend>> {
        self.slot.load_full()
    }

    /// Returns the backend, running `init` if this is the first call.
    ///
    /// Concurrent first callers block on one lock; exactly one of them runs `init`.
    pub fn get_or_init<F>(&self, init: F) -> Arc<Backend>
    where
        F: FnOnce() -> Arc<Backend>,
    {
        if let Some(b) = self.slot.load_full() {
            return b;
        }

        let _guard = self.init_lock.lock();
        if let Some(b) = self.slot.load_full() {
            return b;
        }

        let backend = init();
        self.slot.store(Some(Arc::clone(&backend)));
        backend
    }

    /// Forgets the stored backend so the next `get_or_init` renegotiates.
    ///
    /// Holders of the previous `Arc<Backend>` keep using it.
    #[cfg(any(test, feature = "test-util"))]
    pub fn reset(&self) {
        let _guard = self.init_lock.lock();
        self.slot.store(None);
    }
}

impl Default for BackendCell {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: BackendCell = BackendCell::new();

impl Backend {
    /// Returns the process-wide backend, building it with `init` on first use.
    ///
    /// Later calls ignore `init` and return the same instance without renegotiating.
    pub fn instance<F>(init: F) -> Arc<Backend>
    where
        F: FnOnce() -> BackendBuilder,
    {
        GLOBAL.get_or_init(|| init().build())
    }

    /// Returns the process-wide backend if it exists.
    pub fn try_instance() -> Option<Arc<Backend>> {
        GLOBAL.get()
    }

    /// Test-only: clears the process-wide backend.
    #[cfg(any(test, feature = "test-util"))]
    pub fn reset_instance() {
        GLOBAL.reset();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;

    use super::*;
    use crate::config::Config;
    use crate::error::ProviderError;
    use crate::provider::{FactoryFn, FactoryRef, ProviderRef};
    use crate::testing::MockProvider;
    use crate::version::ProtocolVersion;

    /// Factory that counts how many times negotiation constructed it.
    fn counted(builds: Arc<AtomicUsize>) -> FactoryRef {
        FactoryFn::arc("extensions", move || -> Result<ProviderRef, ProviderError> {
            builds.fetch_add(1, Ordering::SeqCst);
            Ok(MockProvider::new("extensions", Some(ProtocolVersion::new(2, 0))))
        })
    }

    #[test]
    fn test_concurrent_first_callers_negotiate_once() {
        let cell = Arc::new(BackendCell::new());
        let builds = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let (cell, builds, barrier) = (cell.clone(), builds.clone(), barrier.clone());
                thread::spawn(move || {
                    barrier.wait();
                    cell.get_or_init(|| {
                        Backend::builder(Config::default())
                            .with_factory(counted(builds))
                            .build()
                    })
                })
            })
            .collect();

        let backends: Vec<Arc<Backend>> = handles
            .into_iter()
            .map(|h| h.join().expect("thread"))
            .collect();
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(backends.iter().all(|b| Arc::ptr_eq(b, &backends[0])));
    }

    #[test]
    fn test_reset_allows_renegotiation() {
        let cell = BackendCell::new();
        let builds = Arc::new(AtomicUsize::new(0));
        let make = || {
            Backend::builder(Config::default())
                .with_factory(counted(builds.clone()))
                .build()
        };

        let first = cell.get_or_init(make);
        let again = cell.get_or_init(make);
        assert!(Arc::ptr_eq(&first, &again));

        cell.reset();
        assert!(cell.get().is_none());
        let fresh = cell.get_or_init(make);
        assert!(!Arc::ptr_eq(&first, &fresh));
        assert_eq!(builds.load(Ordering::SeqCst), 2);
        // The old instance stays usable for whoever still holds it.
        assert!(first.has_provider());
    }

    #[test]
    fn test_global_instance() {
        Backend::reset_instance();
        let a = Backend::instance(|| Backend::builder(Config::default()));
        let b = Backend::instance(|| panic!("must not renegotiate"));
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Backend::try_instance().is_some());
        Backend::reset_instance();
        assert!(Backend::try_instance().is_none());
    }
}
