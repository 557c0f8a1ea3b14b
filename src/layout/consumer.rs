//! # Layout consumers.
//!
//! A [`LayoutConsumer`] is the sink a subscription delivers [`LayoutSignal`]s into.
//! Consumers are shared as [`ConsumerRef`] (`Arc<dyn LayoutConsumer>`); the backend
//! identifies them by **pointer identity** of that allocation, so unregistering requires
//! the same `Arc` (or a clone of it) that was registered.
//!
//! [`ConsumerFn`] wraps a closure.
//!
//! ## Example
//! ```rust
//! use windowvisor::{ConsumerFn, ConsumerRef, LayoutSignal};
//!
//! let c: ConsumerRef = ConsumerFn::arc("printer", |signal: LayoutSignal| {
//!     println!("{} features", signal.len());
//! });
//! assert_eq!(c.name(), "printer");
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use crate::layout::LayoutSignal;

/// Sink for layout signals.
///
/// `accept` runs on whatever thread the subscription's executor chooses.
/// Panics are not caught by the backend; that is up to the executor.
pub trait LayoutConsumer: Send + Sync + 'static {
    /// Receives one signal.
    fn accept(&self, signal: LayoutSignal);

    /// Name used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Shared consumer handle.
pub type ConsumerRef = Arc<dyn LayoutConsumer>;

/// Function-backed consumer.
#[derive(Debug)]
pub struct ConsumerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ConsumerFn<F> {
    /// Creates a new function-backed consumer.
    ///
    /// Prefer [`ConsumerFn::arc`] when you immediately need a [`ConsumerRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the consumer and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> LayoutConsumer for ConsumerFn<F>
where
    F: Fn(LayoutSignal) + Send + Sync + 'static,
{
    fn accept(&self, signal: LayoutSignal) {
        (self.f)(signal)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Identity comparison on the shared allocation (vtable pointers are ignored).
#[inline]
pub(crate) fn same_consumer(a: &ConsumerRef, b: &ConsumerRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_identity_follows_allocation() {
        let a: ConsumerRef = ConsumerFn::arc("a", |_s: LayoutSignal| {});
        let a2 = Arc::clone(&a);
        let b: ConsumerRef = ConsumerFn::arc("a", |_s: LayoutSignal| {});
        assert!(same_consumer(&a, &a2));
        assert!(!same_consumer(&a, &b));
    }

    #[test]
    fn test_closure_receives_signal() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let c = ConsumerFn::new("count", move |s: LayoutSignal| {
            h.fetch_add(s.len() + 1, Ordering::SeqCst);
        });
        c.accept(LayoutSignal::empty());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
