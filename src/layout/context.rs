//! # Window context identity.
//!
//! [`WindowContext`] identifies the UI container a subscription observes. Equality is
//! **identity**: clones of one context are equal, two contexts created separately are
//! not, whatever their labels say.
//!
//! A context may carry the platform handle it stands for; providers retrieve it with
//! [`WindowContext::handle`].
//!
//! ## Example
//! ```rust
//! use windowvisor::WindowContext;
//!
//! let a = WindowContext::new("main");
//! let b = WindowContext::new("main");
//! assert_eq!(a, a.clone());
//! assert_ne!(a, b);
//! ```

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Global counter used for diagnostic ids.
static CONTEXT_SEQ: AtomicU64 = AtomicU64::new(1);

struct ContextInner {
    id: u64,
    label: Arc<str>,
    handle: Option<Box<dyn Any + Send + Sync>>,
}

/// Opaque, identity-compared window key.
#[derive(Clone)]
pub struct WindowContext {
    inner: Arc<ContextInner>,
}

impl WindowContext {
    /// Creates a new context with a diagnostic label.
    pub fn new(label: impl Into<Arc<str>>) -> Self {
        Self::build(label.into(), None)
    }

    /// Creates a new context that owns a platform handle.
    pub fn with_handle<T>(label: impl Into<Arc<str>>, handle: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self::build(label.into(), Some(Box::new(handle)))
    }

    fn build(label: Arc<str>, handle: Option<Box<dyn Any + Send + Sync>>) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                id: CONTEXT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
                label,
                handle,
            }),
        }
    }

    /// Process-unique id (stable for the lifetime of the context).
    #[inline]
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Diagnostic label given at construction.
    #[inline]
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// Returns the platform handle if one of type `T` was attached.
    pub fn handle<T: Any>(&self) -> Option<&T> {
        self.inner.handle.as_ref()?.downcast_ref::<T>()
    }
}

impl PartialEq for WindowContext {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for WindowContext {}

impl Hash for WindowContext {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for WindowContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WindowContext(#{} {:?})", self.inner.id, self.inner.label)
    }
}

impl fmt::Display for WindowContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.inner.label, self.inner.id)
    }
}
