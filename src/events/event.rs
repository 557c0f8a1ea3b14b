//! # Diagnostics emitted by the layout backend.
//!
//! The [`EventKind`] enum classifies events across four categories:
//! - **Negotiation**: per-candidate rejections and the final outcome
//! - **Registry**: subscriptions added/removed, contexts hooked/unhooked
//! - **Dispatch**: executor queue overflow and consumer panics
//! - **Observers**: overflow/panic of diagnostics observers themselves
//!
//! The [`Event`] struct carries optional metadata such as candidate name,
//! context, consumer, version and refcount.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use windowvisor::{Event, EventKind, ProtocolVersion};
//!
//! let ev = Event::new(EventKind::ProviderSelected)
//!     .with_candidate("extensions")
//!     .with_version(ProtocolVersion::new(2, 0));
//!
//! assert_eq!(ev.kind, EventKind::ProviderSelected);
//! assert_eq!(ev.candidate.as_deref(), Some("extensions"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::version::ProtocolVersion;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of backend events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Negotiation ===
    /// A candidate provider was skipped.
    ///
    /// Sets:
    /// - `candidate`: factory name
    /// - `reason`: `"<label>: <message>"`
    /// - `version`: reported version, when known
    CandidateRejected,

    /// A candidate provider won negotiation.
    ///
    /// Sets:
    /// - `candidate`: factory name
    /// - `provider`: the provider's own name
    /// - `version`: reported version
    ProviderSelected,

    /// No candidate was usable; the backend runs in empty-signal mode.
    NoProvider,

    // === Registry ===
    /// A subscription was stored.
    ///
    /// Sets:
    /// - `context`, `consumer`
    /// - `refcount`: subscriptions on the context after the add
    SubscriptionAdded,

    /// A subscription was removed by `unregister`.
    ///
    /// Sets:
    /// - `context`, `consumer`
    /// - `refcount`: subscriptions on the context after the removal
    SubscriptionRemoved,

    /// The provider was asked to start observing a context (refcount 0 → 1).
    ///
    /// Sets:
    /// - `context`
    ContextHooked,

    /// The provider was asked to stop observing a context (refcount 1 → 0).
    ///
    /// Sets:
    /// - `context`
    ContextUnhooked,

    /// Registration without a provider delivered the empty signal.
    ///
    /// Sets:
    /// - `context`, `consumer`
    EmptySignalDelivered,

    // === Dispatch ===
    /// A queue executor dropped a job (queue full or worker gone).
    ///
    /// Sets:
    /// - `consumer`: executor name
    /// - `reason`: `"full"` or `"closed"`
    DispatchOverflow,

    /// A job panicked inside a queue executor worker.
    ///
    /// Sets:
    /// - `consumer`: executor name
    /// - `reason`: panic message
    DispatchPanicked,

    // === Observers ===
    /// An observer dropped an event.
    ///
    /// Sets:
    /// - `consumer`: observer name
    /// - `reason`: `"full"` or `"closed"`
    ObserverOverflow,

    /// An observer panicked while handling an event.
    ///
    /// Sets:
    /// - `consumer`: observer name
    /// - `reason`: panic message
    ObserverPanicked,
}

/// Backend event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Provider factory name.
    pub candidate: Option<Arc<str>>,
    /// Name the provider reports for itself.
    pub provider: Option<Arc<str>>,
    /// Window context (rendered as `label#id`).
    pub context: Option<Arc<str>>,
    /// Consumer, executor or observer name.
    pub consumer: Option<Arc<str>>,
    /// Protocol version involved.
    pub version: Option<ProtocolVersion>,
    /// Live subscriptions on `context` after the change.
    pub refcount: Option<usize>,
    /// Human-readable reason.
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            candidate: None,
            provider: None,
            context: None,
            consumer: None,
            version: None,
            refcount: None,
            reason: None,
        }
    }

    #[inline]
    pub fn with_candidate(mut self, candidate: impl Into<Arc<str>>) -> Self {
        self.candidate = Some(candidate.into());
        self
    }

    #[inline]
    pub fn with_provider(mut self, provider: impl Into<Arc<str>>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    #[inline]
    pub fn with_context(mut self, context: impl Into<Arc<str>>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[inline]
    pub fn with_consumer(mut self, consumer: impl Into<Arc<str>>) -> Self {
        self.consumer = Some(consumer.into());
        self
    }

    #[inline]
    pub fn with_version(mut self, version: ProtocolVersion) -> Self {
        self.version = Some(version);
        self
    }

    #[inline]
    pub fn with_refcount(mut self, n: usize) -> Self {
        self.refcount = Some(n);
        self
    }

    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a dispatch overflow event.
    #[inline]
    pub fn dispatch_overflow(executor: &str, reason: &'static str) -> Self {
        Event::new(EventKind::DispatchOverflow)
            .with_consumer(executor)
            .with_reason(reason)
    }

    /// Creates a dispatch panic event.
    #[inline]
    pub fn dispatch_panicked(executor: &str, info: String) -> Self {
        Event::new(EventKind::DispatchPanicked)
            .with_consumer(executor)
            .with_reason(info)
    }

    /// Creates an observer overflow event.
    #[inline]
    pub fn observer_overflow(observer: &str, reason: &'static str) -> Self {
        Event::new(EventKind::ObserverOverflow)
            .with_consumer(observer)
            .with_reason(reason)
    }

    /// Creates an observer panic event.
    #[inline]
    pub fn observer_panicked(observer: &str, info: String) -> Self {
        Event::new(EventKind::ObserverPanicked)
            .with_consumer(observer)
            .with_reason(info)
    }

    #[inline]
    pub fn is_observer_overflow(&self) -> bool {
        matches!(self.kind, EventKind::ObserverOverflow)
    }
}

/// Renders a panic payload as text.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
