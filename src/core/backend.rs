//! # Backend: negotiated provider plus the public subscription API.
//!
//! The [`Backend`] owns the provider chosen at construction (possibly none), the
//! subscription registry, and the diagnostics bus.
//!
//! ## High-level architecture
//! ```text
//! Build:
//!   BackendBuilder::build()
//!     ├─► negotiate_report(factories) ─► Option<Selected>
//!     └─► Selected.provider.set_signal_listener(Multiplexer)      (once)
//!
//! Application threads:
//!   register_layout_change_callback(ctx, exec, consumer)
//!     ├─ no provider ─► consumer.accept(LayoutSignal::empty())   (sync, nothing stored)
//!     └─ provider    ─► Registry::register ─► hook_context on 0→1
//!   unregister_layout_change_callback(consumer)
//!     └─ provider    ─► Registry::unregister ─► unhook_context on 1→0
//!
//! Provider thread:
//!   Multiplexer::on_signal(ctx, signal) ─► snapshot ─► exec.execute(consumer.accept(signal))
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use windowvisor::{Backend, Config, ConsumerFn, ConsumerRef, InlineExecutor, LayoutSignal, WindowContext};
//!
//! // No candidates: every registration gets one empty signal right away.
//! let backend = Backend::builder(Config::default()).build();
//! assert!(!backend.has_provider());
//!
//! let seen = Arc::new(AtomicUsize::new(0));
//! let s = Arc::clone(&seen);
//! let consumer: ConsumerRef = ConsumerFn::arc("ui", move |signal: LayoutSignal| {
//!     assert!(signal.is_empty());
//!     s.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! backend.register_layout_change_callback(&WindowContext::new("main"), InlineExecutor::arc(), consumer.clone());
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//! backend.unregister_layout_change_callback(&consumer);
//! ```

use std::sync::Arc;

use crate::config::Config;
use crate::core::builder::BackendBuilder;
use crate::core::multiplexer::Multiplexer;
use crate::core::registry::Registry;
use crate::dispatch::ExecutorRef;
use crate::error::NegotiationError;
use crate::events::{Bus, Event, EventKind};
use crate::layout::{ConsumerRef, LayoutSignal, WindowContext};
use crate::provider::Negotiation;
use crate::version::ProtocolVersion;

/// State that only exists when a provider was negotiated.
struct Attached {
    candidate: String,
    provider_name: String,
    version: ProtocolVersion,
    registry: Registry,
}

/// Layout-signal backend.
pub struct Backend {
    /// Configuration the backend was built with.
    cfg: Config,
    /// Diagnostics bus.
    bus: Bus,
    /// Negotiated provider with its registry; `None` means empty-signal mode.
    attached: Option<Attached>,
    /// Candidates rejected during negotiation, in order.
    rejected: Vec<NegotiationError>,
}

impl Backend {
    /// Starts building a backend.
    pub fn builder(cfg: Config) -> BackendBuilder {
        BackendBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: Config, bus: Bus, negotiation: Negotiation) -> Self {
        let Negotiation { selected, rejected } = negotiation;

        let attached = selected.map(|sel| {
            let registry = Registry::new(Arc::clone(&sel.provider), bus.clone());
            sel.provider
                .set_signal_listener(Arc::new(Multiplexer::new(registry.list())));
            Attached {
                candidate: sel.candidate,
                provider_name: sel.provider_name,
                version: sel.version,
                registry,
            }
        });

        Self {
            cfg,
            bus,
            attached,
            rejected,
        }
    }

    /// Subscribes `consumer` to layout changes of `context`, delivered via `executor`.
    ///
    /// Without a provider, `consumer` receives one empty [`LayoutSignal`] synchronously
    /// on the calling thread and nothing is stored.
    pub fn register_layout_change_callback(
        &self,
        context: &WindowContext,
        executor: ExecutorRef,
        consumer: ConsumerRef,
    ) {
        match &self.attached {
            Some(att) => att.registry.register(context, executor, consumer),
            None => {
                consumer.accept(LayoutSignal::empty());
                self.bus.publish(
                    Event::new(EventKind::EmptySignalDelivered)
                        .with_context(context.to_string())
                        .with_consumer(consumer.name()),
                );
            }
        }
    }

    /// Removes every subscription of `consumer` (identity comparison).
    ///
    /// Unknown consumers are ignored. Returns the number of subscriptions removed.
    pub fn unregister_layout_change_callback(&self, consumer: &ConsumerRef) -> usize {
        match &self.attached {
            Some(att) => att.registry.unregister(consumer),
            None => 0,
        }
    }

    /// Returns `true` if a provider was negotiated.
    pub fn has_provider(&self) -> bool {
        self.attached.is_some()
    }

    /// Name of the winning candidate (its factory).
    pub fn candidate_name(&self) -> Option<&str> {
        self.attached.as_ref().map(|a| a.candidate.as_str())
    }

    /// Name the negotiated provider reports for itself.
    pub fn provider_name(&self) -> Option<&str> {
        self.attached.as_ref().map(|a| a.provider_name.as_str())
    }

    /// Protocol version reported by the winning candidate.
    pub fn provider_version(&self) -> Option<ProtocolVersion> {
        self.attached.as_ref().map(|a| a.version)
    }

    /// Candidates rejected during negotiation.
    pub fn rejections(&self) -> &[NegotiationError] {
        &self.rejected
    }

    /// Total live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.attached.as_ref().map_or(0, |a| a.registry.len())
    }

    /// Live subscriptions on `context`.
    pub fn refcount(&self, context: &WindowContext) -> usize {
        self.attached
            .as_ref()
            .map_or(0, |a| a.registry.refcount(context))
    }

    /// Returns `true` if the provider is currently observing `context`.
    pub fn is_hooked(&self, context: &WindowContext) -> bool {
        self.refcount(context) > 0
    }

    /// Contexts currently hooked upstream.
    pub fn hooked_contexts(&self) -> Vec<WindowContext> {
        self.attached
            .as_ref()
            .map_or_else(Vec::new, |a| a.registry.hooked())
    }

    /// Diagnostics bus.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Configuration the backend was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("candidate", &self.candidate_name())
            .field("provider", &self.provider_name())
            .field("version", &self.provider_version())
            .field("subscriptions", &self.subscription_count())
            .finish()
    }
}
