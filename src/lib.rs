//! # windowvisor
//!
//! **Windowvisor** is a window-layout signal backend.
//!
//! It picks one layout provider (for example a vendor extension for foldable displays)
//! among prioritized candidates, and multiplexes that provider's per-window signals to
//! any number of application consumers. Each consumer runs on the executor it chose.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐
//!     │   Factory    │   │   Factory    │        candidates, highest priority first
//!     │ (extensions) │   │  (sidecar)   │
//!     └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼
//! ┌───────────────────────────────────────────────┐
//! │  negotiate()                                  │
//! │  construct ─► reported_version ─► compat      │
//! │            ─► validate_interface_shape        │
//! └──────────────────────┬────────────────────────┘
//!                        ▼ Option<Provider>
//! ┌───────────────────────────────────────────────┐
//! │  Backend                                      │
//! │  - Registry (refcounts, hook/unhook on 0↔1)   │
//! │  - Subscription snapshot (ArcSwap)            │
//! │  - Multiplexer (installed as provider         │
//! │    listener, fans out by WindowContext)       │
//! │  - Bus (diagnostics)                          │
//! └──────┬─────────────────┬──────────────────┬───┘
//!        ▼                 ▼                  ▼
//!    Executor 1        Executor 2         Bus ─► ObserverSet ─► observers
//!        ▼                 ▼
//!   consumer.accept   consumer.accept
//! ```
//!
//! ### Signal path
//! ```text
//! provider thread ─► Multiplexer::on_signal(ctx, signal)
//!                      └─► for sub in snapshot where sub.context == ctx
//!                            └─► sub.executor.execute(|| sub.consumer.accept(signal))
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                           |
//! |-------------------|--------------------------------------------------------------|----------------------------------------------|
//! | **Backend**       | Register/unregister consumers per window context.            | [`Backend`], [`BackendBuilder`]              |
//! | **Providers**     | Plug vendor layout sources behind a trait.                   | [`Provider`], [`ProviderFactory`]            |
//! | **Negotiation**   | Version compatibility and fallback ordering.                 | [`negotiate`], [`Compatibility`]             |
//! | **Dispatch**      | Consumers choose where callbacks run.                        | [`Executor`], [`QueueExecutor`]              |
//! | **Observers**     | Hook into backend diagnostics.                               | [`Observe`], [`ObserverSet`]                 |
//! | **Errors**        | Typed negotiation and provider errors.                       | [`NegotiationError`], [`ProviderError`]      |
//! | **Configuration** | Centralize backend settings.                                 | [`Config`]                                   |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//! - `test-util`: exposes `Backend::reset_instance` for tests of downstream crates.
//!
//! ## Example
//! ```rust
//! use windowvisor::{
//!     Backend, Config, ConsumerFn, ConsumerRef, FactoryFn, InlineExecutor, LayoutSignal,
//!     ProviderError, ProviderRef, WindowContext,
//! };
//!
//! // The only candidate is missing on this device, so the backend runs without a provider.
//! let unavailable = FactoryFn::arc("extensions", || -> Result<ProviderRef, ProviderError> {
//!     Err(ProviderError::Unavailable)
//! });
//! let backend = Backend::builder(Config::default())
//!     .with_factory(unavailable)
//!     .build();
//!
//! let ui: ConsumerRef = ConsumerFn::arc("ui", |signal: LayoutSignal| {
//!     println!("features: {}", signal.len());
//! });
//! backend.register_layout_change_callback(&WindowContext::new("main"), InlineExecutor::arc(), ui.clone());
//! assert_eq!(backend.unregister_layout_change_callback(&ui), 0);
//! ```
mod config;
mod core;
mod dispatch;
mod error;
mod events;
mod layout;
mod observers;
mod provider;
mod version;

#[cfg(test)]
mod testing;

// ---- Public re-exports ----

pub use config::Config;
pub use core::{Backend, BackendBuilder, BackendCell};
pub use dispatch::{Executor, ExecutorRef, InlineExecutor, Job, QueueExecutor, TokioExecutor};
pub use error::{NegotiationError, ProviderError, VersionParseError};
pub use events::{Bus, Event, EventKind};
pub use layout::{
    Bounds, ConsumerFn, ConsumerRef, FeatureKind, FeatureState, LayoutConsumer, LayoutFeature,
    LayoutSignal, WindowContext,
};
pub use observers::{Observe, ObserverSet};
pub use provider::{
    FactoryFn, FactoryRef, ListenerRef, Negotiation, Provider, ProviderFactory, ProviderRef,
    Selected, SignalListener, negotiate, negotiate_report,
};
pub use version::{Compatibility, ProtocolVersion};

// Optional: expose a simple built-in logger observer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::LogWriter;
