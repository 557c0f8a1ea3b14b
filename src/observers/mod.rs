//! # Diagnostics observers.
//!
//! This module provides the [`Observe`] trait and the [`ObserverSet`] that pumps events
//! from the backend [`Bus`](crate::Bus) into user observers.
//!
//! ## Architecture
//! ```text
//! Backend / negotiate / QueueExecutor ── publish(Event) ──► Bus
//!                                                            │
//!                                            ObserverSet listener (until cancelled)
//!                                                            │ emit
//!                                      ┌─────────────────────┼─────────────────────┐
//!                                      ▼                     ▼                     ▼
//!                                 [queue 1]             [queue 2]             [queue N]
//!                                      │                     │                     │
//!                                 observer1.on_event   observer2.on_event   observerN.on_event
//! ```
//!
//! ## Implementing custom observers
//! ```no_run
//! use windowvisor::{Event, EventKind, Observe};
//! use async_trait::async_trait;
//!
//! struct HookCounter;
//!
//! #[async_trait]
//! impl Observe for HookCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::ContextHooked {
//!             // increment a counter
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "hook-counter" }
//! }
//! ```

mod observer;
mod set;

#[cfg(feature = "logging")]
mod log;

pub use observer::Observe;
pub use set::ObserverSet;

#[cfg(feature = "logging")]
pub use log::LogWriter;
