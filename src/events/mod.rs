//! Backend diagnostics: event types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to diagnostics emitted by the negotiator, the backend registry,
//! dispatch executors and observer workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `negotiate`, `Backend` (hook/unhook, add/remove),
//!   `QueueExecutor` workers (overflow/panic), `ObserverSet` workers.
//! - **Consumers**: `ObserverSet` listener (fans out to user observers) and anything
//!   holding a receiver from [`Bus::subscribe`].

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
pub(crate) use event::panic_message;
