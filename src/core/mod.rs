//! Backend core: registry, multiplexer and lifecycle.
//!
//! The public API from this module is [`Backend`] (with [`BackendBuilder`]) and
//! [`BackendCell`] for process-wide sharing.
//!
//! Internal modules:
//! - [`registry`]: subscriptions and per-context refcounts, hook/unhook decisions;
//! - [`multiplexer`]: provider signal fan-out over a lock-free snapshot;
//! - [`backend`]: public subscribe/unsubscribe surface;
//! - [`builder`]: negotiation and wiring;
//! - [`instance`]: double-checked process-wide instance.

mod backend;
mod builder;
mod instance;
mod multiplexer;
mod registry;

pub use backend::Backend;
pub use builder::BackendBuilder;
pub use instance::BackendCell;
