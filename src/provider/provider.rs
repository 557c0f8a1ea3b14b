//! # Provider contract.
//!
//! [`Provider`] is implemented by the vendor side. The backend calls:
//! - `reported_version` / `validate_interface_shape` once, during negotiation;
//! - `set_signal_listener` once, right after negotiation;
//! - `hook_context` / `unhook_context` on each refcount 0→1 / 1→0 transition.
//!
//! The provider calls back into [`SignalListener::on_signal`] from any thread.
//!
//! ## Example
//! ```rust
//! use windowvisor::{ListenerRef, ProtocolVersion, Provider, WindowContext};
//!
//! struct Null;
//!
//! impl Provider for Null {
//!     fn name(&self) -> &str { "null" }
//!     fn reported_version(&self) -> Option<ProtocolVersion> { Some(ProtocolVersion::new(2, 0)) }
//!     fn validate_interface_shape(&self) -> bool { true }
//!     fn hook_context(&self, _ctx: &WindowContext) {}
//!     fn unhook_context(&self, _ctx: &WindowContext) {}
//!     fn set_signal_listener(&self, _listener: ListenerRef) {}
//! }
//! ```

use std::sync::Arc;

use crate::layout::{LayoutSignal, WindowContext};
use crate::version::ProtocolVersion;

/// Vendor implementation of the windowing-signal protocol.
///
/// ### Implementation requirements
/// - `hook_context` / `unhook_context` are called while the backend registry lock is held.
///   The lock is reentrant, so `hook_context` may report the current layout right away
///   through the listener, even when that reaches an inline consumer on this thread.
/// - `on_signal` may be invoked from any thread, including concurrently.
pub trait Provider: Send + Sync + 'static {
    /// Implementation name, reported with `ProviderSelected` and by
    /// [`Backend::provider_name`](crate::Backend::provider_name).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Protocol version implemented by the provider, if it reports one.
    fn reported_version(&self) -> Option<ProtocolVersion>;

    /// Structural self-check: `true` if the provider exposes the full interface.
    fn validate_interface_shape(&self) -> bool;

    /// Start observing `ctx`.
    fn hook_context(&self, ctx: &WindowContext);

    /// Stop observing `ctx`.
    fn unhook_context(&self, ctx: &WindowContext);

    /// Installs the sink for layout notifications.
    fn set_signal_listener(&self, listener: ListenerRef);
}

/// Shared provider handle.
pub type ProviderRef = Arc<dyn Provider>;

/// Receiver of provider notifications.
pub trait SignalListener: Send + Sync + 'static {
    /// Called by the provider when the layout of `context` changes.
    fn on_signal(&self, context: &WindowContext, signal: LayoutSignal);
}

/// Shared listener handle.
pub type ListenerRef = Arc<dyn SignalListener>;
