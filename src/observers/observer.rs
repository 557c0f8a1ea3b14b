//! # Observer trait.
//!
//! Each observer gets:
//! - **Dedicated worker task** (runs independently)
//! - **Per-observer bounded queue** (capacity via [`Observe::queue_capacity`])
//! - **Panic isolation** (panics are reported as `EventKind::ObserverPanicked`)
//!
//! ## Overflow behavior
//! 1) The new event is **dropped** for this observer only.
//! 2) `EventKind::ObserverOverflow` is published.
//! 3) Other observers are unaffected.

use async_trait::async_trait;

use crate::events::Event;

/// Diagnostics observer.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
#[async_trait]
pub trait Observe: Send + Sync + 'static {
    /// Processes a single event, in FIFO order per observer.
    async fn on_event(&self, event: &Event);

    /// Observer name used in overflow/panic events.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred queue capacity (clamped to a minimum of 1). Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
