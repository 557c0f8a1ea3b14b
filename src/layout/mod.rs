//! Layout data flowing from providers to consumers.
//!
//! ## Contents
//! - [`WindowContext`] opaque identity key for an observed window container
//! - [`LayoutSignal`], [`LayoutFeature`] payload forwarded unmodified to consumers
//! - [`LayoutConsumer`], [`ConsumerFn`], [`ConsumerRef`] callback sinks
//!
//! The backend never inspects a [`LayoutSignal`]; it only routes it by [`WindowContext`].

mod consumer;
mod context;
mod signal;

pub use consumer::{ConsumerFn, ConsumerRef, LayoutConsumer};
pub(crate) use consumer::same_consumer;
pub use context::WindowContext;
pub use signal::{Bounds, FeatureKind, FeatureState, LayoutFeature, LayoutSignal};
