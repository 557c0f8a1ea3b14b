//! # Vendor providers and version negotiation.
//!
//! A *provider* is the vendor-supplied implementation of the windowing-signal protocol.
//! Providers are never discovered by scanning: the application hands the backend an
//! ordered list of [`ProviderFactory`] candidates (primary protocol first, legacy
//! fallback after), and [`negotiate`] picks the first usable one.
//!
//! ## Architecture
//! ```text
//! [FactoryRef; N] ──► negotiate(compat, bus)
//!                        for each candidate, in order:
//!                        ├─► create()                 Err / panic  ─► CandidateRejected, next
//!                        ├─► reported_version()       None         ─► CandidateRejected, next
//!                        ├─► compat.is_supported(v)   false        ─► CandidateRejected, next
//!                        ├─► validate_interface_shape() false      ─► CandidateRejected, next
//!                        └─► winner                                ─► ProviderSelected
//!                     none left ─► NoProvider
//! ```
//!
//! ## Rules
//! - Failures are never fatal; they are recorded in [`Negotiation::rejected`] and
//!   published on the bus.
//! - The only calls made on a candidate are construction and the two queries.

mod factory;
mod negotiate;
mod provider;

pub use factory::{FactoryFn, FactoryRef, ProviderFactory};
pub use negotiate::{Negotiation, Selected, negotiate, negotiate_report};
pub use provider::{ListenerRef, Provider, ProviderRef, SignalListener};
