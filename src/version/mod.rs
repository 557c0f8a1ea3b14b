//! Protocol versions and the compatibility rule.
//!
//! This module groups the knobs that decide **whether** a provider speaking a given
//! protocol version may be used by the backend.
//!
//! ## Contents
//! - [`ProtocolVersion`] `major.minor` pair reported by providers
//! - [`Compatibility`]   the major-version acceptance rule
//!
//! ## Quick wiring
//! ```text
//! Config { supported, allow_unstable }
//!      └─► Compatibility::from_config(&cfg)
//!           └─► provider::negotiate uses is_supported(reported) per candidate
//! ```

mod compat;
mod protocol;

pub use compat::Compatibility;
pub use protocol::ProtocolVersion;
