//! Error types used by the windowvisor backend and its providers.
//!
//! This module defines three error enums:
//!
//! - [`ProviderError`]: errors raised by a provider factory while constructing a provider.
//! - [`NegotiationError`]: reasons a candidate provider was rejected during negotiation.
//! - [`VersionParseError`]: malformed `"major.minor"` protocol version strings.
//!
//! None of these are ever fatal to the backend: negotiation records them, publishes
//! them on the diagnostics bus, and moves on to the next candidate.
//! Each type provides `as_label` / `as_message` helpers for logs.

use thiserror::Error;

use crate::version::ProtocolVersion;

/// # Errors produced by provider factories.
///
/// A factory returns one of these when the vendor provider cannot be constructed
/// on this device. Panics inside a factory are converted to [`ProviderError::Panicked`].
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider is not present on this device.
    #[error("provider unavailable")]
    Unavailable,

    /// The provider is present but failed to load.
    #[error("provider failed to load: {reason}")]
    Load {
        /// The underlying failure message.
        reason: String,
    },

    /// The factory panicked during construction.
    #[error("provider factory panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl ProviderError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use windowvisor::ProviderError;
    ///
    /// let err = ProviderError::Load { reason: "missing symbol".into() };
    /// assert_eq!(err.as_label(), "provider_load_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ProviderError::Unavailable => "provider_unavailable",
            ProviderError::Load { .. } => "provider_load_failed",
            ProviderError::Panicked { .. } => "provider_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ProviderError::Unavailable => "unavailable".to_string(),
            ProviderError::Load { reason } => format!("load failed: {reason}"),
            ProviderError::Panicked { info } => format!("panicked: {info}"),
        }
    }
}

/// # Reasons a candidate provider was rejected.
///
/// Produced by the negotiator for every candidate that does not win. These are
/// diagnostics only: a rejected candidate simply means the next one is tried.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NegotiationError {
    /// The factory failed (or panicked) while constructing the provider.
    #[error("candidate {candidate:?} unavailable: {source}")]
    Discovery {
        /// Candidate factory name.
        candidate: String,
        /// Factory failure.
        source: ProviderError,
    },

    /// The provider did not report a protocol version.
    #[error("candidate {candidate:?} reported no version")]
    VersionMissing {
        /// Candidate factory name.
        candidate: String,
    },

    /// The reported major version is not accepted by the compatibility rule.
    #[error("candidate {candidate:?} reports {reported}, backend supports {supported}")]
    VersionIncompatible {
        /// Candidate factory name.
        candidate: String,
        /// Version reported by the provider.
        reported: ProtocolVersion,
        /// Version supported by the backend.
        supported: ProtocolVersion,
    },

    /// The provider's structural self-check failed.
    #[error("candidate {candidate:?} ({version}) failed interface validation")]
    ShapeRejected {
        /// Candidate factory name.
        candidate: String,
        /// Version reported by the provider.
        version: ProtocolVersion,
    },
}

impl NegotiationError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use windowvisor::NegotiationError;
    ///
    /// let err = NegotiationError::VersionMissing { candidate: "sidecar".into() };
    /// assert_eq!(err.as_label(), "version_missing");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            NegotiationError::Discovery { .. } => "discovery_failed",
            NegotiationError::VersionMissing { .. } => "version_missing",
            NegotiationError::VersionIncompatible { .. } => "version_incompatible",
            NegotiationError::ShapeRejected { .. } => "shape_rejected",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            NegotiationError::Discovery { source, .. } => source.as_message(),
            NegotiationError::VersionMissing { .. } => "no version reported".to_string(),
            NegotiationError::VersionIncompatible {
                reported,
                supported,
                ..
            } => format!("reported={reported} supported={supported}"),
            NegotiationError::ShapeRejected { version, .. } => {
                format!("interface mismatch for {version}")
            }
        }
    }

    /// Name of the candidate this rejection belongs to.
    pub fn candidate(&self) -> &str {
        match self {
            NegotiationError::Discovery { candidate, .. }
            | NegotiationError::VersionMissing { candidate }
            | NegotiationError::VersionIncompatible { candidate, .. }
            | NegotiationError::ShapeRejected { candidate, .. } => candidate,
        }
    }
}

/// # Malformed protocol version string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid protocol version {input:?}: expected \"major.minor\"")]
pub struct VersionParseError {
    /// The rejected input.
    pub input: String,
}
