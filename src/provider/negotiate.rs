//! # Version negotiation.
//!
//! Walks the candidate list in priority order and returns the first provider that
//! constructs, reports a version, passes the [`Compatibility`] rule and validates its
//! interface shape. Every rejection is recorded and published as
//! [`EventKind::CandidateRejected`]; nothing is ever propagated as an error.

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::error::{NegotiationError, ProviderError};
use crate::events::{Bus, Event, EventKind, panic_message};
use crate::provider::{FactoryRef, ProviderRef};
use crate::version::{Compatibility, ProtocolVersion};

/// The candidate that won negotiation.
#[derive(Clone)]
pub struct Selected {
    /// Factory name.
    pub candidate: String,
    /// Name the provider reports for itself.
    pub provider_name: String,
    /// Version the provider reported.
    pub version: ProtocolVersion,
    /// The provider handle.
    pub provider: ProviderRef,
}

/// Outcome of a negotiation run.
#[derive(Clone, Default)]
pub struct Negotiation {
    /// Winner, if any candidate was usable.
    pub selected: Option<Selected>,
    /// Rejections in candidate order.
    pub rejected: Vec<NegotiationError>,
}

impl Negotiation {
    /// Returns the selected provider handle.
    pub fn provider(&self) -> Option<&ProviderRef> {
        self.selected.as_ref().map(|s| &s.provider)
    }

    /// Consumes the report, keeping only the selected provider.
    pub fn into_provider(self) -> Option<ProviderRef> {
        self.selected.map(|s| s.provider)
    }
}

impl std::fmt::Debug for Negotiation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Negotiation")
            .field(
                "selected",
                &self
                    .selected
                    .as_ref()
                    .map(|s| (s.candidate.as_str(), s.version)),
            )
            .field("rejected", &self.rejected)
            .finish()
    }
}

/// Picks the first usable provider, or `None`.
pub fn negotiate(
    candidates: &[FactoryRef],
    compat: Compatibility,
    bus: &Bus,
) -> Option<ProviderRef> {
    negotiate_report(candidates, compat, bus).into_provider()
}

/// Like [`negotiate`], but returns the full per-candidate report.
pub fn negotiate_report(
    candidates: &[FactoryRef],
    compat: Compatibility,
    bus: &Bus,
) -> Negotiation {
    let mut out = Negotiation::default();

    for factory in candidates {
        match probe(factory, compat) {
            Ok(selected) => {
                bus.publish(
                    Event::new(EventKind::ProviderSelected)
                        .with_candidate(selected.candidate.as_str())
                        .with_provider(selected.provider_name.as_str())
                        .with_version(selected.version),
                );
                out.selected = Some(selected);
                return out;
            }
            Err(err) => {
                let mut ev = Event::new(EventKind::CandidateRejected)
                    .with_candidate(err.candidate())
                    .with_reason(format!("{}: {}", err.as_label(), err.as_message()));
                if let NegotiationError::VersionIncompatible { reported: v, .. }
                | NegotiationError::ShapeRejected { version: v, .. } = &err
                {
                    ev = ev.with_version(*v);
                }
                bus.publish(ev);
                out.rejected.push(err);
            }
        }
    }

    bus.publish(Event::new(EventKind::NoProvider));
    out
}

/// Runs all checks for one candidate; panics anywhere inside count as discovery failures.
fn probe(factory: &FactoryRef, compat: Compatibility) -> Result<Selected, NegotiationError> {
    let candidate = factory.name().to_string();

    match catch_unwind(AssertUnwindSafe(|| check(factory, &candidate, compat))) {
        Ok(res) => res,
        Err(payload) => Err(NegotiationError::Discovery {
            candidate,
            source: ProviderError::Panicked {
                info: panic_message(&*payload),
            },
        }),
    }
}

fn check(
    factory: &FactoryRef,
    candidate: &str,
    compat: Compatibility,
) -> Result<Selected, NegotiationError> {
    let provider = factory
        .create()
        .map_err(|source| NegotiationError::Discovery {
            candidate: candidate.to_string(),
            source,
        })?;

    let version = provider
        .reported_version()
        .ok_or_else(|| NegotiationError::VersionMissing {
            candidate: candidate.to_string(),
        })?;

    if !compat.is_supported(version) {
        return Err(NegotiationError::VersionIncompatible {
            candidate: candidate.to_string(),
            reported: version,
            supported: compat.supported,
        });
    }

    if !provider.validate_interface_shape() {
        return Err(NegotiationError::ShapeRejected {
            candidate: candidate.to_string(),
            version,
        });
    }

    Ok(Selected {
        candidate: candidate.to_string(),
        provider_name: provider.name().to_string(),
        version,
        provider,
    })
}
