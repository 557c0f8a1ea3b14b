use std::sync::Arc;

use super::backend::Backend;
use crate::{
    config::Config,
    events::Bus,
    provider::{FactoryRef, negotiate_report},
    version::Compatibility,
};

/// Builder for constructing a [`Backend`].
///
/// Candidates are tried in the order they were added: add the primary protocol
/// first and the legacy fallback after it.
pub struct BackendBuilder {
    cfg: Config,
    factories: Vec<FactoryRef>,
    bus: Option<Bus>,
}

impl BackendBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            factories: Vec::new(),
            bus: None,
        }
    }

    /// Appends one candidate (lower priority than those already added).
    pub fn with_factory(mut self, factory: FactoryRef) -> Self {
        self.factories.push(factory);
        self
    }

    /// Appends candidates in priority order.
    pub fn with_factories(mut self, factories: impl IntoIterator<Item = FactoryRef>) -> Self {
        self.factories.extend(factories);
        self
    }

    /// Uses an existing diagnostics bus instead of creating one.
    ///
    /// Useful to attach receivers before negotiation runs.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Builds and returns the backend.
    ///
    /// This consumes the builder and:
    /// - creates the diagnostics bus (unless one was supplied)
    /// - negotiates a provider among the candidates
    /// - installs the multiplexer as the provider's signal listener
    pub fn build(self) -> Arc<Backend> {
        let bus = self
            .bus
            .unwrap_or_else(|| Bus::new(self.cfg.bus_capacity_clamped()));
        let compat = Compatibility::from_config(&self.cfg);
        let negotiation = negotiate_report(&self.factories, compat, &bus);

        Arc::new(Backend::new_internal(self.cfg, bus, negotiation))
    }
}
