//! # Provider factories.
//!
//! A [`ProviderFactory`] constructs one candidate provider. Candidates are resolved by
//! explicit injection: the application builds the ordered list at startup.
//!
//! [`FactoryFn`] wraps a closure returning `Result<ProviderRef, ProviderError>`.
//!
//! ## Example
//! ```rust
//! use windowvisor::{FactoryFn, FactoryRef, ProviderError, ProviderRef};
//!
//! let sidecar: FactoryRef = FactoryFn::arc("sidecar", || -> Result<ProviderRef, ProviderError> {
//!     Err(ProviderError::Unavailable)
//! });
//! assert_eq!(sidecar.name(), "sidecar");
//! assert!(sidecar.create().is_err());
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use crate::error::ProviderError;
use crate::provider::ProviderRef;

/// Constructs a candidate provider.
pub trait ProviderFactory: Send + Sync + 'static {
    /// Stable candidate name (e.g., `"extensions"`, `"sidecar"`).
    fn name(&self) -> &str;

    /// Attempts to construct the provider.
    ///
    /// Returning `Err` (or panicking) marks the candidate unavailable.
    fn create(&self) -> Result<ProviderRef, ProviderError>;
}

/// Shared factory handle.
pub type FactoryRef = Arc<dyn ProviderFactory>;

/// Function-backed factory.
#[derive(Debug)]
pub struct FactoryFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> FactoryFn<F> {
    /// Creates a new function-backed factory.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the factory and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> ProviderFactory for FactoryFn<F>
where
    F: Fn() -> Result<ProviderRef, ProviderError> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn create(&self) -> Result<ProviderRef, ProviderError> {
        (self.f)()
    }
}
