//! # Protocol version reported by providers.
//!
//! [`ProtocolVersion`] is a `major.minor` pair. Ordering is lexicographic, but
//! compatibility decisions only look at `major` (see [`Compatibility`](super::Compatibility)).
//!
//! # Example
//! ```rust
//! use windowvisor::ProtocolVersion;
//!
//! let v: ProtocolVersion = "1.2".parse().unwrap();
//! assert_eq!(v, ProtocolVersion::new(1, 2));
//! assert_eq!(v.to_string(), "1.2");
//! assert!(v < ProtocolVersion::CURRENT);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::VersionParseError;

/// Protocol version spoken by a provider or by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProtocolVersion {
    /// Breaking-change counter; the only part used for compatibility.
    pub major: u32,
    /// Additive-change counter.
    pub minor: u32,
}

impl ProtocolVersion {
    /// Version spoken by this backend.
    pub const CURRENT: ProtocolVersion = ProtocolVersion::new(2, 0);

    /// Unstable protocol generation, gated behind [`Config::allow_unstable`](crate::Config::allow_unstable).
    pub const UNSTABLE_MAJOR: u32 = 1;

    /// Creates a version from its parts.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl Default for ProtocolVersion {
    /// Returns [`ProtocolVersion::CURRENT`].
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ProtocolVersion {
    type Err = VersionParseError;

    /// Parses `"major.minor"`; a bare `"major"` is read as `major.0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || VersionParseError {
            input: s.to_string(),
        };
        let mut parts = s.trim().splitn(2, '.');
        let major = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(err)?;
        let minor = match parts.next() {
            Some(p) => p.parse::<u32>().map_err(|_| err())?,
            None => 0,
        };
        Ok(Self { major, minor })
    }
}
