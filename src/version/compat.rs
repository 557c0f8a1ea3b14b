//! # Major-version compatibility rule.
//!
//! A provider reporting major `M` is accepted when:
//! - `M == 1`: only if the unstable gate is open (debug builds by default);
//! - any other `M`: iff the backend's supported major is `>= M`.

use crate::config::Config;
use crate::version::ProtocolVersion;

/// Compatibility rule applied to every negotiation candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Compatibility {
    /// Version spoken by the backend.
    pub supported: ProtocolVersion,
    /// Whether the unstable major (`1`) is accepted.
    pub allow_unstable: bool,
}

impl Compatibility {
    /// Builds the rule from the runtime configuration.
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            supported: cfg.supported,
            allow_unstable: cfg.allow_unstable,
        }
    }

    /// Returns `true` if a provider reporting `reported` may be used.
    pub fn is_supported(&self, reported: ProtocolVersion) -> bool {
        if reported.major == ProtocolVersion::UNSTABLE_MAJOR {
            return self.allow_unstable;
        }
        self.supported.major >= reported.major
    }
}

impl Default for Compatibility {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(major: u32, allow_unstable: bool) -> Compatibility {
        Compatibility {
            supported: ProtocolVersion::new(major, 0),
            allow_unstable,
        }
    }

    #[test]
    fn test_unstable_major_follows_gate_only() {
        assert!(rule(2, true).is_supported(ProtocolVersion::new(1, 0)));
        assert!(!rule(2, false).is_supported(ProtocolVersion::new(1, 0)));
        // Gate wins even when the supported major would otherwise reject it.
        assert!(rule(0, true).is_supported(ProtocolVersion::new(1, 4)));
    }

    #[test]
    fn test_older_and_equal_majors_accepted() {
        let r = rule(2, false);
        assert!(r.is_supported(ProtocolVersion::new(0, 1)));
        assert!(r.is_supported(ProtocolVersion::new(2, 7)));
    }

    #[test]
    fn test_newer_major_rejected() {
        let r = rule(2, true);
        assert!(!r.is_supported(ProtocolVersion::new(3, 0)));
    }

    #[test]
    fn test_minor_is_ignored() {
        let r = rule(2, false);
        assert!(r.is_supported(ProtocolVersion::new(2, u32::MAX)));
    }
}
