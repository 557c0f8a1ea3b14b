//! # Layout signal payload.
//!
//! A [`LayoutSignal`] is an ordered sequence of [`LayoutFeature`]s describing physical
//! features of the display (folds, hinges) that intersect a window. Signals are cheap
//! to clone: the feature list is shared.
//!
//! ## Example
//! ```rust
//! use windowvisor::{Bounds, FeatureKind, FeatureState, LayoutFeature, LayoutSignal};
//!
//! let fold = LayoutFeature {
//!     kind: FeatureKind::Fold,
//!     state: FeatureState::HalfOpened,
//!     bounds: Bounds::new(0, 1200, 1080, 1200),
//! };
//! let signal = LayoutSignal::new(vec![fold]);
//! assert_eq!(signal.len(), 1);
//! assert!(LayoutSignal::empty().is_empty());
//! ```

use std::sync::Arc;

/// Kind of physical display feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    /// A crease in a flexible screen.
    Fold,
    /// A hinge between two physical screens.
    Hinge,
}

/// Posture of the feature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FeatureState {
    /// Posture not reported.
    #[default]
    Unknown,
    /// Fully opened, flat.
    Flat,
    /// Partially folded.
    HalfOpened,
}

/// Feature bounds in window coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }
}

/// A single display feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayoutFeature {
    pub kind: FeatureKind,
    pub state: FeatureState,
    pub bounds: Bounds,
}

/// Layout change payload delivered to consumers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutSignal {
    features: Arc<[LayoutFeature]>,
}

impl LayoutSignal {
    /// Creates a signal from an ordered feature list.
    pub fn new(features: Vec<LayoutFeature>) -> Self {
        Self {
            features: Arc::from(features),
        }
    }

    /// Signal with no features; delivered when no provider is available.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    #[inline]
    pub fn features(&self) -> &[LayoutFeature] {
        &self.features
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LayoutFeature> {
        self.features.iter()
    }
}

impl Default for LayoutSignal {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<LayoutFeature> for LayoutSignal {
    fn from_iter<I: IntoIterator<Item = LayoutFeature>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a LayoutSignal {
    type Item = &'a LayoutFeature;
    type IntoIter = std::slice::Iter<'a, LayoutFeature>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hinge(left: i32) -> LayoutFeature {
        LayoutFeature {
            kind: FeatureKind::Hinge,
            state: FeatureState::Flat,
            bounds: Bounds::new(left, 0, left + 20, 2000),
        }
    }

    #[test]
    fn test_order_preserved() {
        let signal: LayoutSignal = [hinge(10), hinge(500)].into_iter().collect();
        let lefts: Vec<i32> = signal.iter().map(|f| f.bounds.left).collect();
        assert_eq!(lefts, vec![10, 500]);
    }

    #[test]
    fn test_clone_shares_features() {
        let signal = LayoutSignal::new(vec![hinge(0)]);
        let copy = signal.clone();
        assert!(std::ptr::eq(signal.features(), copy.features()));
    }

    #[test]
    fn test_bounds_extent() {
        let b = Bounds::new(10, 20, 30, 60);
        assert_eq!(b.width(), 20);
        assert_eq!(b.height(), 40);
    }
}
