#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Panel sizes are stored as percentages of the workspace. The engine enforces
//! a hard `[10, 90]` window on every stored percentage. Narrower per-engine
//! and per-panel bounds may be configured inside that window but never widen
//! it.

use serde::{Deserialize, Serialize};

/// Hard floor for any stored panel percentage.
pub const HARD_MIN_PERCENT: f64 = 10.0;

/// Hard ceiling for any stored panel percentage.
pub const HARD_MAX_PERCENT: f64 = 90.0;

/// Closed percentage interval used to clamp panel geometry.
///
/// Always a sub-interval of `[HARD_MIN_PERCENT, HARD_MAX_PERCENT]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentBounds {
    min: f64,
    max: f64,
}

impl PercentBounds {
    /// Build bounds, normalizing them into the hard window.
    ///
    /// Non-finite inputs fall back to the hard limits. An inverted pair
    /// collapses to the (normalized) minimum.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        let min = normalize(min, HARD_MIN_PERCENT);
        let max = normalize(max, HARD_MAX_PERCENT).max(min);
        Self { min, max }
    }

    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Clamp a percentage into the bounds. `NaN` maps to the minimum.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    /// Intersect with an optional per-panel range.
    ///
    /// Missing or non-finite limits inherit from `self`. The result never
    /// leaves `self`, so a panel asking for `[5, 95]` still gets the hard
    /// window. An inverted pair collapses to the narrowed minimum.
    #[must_use]
    pub fn narrowed(self, min: Option<f64>, max: Option<f64>) -> Self {
        let min = min
            .filter(|v| v.is_finite())
            .map_or(self.min, |v| v.clamp(self.min, self.max));
        let max = max
            .filter(|v| v.is_finite())
            .map_or(self.max, |v| v.clamp(self.min, self.max))
            .max(min);
        Self { min, max }
    }

    /// Whether `value` already lies inside the bounds.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for PercentBounds {
    fn default() -> Self {
        Self {
            min: HARD_MIN_PERCENT,
            max: HARD_MAX_PERCENT,
        }
    }
}

fn normalize(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(HARD_MIN_PERCENT, HARD_MAX_PERCENT)
    } else {
        fallback
    }
}

/// Pixel size of the workspace bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkspaceBounds {
    pub width: f64,
    pub height: f64,
}

impl WorkspaceBounds {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Convert a horizontal pixel delta into a percentage of the width.
    ///
    /// Returns `None` for a degenerate (zero, negative or non-finite) width.
    #[must_use]
    pub fn width_percent(&self, delta_px: f64) -> Option<f64> {
        px_to_percent(delta_px, self.width)
    }

    /// Convert a vertical pixel delta into a percentage of the height.
    #[must_use]
    pub fn height_percent(&self, delta_px: f64) -> Option<f64> {
        px_to_percent(delta_px, self.height)
    }
}

fn px_to_percent(delta_px: f64, dimension: f64) -> Option<f64> {
    if !dimension.is_finite() || dimension <= 0.0 || !delta_px.is_finite() {
        return None;
    }
    Some(delta_px * 100.0 / dimension)
}

/// One rendered dimension: relative to the workspace, or a fixed pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum Extent {
    Percent(f64),
    Pixels(f64),
}

impl Extent {
    /// Resolve to pixels against the containing dimension.
    #[must_use]
    pub fn resolve(self, total_px: f64) -> f64 {
        match self {
            Self::Percent(p) => total_px * p / 100.0,
            Self::Pixels(px) => px,
        }
    }
}

/// A resolved pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: f64,
    pub height: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn bounds_are_normalized_into_hard_window() {
        let bounds = PercentBounds::new(0.0, 150.0);
        assert_eq!(bounds.min(), HARD_MIN_PERCENT);
        assert_eq!(bounds.max(), HARD_MAX_PERCENT);

        let narrow = PercentBounds::new(20.0, 80.0);
        assert_eq!(narrow.clamp(5.0), 20.0);
        assert_eq!(narrow.clamp(95.0), 80.0);
        assert_eq!(narrow.clamp(42.5), 42.5);
    }

    #[test]
    fn inverted_bounds_collapse_to_min() {
        let bounds = PercentBounds::new(70.0, 30.0);
        assert_eq!(bounds.min(), 70.0);
        assert_eq!(bounds.max(), 70.0);
    }

    #[test]
    fn non_finite_inputs_fall_back() {
        let bounds = PercentBounds::new(f64::NAN, f64::INFINITY);
        assert_eq!(bounds, PercentBounds::default());
        assert_eq!(bounds.clamp(f64::NAN), HARD_MIN_PERCENT);
        assert_eq!(bounds.clamp(f64::INFINITY), HARD_MAX_PERCENT);
    }

    #[test]
    fn narrowing_stays_inside_outer_bounds() {
        let outer = PercentBounds::default();
        let panel = outer.narrowed(Some(20.0), Some(60.0));
        assert_eq!((panel.min(), panel.max()), (20.0, 60.0));

        let wide = outer.narrowed(Some(5.0), Some(95.0));
        assert_eq!(wide, outer);

        let partial = PercentBounds::new(15.0, 85.0).narrowed(None, Some(40.0));
        assert_eq!((partial.min(), partial.max()), (15.0, 40.0));

        let inverted = outer.narrowed(Some(70.0), Some(30.0));
        assert_eq!((inverted.min(), inverted.max()), (70.0, 70.0));

        assert_eq!(outer.narrowed(Some(f64::NAN), Some(f64::INFINITY)), outer);
    }

    #[test]
    fn degenerate_workspace_yields_no_percentage() {
        let bounds = WorkspaceBounds::new(0.0, 600.0);
        assert_eq!(bounds.width_percent(50.0), None);
        assert_eq!(bounds.height_percent(60.0), Some(10.0));
    }

    #[test]
    fn extent_resolution() {
        assert_eq!(Extent::Percent(25.0).resolve(800.0), 200.0);
        assert_eq!(Extent::Pixels(40.0).resolve(800.0), 40.0);
    }

    proptest! {
        #[test]
        fn clamp_is_idempotent(value in -1e6f64..1e6, min in 0.0f64..100.0, max in 0.0f64..100.0) {
            let bounds = PercentBounds::new(min, max);
            let once = bounds.clamp(value);
            prop_assert!(bounds.contains(once));
            prop_assert_eq!(bounds.clamp(once), once);
        }
    }
}
