#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! Every field has a default, so an empty TOML table or JSON object yields
//! [`EngineConfig::default()`].
//!
//! ```toml
//! [engine]
//! resizing_enabled = true
//! persistence_enabled = true
//! min_percent = 15.0
//! max_percent = 85.0
//! collapsed_height_px = 40.0
//! fullscreen_z_index = 1000
//! ```

use dock_core::geometry::{HARD_MAX_PERCENT, HARD_MIN_PERCENT, PercentBounds};
use serde::{Deserialize, Serialize};

/// Default rendered height (px) of a collapsed panel's header strip.
pub const DEFAULT_COLLAPSED_HEIGHT_PX: f64 = 40.0;

/// Default stacking order for a fullscreen panel without its own `z_index`.
pub const DEFAULT_FULLSCREEN_Z_INDEX: i32 = 1000;

/// Tunables for one layout engine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Global switch for pointer resizing.
    pub resizing_enabled: bool,
    /// Write every new state to the store.
    pub persistence_enabled: bool,
    /// Lower clamp for stored percentages (never below 10).
    pub min_percent: f64,
    /// Upper clamp for stored percentages (never above 90).
    pub max_percent: f64,
    pub collapsed_height_px: f64,
    pub fullscreen_z_index: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            resizing_enabled: true,
            persistence_enabled: true,
            min_percent: HARD_MIN_PERCENT,
            max_percent: HARD_MAX_PERCENT,
            collapsed_height_px: DEFAULT_COLLAPSED_HEIGHT_PX,
            fullscreen_z_index: DEFAULT_FULLSCREEN_Z_INDEX,
        }
    }
}

impl EngineConfig {
    /// Effective clamp, normalized into the hard `[10, 90]` window.
    #[must_use]
    pub fn percent_bounds(&self) -> PercentBounds {
        PercentBounds::new(self.min_percent, self.max_percent)
    }

    /// Parameters outside their meaningful range. An empty list means valid.
    ///
    /// Out-of-window percentages are reported but still usable: the engine
    /// normalizes them through [`Self::percent_bounds`].
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !(HARD_MIN_PERCENT..=HARD_MAX_PERCENT).contains(&self.min_percent) {
            errors.push(format!(
                "min_percent must be in [{HARD_MIN_PERCENT}, {HARD_MAX_PERCENT}], got {}",
                self.min_percent
            ));
        }
        if !(HARD_MIN_PERCENT..=HARD_MAX_PERCENT).contains(&self.max_percent) {
            errors.push(format!(
                "max_percent must be in [{HARD_MIN_PERCENT}, {HARD_MAX_PERCENT}], got {}",
                self.max_percent
            ));
        }
        if self.min_percent > self.max_percent {
            errors.push(format!(
                "min_percent ({}) must not exceed max_percent ({})",
                self.min_percent, self.max_percent
            ));
        }
        if !(self.collapsed_height_px.is_finite() && self.collapsed_height_px > 0.0) {
            errors.push(format!(
                "collapsed_height_px must be > 0, got {}",
                self.collapsed_height_px
            ));
        }
        errors
    }
}
