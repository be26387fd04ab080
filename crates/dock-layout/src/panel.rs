#![forbid(unsafe_code)]

//! Panel descriptors: one managed, chromed region of the workspace.
//!
//! A [`PanelDescriptor`] is a plain value. The registry replaces descriptors
//! by id instead of mutating them, so two descriptors comparing equal means
//! nothing about the panel changed.
//!
//! # Forward compatibility
//!
//! Every field except `id` carries a serde default, so snapshots written by
//! older builds (or hand-edited ones) that omit optional fields still load:
//!
//! | Field                         | Default     |
//! |-------------------------------|-------------|
//! | `title`                       | `""`        |
//! | `content`                     | empty       |
//! | `width`, `height`             | `50.0`      |
//! | `min_percent`, `max_percent`  | none        |
//! | pixel bounds                  | none        |
//! | `resizable`, `closable`       | `true`      |
//! | `collapsed`                   | `false`     |
//! | `position`                    | `center`    |
//! | `z_index`                     | none        |

use std::collections::BTreeMap;
use std::fmt;

use dock_core::geometry::PercentBounds;
use serde::{Deserialize, Serialize};

/// Default stored width/height (percent) for panels that omit geometry.
pub const DEFAULT_PANEL_PERCENT: f64 = 50.0;

/// Stable unique panel identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(String);

impl PanelId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PanelId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PanelId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Advisory docking hint. Does not affect sizing; round-trips unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DockPosition {
    Left,
    Right,
    Top,
    Bottom,
    #[default]
    Center,
}

/// Opaque render unit plus its parameter bag.
///
/// The engine never inspects either field; hosts use `component` to look up
/// what to draw inside the panel chrome and pass `props` through to it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PanelContent {
    #[serde(default)]
    pub component: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub props: BTreeMap<String, serde_json::Value>,
}

impl PanelContent {
    #[must_use]
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            props: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_prop(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.props.insert(key.into(), value);
        self
    }
}

/// One managed panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelDescriptor {
    pub id: PanelId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: PanelContent,
    /// Percent of workspace width.
    #[serde(default = "default_percent")]
    pub width: f64,
    /// Percent of workspace height.
    #[serde(default = "default_percent")]
    pub height: f64,
    /// Per-panel lower clamp for width and height, inside the engine bounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_percent: Option<f64>,
    /// Per-panel upper clamp for width and height, inside the engine bounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width_px: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height_px: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width_px: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height_px: Option<f64>,
    #[serde(default = "default_true")]
    pub resizable: bool,
    #[serde(default = "default_true")]
    pub closable: bool,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default)]
    pub position: DockPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
}

fn default_percent() -> f64 {
    DEFAULT_PANEL_PERCENT
}

fn default_true() -> bool {
    true
}

impl PanelDescriptor {
    /// A resizable, closable, expanded panel at the default size.
    #[must_use]
    pub fn new(id: impl Into<PanelId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: PanelContent::default(),
            width: DEFAULT_PANEL_PERCENT,
            height: DEFAULT_PANEL_PERCENT,
            min_percent: None,
            max_percent: None,
            min_width_px: None,
            min_height_px: None,
            max_width_px: None,
            max_height_px: None,
            resizable: true,
            closable: true,
            collapsed: false,
            position: DockPosition::Center,
            z_index: None,
        }
    }

    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: PanelContent) -> Self {
        self.content = content;
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: DockPosition) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    #[must_use]
    pub fn with_closable(mut self, closable: bool) -> Self {
        self.closable = closable;
        self
    }

    #[must_use]
    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    #[must_use]
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    #[must_use]
    pub fn with_percent_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_percent = min;
        self.max_percent = max;
        self
    }

    /// The clamp for this panel's width and height: `engine` narrowed by the
    /// panel's own `[min_percent, max_percent]`.
    #[must_use]
    pub fn percent_bounds(&self, engine: PercentBounds) -> PercentBounds {
        engine.narrowed(self.min_percent, self.max_percent)
    }

    /// Drop optional limits that cannot be stored (NaN, infinities).
    ///
    /// JSON has no encoding for non-finite numbers, so keeping them would
    /// make the persisted state differ from the live one.
    #[must_use]
    pub fn without_non_finite_limits(mut self) -> Self {
        for limit in [
            &mut self.min_percent,
            &mut self.max_percent,
            &mut self.min_width_px,
            &mut self.min_height_px,
            &mut self.max_width_px,
            &mut self.max_height_px,
        ] {
            *limit = limit.filter(|v| v.is_finite());
        }
        self
    }

    #[must_use]
    pub fn with_pixel_bounds(
        mut self,
        min: (Option<f64>, Option<f64>),
        max: (Option<f64>, Option<f64>),
    ) -> Self {
        (self.min_width_px, self.min_height_px) = min;
        (self.max_width_px, self.max_height_px) = max;
        self
    }
}

/// Partial update merged into an existing descriptor.
///
/// `None` leaves the field untouched. The id is not patchable. Optional
/// descriptor fields take a nested option so a patch can clear them:
/// `Some(None)` (JSON `null`) resets the field, `Some(Some(v))` sets it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelPatch {
    pub title: Option<String>,
    pub content: Option<PanelContent>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    #[serde(with = "::serde_with::rust::double_option", skip_serializing_if = "Option::is_none")]
    pub min_percent: Option<Option<f64>>,
    #[serde(with = "::serde_with::rust::double_option", skip_serializing_if = "Option::is_none")]
    pub max_percent: Option<Option<f64>>,
    #[serde(with = "::serde_with::rust::double_option", skip_serializing_if = "Option::is_none")]
    pub min_width_px: Option<Option<f64>>,
    #[serde(with = "::serde_with::rust::double_option", skip_serializing_if = "Option::is_none")]
    pub min_height_px: Option<Option<f64>>,
    #[serde(with = "::serde_with::rust::double_option", skip_serializing_if = "Option::is_none")]
    pub max_width_px: Option<Option<f64>>,
    #[serde(with = "::serde_with::rust::double_option", skip_serializing_if = "Option::is_none")]
    pub max_height_px: Option<Option<f64>>,
    pub resizable: Option<bool>,
    pub closable: Option<bool>,
    pub collapsed: Option<bool>,
    pub position: Option<DockPosition>,
    #[serde(with = "::serde_with::rust::double_option", skip_serializing_if = "Option::is_none")]
    pub z_index: Option<Option<i32>>,
}

impl PanelPatch {
    /// Patch that sets width and height only.
    #[must_use]
    pub fn geometry(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Whether the patch touches stored width/height.
    #[must_use]
    pub fn touches_geometry(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }

    /// Produce a new descriptor with the patch merged over `base`.
    #[must_use]
    pub fn merged_into(&self, base: &PanelDescriptor) -> PanelDescriptor {
        let mut next = base.clone();
        if let Some(title) = &self.title {
            next.title.clone_from(title);
        }
        if let Some(content) = &self.content {
            next.content = content.clone();
        }
        next.width = self.width.unwrap_or(next.width);
        next.height = self.height.unwrap_or(next.height);
        next.min_percent = self.min_percent.unwrap_or(next.min_percent);
        next.max_percent = self.max_percent.unwrap_or(next.max_percent);
        next.min_width_px = self.min_width_px.unwrap_or(next.min_width_px);
        next.min_height_px = self.min_height_px.unwrap_or(next.min_height_px);
        next.max_width_px = self.max_width_px.unwrap_or(next.max_width_px);
        next.max_height_px = self.max_height_px.unwrap_or(next.max_height_px);
        next.resizable = self.resizable.unwrap_or(next.resizable);
        next.closable = self.closable.unwrap_or(next.closable);
        next.collapsed = self.collapsed.unwrap_or(next.collapsed);
        next.position = self.position.unwrap_or(next.position);
        next.z_index = self.z_index.unwrap_or(next.z_index);
        next
    }
}
