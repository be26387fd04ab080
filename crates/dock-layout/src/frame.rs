#![forbid(unsafe_code)]

//! Rendered geometry derived from a [`LayoutState`].
//!
//! The frame is a pure projection: it never feeds back into the state, so
//! stored percentages survive fullscreen and collapse untouched.
//!
//! | Panel condition | Width          | Height                 |
//! |-----------------|----------------|------------------------|
//! | fullscreen      | 100%           | 100%                   |
//! | collapsed       | stored percent | `collapsed_height_px`  |
//! | otherwise       | stored percent | stored percent         |
//!
//! While one panel is fullscreen every other panel is marked `obscured`.

use dock_core::geometry::{Extent, PixelSize, WorkspaceBounds};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::panel::{DockPosition, PanelDescriptor, PanelId};
use crate::state::LayoutState;

/// Which chrome affordances a panel header shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelChrome {
    pub collapse: bool,
    pub fullscreen: bool,
    pub close: bool,
    pub resize_handle: bool,
}

/// Effective box and decorations for one panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelFrame {
    pub id: PanelId,
    pub title: String,
    pub component: String,
    pub position: DockPosition,
    pub width: Extent,
    pub height: Extent,
    pub fullscreen: bool,
    pub collapsed: bool,
    /// Another panel covers the workspace.
    pub obscured: bool,
    pub z_index: Option<i32>,
    pub chrome: PanelChrome,
    pub min_width_px: Option<f64>,
    pub min_height_px: Option<f64>,
    pub max_width_px: Option<f64>,
    pub max_height_px: Option<f64>,
}

impl PanelFrame {
    fn project(panel: &PanelDescriptor, state: &LayoutState, config: &EngineConfig) -> Self {
        let fullscreen = state.fullscreen_panel_id() == Some(&panel.id);
        let obscured = !fullscreen && state.fullscreen_panel_id().is_some();
        let (width, height) = if fullscreen {
            (Extent::Percent(100.0), Extent::Percent(100.0))
        } else if panel.collapsed {
            (
                Extent::Percent(panel.width),
                Extent::Pixels(config.collapsed_height_px),
            )
        } else {
            (Extent::Percent(panel.width), Extent::Percent(panel.height))
        };
        let z_index = if fullscreen {
            Some(panel.z_index.unwrap_or(config.fullscreen_z_index))
        } else {
            None
        };
        Self {
            id: panel.id.clone(),
            title: panel.title.clone(),
            component: panel.content.component.clone(),
            position: panel.position,
            width,
            height,
            fullscreen,
            collapsed: panel.collapsed,
            obscured,
            z_index,
            chrome: PanelChrome {
                collapse: !fullscreen,
                fullscreen: true,
                close: panel.closable,
                resize_handle: config.resizing_enabled
                    && panel.resizable
                    && !panel.collapsed
                    && !fullscreen,
            },
            min_width_px: panel.min_width_px,
            min_height_px: panel.min_height_px,
            max_width_px: panel.max_width_px,
            max_height_px: panel.max_height_px,
        }
    }

    /// Pixel size inside `workspace`, honoring the advisory pixel bounds.
    ///
    /// Follows CSS precedence: `max` caps first, then `min` wins. A collapsed
    /// strip ignores the height bounds.
    #[must_use]
    pub fn resolve(&self, workspace: WorkspaceBounds) -> PixelSize {
        let width = constrain(
            self.width.resolve(workspace.width),
            self.min_width_px,
            self.max_width_px,
        );
        let height = if self.collapsed && !self.fullscreen {
            self.height.resolve(workspace.height)
        } else {
            constrain(
                self.height.resolve(workspace.height),
                self.min_height_px,
                self.max_height_px,
            )
        };
        PixelSize { width, height }
    }
}

fn constrain(value: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    let capped = max.map_or(value, |max| value.min(max));
    min.map_or(capped, |min| capped.max(min))
}

/// Workspace chrome flags plus every panel frame, in registry order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceFrame {
    pub sidebar_collapsed: bool,
    pub header_visible: bool,
    pub footer_visible: bool,
    pub fullscreen: Option<PanelId>,
    pub panels: Vec<PanelFrame>,
}

impl WorkspaceFrame {
    #[must_use]
    pub fn project(state: &LayoutState, config: &EngineConfig) -> Self {
        Self {
            sidebar_collapsed: state.sidebar_collapsed(),
            header_visible: state.header_visible(),
            footer_visible: state.footer_visible(),
            fullscreen: state.fullscreen_panel_id().cloned(),
            panels: state
                .panels()
                .iter()
                .map(|panel| PanelFrame::project(panel, state, config))
                .collect(),
        }
    }

    #[must_use]
    pub fn panel(&self, id: &PanelId) -> Option<&PanelFrame> {
        self.panels.iter().find(|frame| &frame.id == id)
    }

    /// Pixel sizes of every panel, in registry order.
    #[must_use]
    pub fn resolve(&self, workspace: WorkspaceBounds) -> Vec<(PanelId, PixelSize)> {
        self.panels
            .iter()
            .map(|frame| (frame.id.clone(), frame.resolve(workspace)))
            .collect()
    }
}
