#![forbid(unsafe_code)]

//! Workspace aggregate and its pure transition function.
//!
//! [`LayoutState`] is an immutable value. [`apply`] borrows the current state
//! and either returns a complete successor or an error; it never returns a
//! half-applied state. The engine swaps states wholesale, so any reader sees
//! either the complete pre-update or the complete post-update value.
//!
//! # Invariants
//!
//! 1. Panel ids are unique (enforced by [`PanelRegistry`]).
//! 2. `fullscreen_panel_id`, when set, names a registered panel. Removing that
//!    panel clears it in the same transition.
//! 3. Geometry written through [`apply`] is clamped to the engine bounds
//!    narrowed by the panel's own percent range.
//! 4. Optional limits are finite, so the state survives a JSON round-trip.

use dock_core::geometry::PercentBounds;
use serde::{Deserialize, Serialize};

use crate::panel::{PanelDescriptor, PanelId, PanelPatch};
use crate::registry::{LayoutError, PanelRegistry};

/// The workspace-level aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutState {
    #[serde(default)]
    pub(crate) panels: PanelRegistry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) fullscreen_panel_id: Option<PanelId>,
    #[serde(default)]
    pub(crate) sidebar_collapsed: bool,
    #[serde(default = "default_visible")]
    pub(crate) header_visible: bool,
    #[serde(default = "default_visible")]
    pub(crate) footer_visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::new(PanelRegistry::new())
    }
}

impl LayoutState {
    /// Expanded sidebar, visible header and footer, nothing fullscreen.
    #[must_use]
    pub fn new(panels: PanelRegistry) -> Self {
        Self {
            panels,
            fullscreen_panel_id: None,
            sidebar_collapsed: false,
            header_visible: true,
            footer_visible: true,
        }
    }

    #[must_use]
    pub fn panels(&self) -> &PanelRegistry {
        &self.panels
    }

    #[must_use]
    pub fn panel(&self, id: &PanelId) -> Option<&PanelDescriptor> {
        self.panels.get(id)
    }

    #[must_use]
    pub fn fullscreen_panel_id(&self) -> Option<&PanelId> {
        self.fullscreen_panel_id.as_ref()
    }

    #[must_use]
    pub fn sidebar_collapsed(&self) -> bool {
        self.sidebar_collapsed
    }

    #[must_use]
    pub fn header_visible(&self) -> bool {
        self.header_visible
    }

    #[must_use]
    pub fn footer_visible(&self) -> bool {
        self.footer_visible
    }
}

/// One engine operation, expressed as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LayoutOp {
    AddPanel { panel: PanelDescriptor },
    /// Programmatic removal; ignores `closable`.
    RemovePanel { id: PanelId },
    /// The close affordance; requires `closable`.
    ClosePanel { id: PanelId },
    UpdatePanel { id: PanelId, patch: PanelPatch },
    ToggleCollapse { id: PanelId },
    /// `None` exits whatever is fullscreen.
    ToggleFullscreen {
        #[serde(default)]
        id: Option<PanelId>,
    },
    SetSidebarCollapsed { collapsed: bool },
    SetHeaderVisible { visible: bool },
    SetFooterVisible { visible: bool },
}

impl LayoutOp {
    /// Stable name for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AddPanel { .. } => "add_panel",
            Self::RemovePanel { .. } => "remove_panel",
            Self::ClosePanel { .. } => "close_panel",
            Self::UpdatePanel { .. } => "update_panel",
            Self::ToggleCollapse { .. } => "toggle_collapse",
            Self::ToggleFullscreen { .. } => "toggle_fullscreen",
            Self::SetSidebarCollapsed { .. } => "set_sidebar_collapsed",
            Self::SetHeaderVisible { .. } => "set_header_visible",
            Self::SetFooterVisible { .. } => "set_footer_visible",
        }
    }

    /// The panel this operation targets, if any.
    #[must_use]
    pub fn target(&self) -> Option<&PanelId> {
        match self {
            Self::AddPanel { panel } => Some(&panel.id),
            Self::RemovePanel { id }
            | Self::ClosePanel { id }
            | Self::UpdatePanel { id, .. }
            | Self::ToggleCollapse { id } => Some(id),
            Self::ToggleFullscreen { id } => id.as_ref(),
            Self::SetSidebarCollapsed { .. }
            | Self::SetHeaderVisible { .. }
            | Self::SetFooterVisible { .. } => None,
        }
    }
}

/// Clamp a descriptor's stored width/height into `bounds` narrowed by the
/// panel's own range, dropping non-finite optional limits.
#[must_use]
pub fn clamp_panel(panel: &PanelDescriptor, bounds: PercentBounds) -> PanelDescriptor {
    let mut clamped = panel.clone().without_non_finite_limits();
    let bounds = clamped.percent_bounds(bounds);
    clamped.width = bounds.clamp(panel.width);
    clamped.height = bounds.clamp(panel.height);
    clamped
}

/// Compute the successor of `state` under `op`.
pub fn apply(
    state: &LayoutState,
    op: &LayoutOp,
    bounds: PercentBounds,
) -> Result<LayoutState, LayoutError> {
    let mut next = state.clone();
    match op {
        LayoutOp::AddPanel { panel } => {
            next.panels = state.panels.add(clamp_panel(panel, bounds))?;
        }
        LayoutOp::RemovePanel { id } => remove(&mut next, state, id)?,
        LayoutOp::ClosePanel { id } => {
            let panel = state
                .panels
                .get(id)
                .ok_or_else(|| LayoutError::NotFound { id: id.clone() })?;
            if !panel.closable {
                return Err(LayoutError::NotClosable { id: id.clone() });
            }
            remove(&mut next, state, id)?;
        }
        LayoutOp::UpdatePanel { id, patch } => {
            // Re-clamp both axes: the patch may have narrowed the panel range.
            next.panels = state.panels.update(id, patch)?.map(|panel| {
                if &panel.id == id {
                    clamp_panel(panel, bounds)
                } else {
                    panel.clone()
                }
            });
        }
        LayoutOp::ToggleCollapse { id } => {
            next.panels = state.panels.toggle_collapsed(id)?;
        }
        LayoutOp::ToggleFullscreen { id: None } => {
            next.fullscreen_panel_id = None;
        }
        LayoutOp::ToggleFullscreen { id: Some(id) } => {
            if !state.panels.contains(id) {
                return Err(LayoutError::NotFound { id: id.clone() });
            }
            next.fullscreen_panel_id = if state.fullscreen_panel_id.as_ref() == Some(id) {
                None
            } else {
                Some(id.clone())
            };
        }
        LayoutOp::SetSidebarCollapsed { collapsed } => next.sidebar_collapsed = *collapsed,
        LayoutOp::SetHeaderVisible { visible } => next.header_visible = *visible,
        LayoutOp::SetFooterVisible { visible } => next.footer_visible = *visible,
    }
    Ok(next)
}

fn remove(next: &mut LayoutState, state: &LayoutState, id: &PanelId) -> Result<(), LayoutError> {
    let (panels, _removed) = state.panels.remove(id)?;
    next.panels = panels;
    if state.fullscreen_panel_id.as_ref() == Some(id) {
        next.fullscreen_panel_id = None;
    }
    Ok(())
}
