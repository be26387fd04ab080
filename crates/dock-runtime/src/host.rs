//! Host adapter: one entry point for every input a dashboard shell produces.
//!
//! A host translates its native events into [`DockEvent`] values and feeds
//! them to [`DockHost::handle`]. The host owns the current workspace size,
//! so pointer moves only carry coordinates.

use dock_core::event::{KeyEvent, PointerPosition};
use dock_core::geometry::WorkspaceBounds;
use dock_layout::{DragResizeTransition, KeyOutcome, LayoutEngine, PanelId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Normalized host input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DockEvent {
    Key { key: KeyEvent },
    /// Pointer pressed on a panel's resize handle.
    PointerDown { panel: PanelId, x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    ViewportResize { width: f64, height: f64 },
}

/// What handling one event produced.
#[derive(Debug, Clone, PartialEq)]
pub enum HostOutcome {
    Key(KeyOutcome),
    Drag(DragResizeTransition),
    /// New sidebar state when the breakpoint rule fired.
    Viewport(Option<bool>),
}

#[derive(Debug)]
pub struct DockHost {
    engine: LayoutEngine,
    workspace: WorkspaceBounds,
}

impl DockHost {
    #[must_use]
    pub fn new(engine: LayoutEngine, workspace: WorkspaceBounds) -> Self {
        Self { engine, workspace }
    }

    #[must_use]
    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut LayoutEngine {
        &mut self.engine
    }

    #[must_use]
    pub fn workspace(&self) -> WorkspaceBounds {
        self.workspace
    }

    #[must_use]
    pub fn into_engine(self) -> LayoutEngine {
        self.engine
    }

    pub fn handle(&mut self, event: &DockEvent) -> HostOutcome {
        match event {
            DockEvent::Key { key } => HostOutcome::Key(self.engine.handle_keyboard(key)),
            DockEvent::PointerDown { panel, x, y } => HostOutcome::Drag(
                self.engine
                    .handle_resize_start(panel, PointerPosition::new(*x, *y)),
            ),
            DockEvent::PointerMove { x, y } => HostOutcome::Drag(
                self.engine
                    .handle_resize_move(PointerPosition::new(*x, *y), self.workspace),
            ),
            DockEvent::PointerUp => HostOutcome::Drag(self.engine.handle_resize_end()),
            DockEvent::ViewportResize { width, height } => {
                self.workspace = WorkspaceBounds::new(*width, *height);
                debug!(width, height, "workspace resized");
                HostOutcome::Viewport(self.engine.handle_viewport_resize(*width))
            }
        }
    }
}
