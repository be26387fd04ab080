#![forbid(unsafe_code)]

//! Pointer-drag resize lifecycle.
//!
//! ```text
//! Idle --start--> Dragging --move--> Dragging --end--> Idle
//!                    \--------------cancel------------> Idle
//! ```
//!
//! The machine receives an unbounded stream of moves between one `start` and
//! one `end`. It never touches the registry itself: every accepted move
//! yields a [`DragResizeEffect::Updated`] carrying the clamped geometry the
//! engine should write back.
//!
//! # Invariants
//!
//! 1. At most one session is active. A `start` while dragging is rejected
//!    with [`DragNoopReason::ActiveDragAlreadyInProgress`]; the first gesture
//!    keeps ownership.
//! 2. Geometry is always computed from the origin captured at `start`, never
//!    accumulated move by move, so repeated identical moves are stable.
//! 3. Moves and ends while idle are no-ops, never errors.

use dock_core::event::PointerPosition;
use dock_core::geometry::{PercentBounds, WorkspaceBounds};
use serde::{Deserialize, Serialize};

use crate::panel::{PanelDescriptor, PanelId};

/// Captured origin of an in-progress resize gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragSession {
    pub target: PanelId,
    pub origin: PointerPosition,
    pub origin_width: f64,
    pub origin_height: f64,
    /// Clamp for this gesture: the engine bounds narrowed by the panel range.
    pub bounds: PercentBounds,
    /// Whether any move was applied since `start`.
    pub moved: bool,
}

/// Lifecycle state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragResizeState {
    #[default]
    Idle,
    Dragging { session: DragSession },
}

/// Why a lifecycle event was safely ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragNoopReason {
    IdleWithoutActiveDrag,
    ActiveDragAlreadyInProgress,
    ResizingDisabled,
    PanelNotFound,
    PanelNotResizable,
    DegenerateWorkspace,
}

/// Why an active session was torn down without an `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragCancelReason {
    /// The target panel disappeared mid-gesture.
    TargetRemoved,
    /// Host requested cancellation (focus loss, escape, teardown).
    Programmatic,
}

/// Transition effect emitted by one lifecycle step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DragResizeEffect {
    Started {
        target: PanelId,
        origin: PointerPosition,
    },
    /// New geometry for the target. `None` leaves that axis unchanged.
    Updated {
        target: PanelId,
        width: Option<f64>,
        height: Option<f64>,
    },
    Ended {
        target: PanelId,
        moved: bool,
    },
    Canceled {
        target: PanelId,
        reason: DragCancelReason,
    },
    Noop {
        reason: DragNoopReason,
    },
}

/// One state-machine transition with a monotonic id for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragResizeTransition {
    pub transition_id: u64,
    pub effect: DragResizeEffect,
}

/// Runtime lifecycle machine for pointer resize gestures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragResizeMachine {
    state: DragResizeState,
    resizing_enabled: bool,
    bounds: PercentBounds,
    transition_counter: u64,
}

impl Default for DragResizeMachine {
    fn default() -> Self {
        Self::new(true, PercentBounds::default())
    }
}

impl DragResizeMachine {
    #[must_use]
    pub fn new(resizing_enabled: bool, bounds: PercentBounds) -> Self {
        Self {
            state: DragResizeState::Idle,
            resizing_enabled,
            bounds,
            transition_counter: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> &DragResizeState {
        &self.state
    }

    /// The active session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragResizeState::Idle => None,
            DragResizeState::Dragging { session } => Some(session),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.state, DragResizeState::Dragging { .. })
    }

    /// Begin a gesture on `panel` (`None` when the id is not registered).
    pub fn start(
        &mut self,
        panel: Option<&PanelDescriptor>,
        pointer: PointerPosition,
    ) -> DragResizeTransition {
        let effect = if self.is_active() {
            noop(DragNoopReason::ActiveDragAlreadyInProgress)
        } else if !self.resizing_enabled {
            noop(DragNoopReason::ResizingDisabled)
        } else {
            match panel {
                None => noop(DragNoopReason::PanelNotFound),
                Some(panel) if !panel.resizable => noop(DragNoopReason::PanelNotResizable),
                Some(panel) => {
                    self.state = DragResizeState::Dragging {
                        session: DragSession {
                            target: panel.id.clone(),
                            origin: pointer,
                            origin_width: panel.width,
                            origin_height: panel.height,
                            bounds: panel.percent_bounds(self.bounds),
                            moved: false,
                        },
                    };
                    DragResizeEffect::Started {
                        target: panel.id.clone(),
                        origin: pointer,
                    }
                }
            }
        };
        self.emit(effect)
    }

    /// Track the pointer. `workspace` is the current workspace bounding box
    /// used to convert pixel deltas into percentages.
    pub fn move_to(
        &mut self,
        pointer: PointerPosition,
        workspace: WorkspaceBounds,
    ) -> DragResizeTransition {
        let effect = match &mut self.state {
            DragResizeState::Idle => noop(DragNoopReason::IdleWithoutActiveDrag),
            DragResizeState::Dragging { session } => {
                let bounds = session.bounds;
                let (dx, dy) = pointer.delta_from(session.origin);
                let width = workspace
                    .width_percent(dx)
                    .map(|delta| bounds.clamp(session.origin_width + delta));
                let height = workspace
                    .height_percent(dy)
                    .map(|delta| bounds.clamp(session.origin_height + delta));
                if width.is_none() && height.is_none() {
                    noop(DragNoopReason::DegenerateWorkspace)
                } else {
                    session.moved = true;
                    DragResizeEffect::Updated {
                        target: session.target.clone(),
                        width,
                        height,
                    }
                }
            }
        };
        self.emit(effect)
    }

    /// Finish the gesture. An end without moves leaves geometry unchanged.
    pub fn end(&mut self) -> DragResizeTransition {
        let effect = match std::mem::take(&mut self.state) {
            DragResizeState::Idle => noop(DragNoopReason::IdleWithoutActiveDrag),
            DragResizeState::Dragging { session } => DragResizeEffect::Ended {
                target: session.target,
                moved: session.moved,
            },
        };
        self.emit(effect)
    }

    /// Unconditionally return to idle. Returns `None` if already idle.
    pub fn force_cancel(&mut self, reason: DragCancelReason) -> Option<DragResizeTransition> {
        match std::mem::take(&mut self.state) {
            DragResizeState::Idle => None,
            DragResizeState::Dragging { session } => Some(self.emit(DragResizeEffect::Canceled {
                target: session.target,
                reason,
            })),
        }
    }

    fn emit(&mut self, effect: DragResizeEffect) -> DragResizeTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        DragResizeTransition {
            transition_id: self.transition_counter,
            effect,
        }
    }
}

fn noop(reason: DragNoopReason) -> DragResizeEffect {
    DragResizeEffect::Noop { reason }
}
