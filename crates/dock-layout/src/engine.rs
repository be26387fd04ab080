#![forbid(unsafe_code)]

//! The layout engine: owns one [`LayoutState`] and wires the drag machine,
//! responsive rule, keyboard surface and store around it.
//!
//! Every successful operation follows the same commit path:
//!
//! ```text
//! op --apply--> new state --swap--> persist (if enabled) --> on_change
//! ```
//!
//! A failed operation returns its [`LayoutError`] and leaves the state,
//! store and listener untouched. A failed write is recorded as a
//! [`PersistenceWarning`] and logged; the new state is still committed and
//! still reported to the listener.

use std::fmt;

use dock_core::event::{KeyEvent, PointerPosition};
use dock_core::geometry::{PercentBounds, WorkspaceBounds};
use dock_core::keybinding::{self, ShortcutAction, ShortcutContext};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::drag::{DragCancelReason, DragResizeEffect, DragResizeMachine, DragResizeTransition};
use crate::frame::WorkspaceFrame;
use crate::panel::{PanelDescriptor, PanelId, PanelPatch};
use crate::persistence::{
    LayoutStore, LoadOutcome, MemoryStore, PersistenceWarning, load_state, save_state,
};
use crate::registry::{LayoutError, PanelRegistry};
use crate::responsive::SidebarResponder;
use crate::state::{LayoutOp, LayoutState, apply, clamp_panel};

/// Callback receiving the full new state after every committed operation.
pub type ChangeListener = Box<dyn FnMut(&LayoutState)>;

/// What the engine did with a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled(ShortcutAction),
    /// Not a layout shortcut (or nothing to act on); the host should route it.
    PassThrough,
}

/// Configures and mounts a [`LayoutEngine`].
pub struct LayoutEngineBuilder {
    layout_id: String,
    config: EngineConfig,
    store: Box<dyn LayoutStore>,
    on_change: Option<ChangeListener>,
}

impl LayoutEngineBuilder {
    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn store(mut self, store: impl LayoutStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    #[must_use]
    pub fn on_change(mut self, listener: impl FnMut(&LayoutState) + 'static) -> Self {
        self.on_change = Some(Box::new(listener));
        self
    }

    /// Build the engine. The stored snapshot under the layout id wins over
    /// `initial_panels` when it loads cleanly.
    ///
    /// Fails only when `initial_panels` contains a duplicate id.
    pub fn mount(
        self,
        initial_panels: impl IntoIterator<Item = PanelDescriptor>,
    ) -> Result<LayoutEngine, LayoutError> {
        let bounds = self.config.percent_bounds();
        let initial =
            PanelRegistry::from_panels(initial_panels.into_iter().map(|p| clamp_panel(&p, bounds)))?;

        let mut last_persist_warning = None;
        let state = if self.config.persistence_enabled {
            match load_state(self.store.as_ref(), &self.layout_id, bounds) {
                LoadOutcome::Restored { state, notes } => {
                    debug!(
                        layout_id = %self.layout_id,
                        panels = state.panels().len(),
                        repairs = notes.len(),
                        "restored persisted layout"
                    );
                    state
                }
                LoadOutcome::Missing => LayoutState::new(initial.clone()),
                LoadOutcome::Rejected(warning) => {
                    warn!(layout_id = %self.layout_id, %warning, "falling back to initial panels");
                    last_persist_warning = Some(warning);
                    LayoutState::new(initial.clone())
                }
            }
        } else {
            LayoutState::new(initial.clone())
        };

        Ok(LayoutEngine {
            drag: DragResizeMachine::new(self.config.resizing_enabled, bounds),
            layout_id: self.layout_id,
            config: self.config,
            bounds,
            store: self.store,
            on_change: self.on_change,
            initial,
            state,
            responder: SidebarResponder::new(),
            last_interacted: None,
            last_persist_warning,
        })
    }
}

/// Stateful engine for one layout id.
pub struct LayoutEngine {
    layout_id: String,
    config: EngineConfig,
    bounds: PercentBounds,
    store: Box<dyn LayoutStore>,
    on_change: Option<ChangeListener>,
    initial: PanelRegistry,
    state: LayoutState,
    drag: DragResizeMachine,
    responder: SidebarResponder,
    last_interacted: Option<PanelId>,
    last_persist_warning: Option<PersistenceWarning>,
}

impl fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("layout_id", &self.layout_id)
            .field("config", &self.config)
            .field("state", &self.state)
            .field("drag", &self.drag)
            .field("last_interacted", &self.last_interacted)
            .field("last_persist_warning", &self.last_persist_warning)
            .finish_non_exhaustive()
    }
}

impl LayoutEngine {
    /// Start configuring an engine backed by a fresh [`MemoryStore`].
    #[must_use]
    pub fn builder(layout_id: impl Into<String>) -> LayoutEngineBuilder {
        LayoutEngineBuilder {
            layout_id: layout_id.into(),
            config: EngineConfig::default(),
            store: Box::new(MemoryStore::new()),
            on_change: None,
        }
    }

    #[must_use]
    pub fn layout_id(&self) -> &str {
        &self.layout_id
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    #[must_use]
    pub fn drag(&self) -> &DragResizeMachine {
        &self.drag
    }

    /// The panel keyboard fullscreen acts on when nothing is fullscreen.
    #[must_use]
    pub fn last_interacted(&self) -> Option<&PanelId> {
        self.last_interacted.as_ref()
    }

    /// Most recent non-fatal persistence problem; cleared by the next
    /// successful write.
    #[must_use]
    pub fn last_persist_warning(&self) -> Option<&PersistenceWarning> {
        self.last_persist_warning.as_ref()
    }

    /// Rendered geometry for the current state.
    #[must_use]
    pub fn frame(&self) -> WorkspaceFrame {
        WorkspaceFrame::project(&self.state, &self.config)
    }

    pub fn add_panel(&mut self, panel: PanelDescriptor) -> Result<(), LayoutError> {
        self.dispatch(LayoutOp::AddPanel { panel })
    }

    pub fn remove_panel(&mut self, id: &PanelId) -> Result<(), LayoutError> {
        self.dispatch(LayoutOp::RemovePanel { id: id.clone() })
    }

    pub fn close_panel(&mut self, id: &PanelId) -> Result<(), LayoutError> {
        self.dispatch(LayoutOp::ClosePanel { id: id.clone() })
    }

    pub fn update_panel(&mut self, id: &PanelId, patch: PanelPatch) -> Result<(), LayoutError> {
        self.dispatch(LayoutOp::UpdatePanel {
            id: id.clone(),
            patch,
        })
    }

    pub fn toggle_collapse(&mut self, id: &PanelId) -> Result<(), LayoutError> {
        self.dispatch(LayoutOp::ToggleCollapse { id: id.clone() })
    }

    pub fn toggle_fullscreen(&mut self, id: Option<&PanelId>) -> Result<(), LayoutError> {
        self.dispatch(LayoutOp::ToggleFullscreen { id: id.cloned() })
    }

    pub fn set_sidebar_collapsed(&mut self, collapsed: bool) {
        self.commit_infallible(LayoutOp::SetSidebarCollapsed { collapsed });
    }

    pub fn set_header_visible(&mut self, visible: bool) {
        self.commit_infallible(LayoutOp::SetHeaderVisible { visible });
    }

    pub fn set_footer_visible(&mut self, visible: bool) {
        self.commit_infallible(LayoutOp::SetFooterVisible { visible });
    }

    /// Apply one operation through the commit path.
    pub fn dispatch(&mut self, op: LayoutOp) -> Result<(), LayoutError> {
        let next = match apply(&self.state, &op, self.bounds) {
            Ok(next) => next,
            Err(err) => {
                debug!(layout_id = %self.layout_id, op = op.kind(), %err, "rejected layout operation");
                return Err(err);
            }
        };

        match &op {
            LayoutOp::RemovePanel { id } | LayoutOp::ClosePanel { id } => self.forget(id),
            LayoutOp::AddPanel { panel } => self.last_interacted = Some(panel.id.clone()),
            LayoutOp::UpdatePanel { id, .. }
            | LayoutOp::ToggleCollapse { id }
            | LayoutOp::ToggleFullscreen { id: Some(id) } => {
                self.last_interacted = Some(id.clone());
            }
            _ => {}
        }

        debug!(
            layout_id = %self.layout_id,
            op = op.kind(),
            target = op.target().map(PanelId::as_str),
            "applied layout operation"
        );
        self.replace(next);
        Ok(())
    }

    /// Begin a resize gesture on `id`.
    pub fn handle_resize_start(
        &mut self,
        id: &PanelId,
        pointer: PointerPosition,
    ) -> DragResizeTransition {
        let transition = self.drag.start(self.state.panel(id), pointer);
        if let DragResizeEffect::Started { target, .. } = &transition.effect {
            self.last_interacted = Some(target.clone());
        }
        log_transition(&self.layout_id, &transition);
        transition
    }

    /// Track the pointer. Each accepted move commits the new geometry.
    pub fn handle_resize_move(
        &mut self,
        pointer: PointerPosition,
        workspace: WorkspaceBounds,
    ) -> DragResizeTransition {
        let transition = self.drag.move_to(pointer, workspace);
        log_transition(&self.layout_id, &transition);
        if let DragResizeEffect::Updated {
            target,
            width,
            height,
        } = &transition.effect
        {
            let collapsed = self.state.panel(target).is_some_and(|p| p.collapsed);
            let patch = PanelPatch {
                width: *width,
                height: if collapsed { None } else { *height },
                ..PanelPatch::default()
            };
            if patch.touches_geometry()
                && let Err(err) = self.dispatch(LayoutOp::UpdatePanel {
                    id: target.clone(),
                    patch,
                })
            {
                warn!(layout_id = %self.layout_id, %err, "drag target vanished");
                self.drag.force_cancel(DragCancelReason::TargetRemoved);
            }
        }
        transition
    }

    /// Finish the gesture. Geometry stays where the last move left it.
    pub fn handle_resize_end(&mut self) -> DragResizeTransition {
        let transition = self.drag.end();
        log_transition(&self.layout_id, &transition);
        transition
    }

    /// Abort an active gesture. `None` when no gesture is active.
    pub fn cancel_drag(&mut self) -> Option<DragResizeTransition> {
        let transition = self.drag.force_cancel(DragCancelReason::Programmatic)?;
        log_transition(&self.layout_id, &transition);
        Some(transition)
    }

    /// Observe the viewport width. Returns the new sidebar state when the
    /// breakpoint rule changed it.
    pub fn handle_viewport_resize(&mut self, width: f64) -> Option<bool> {
        let collapsed = self.responder.observe(width, self.state.sidebar_collapsed())?;
        debug!(layout_id = %self.layout_id, width, collapsed, "viewport crossed sidebar breakpoint");
        self.set_sidebar_collapsed(collapsed);
        Some(collapsed)
    }

    /// Route a key event through the fixed shortcut table.
    pub fn handle_keyboard(&mut self, event: &KeyEvent) -> KeyOutcome {
        let ctx = ShortcutContext {
            fullscreen_active: self.state.fullscreen_panel_id().is_some(),
        };
        let Some(action) = keybinding::resolve(event, &ctx) else {
            return KeyOutcome::PassThrough;
        };
        match action {
            ShortcutAction::ToggleFullscreen if ctx.fullscreen_active => {
                self.commit_infallible(LayoutOp::ToggleFullscreen { id: None });
            }
            ShortcutAction::ToggleFullscreen => {
                let Some(target) = self.keyboard_target() else {
                    return KeyOutcome::PassThrough;
                };
                self.commit_infallible(LayoutOp::ToggleFullscreen { id: Some(target) });
            }
            ShortcutAction::ExitFullscreen => {
                self.commit_infallible(LayoutOp::ToggleFullscreen { id: None });
            }
            ShortcutAction::ToggleSidebar => {
                self.set_sidebar_collapsed(!self.state.sidebar_collapsed());
            }
            ShortcutAction::ToggleHeader => {
                self.set_header_visible(!self.state.header_visible());
            }
        }
        KeyOutcome::Handled(action)
    }

    /// Restore the mount-time panel set and default workspace flags.
    pub fn reset_layout(&mut self) {
        if let Some(transition) = self.drag.force_cancel(DragCancelReason::Programmatic) {
            log_transition(&self.layout_id, &transition);
        }
        self.last_interacted = None;
        debug!(layout_id = %self.layout_id, panels = self.initial.len(), "reset layout");
        self.replace(LayoutState::new(self.initial.clone()));
    }

    fn keyboard_target(&self) -> Option<PanelId> {
        self.last_interacted
            .as_ref()
            .filter(|id| self.state.panels().contains(id))
            .or_else(|| self.state.panels().iter().next().map(|p| &p.id))
            .cloned()
    }

    fn forget(&mut self, id: &PanelId) {
        if self.last_interacted.as_ref() == Some(id) {
            self.last_interacted = None;
        }
        if self.drag.session().is_some_and(|s| &s.target == id)
            && let Some(transition) = self.drag.force_cancel(DragCancelReason::TargetRemoved)
        {
            warn!(layout_id = %self.layout_id, panel = %id, "drag target removed mid-gesture");
            log_transition(&self.layout_id, &transition);
        }
    }

    /// Ops that cannot fail against any state (flags, fullscreen exit, or a
    /// fullscreen target already checked to exist).
    fn commit_infallible(&mut self, op: LayoutOp) {
        if let Err(err) = self.dispatch(op) {
            warn!(layout_id = %self.layout_id, %err, "unexpected layout rejection");
        }
    }

    fn replace(&mut self, next: LayoutState) {
        self.state = next;
        if self.config.persistence_enabled {
            match save_state(self.store.as_ref(), &self.layout_id, &self.state) {
                Ok(()) => self.last_persist_warning = None,
                Err(warning) => {
                    warn!(layout_id = %self.layout_id, %warning, "layout not persisted");
                    self.last_persist_warning = Some(warning);
                }
            }
        }
        if let Some(listener) = self.on_change.as_mut() {
            listener(&self.state);
        }
    }
}

fn log_transition(layout_id: &str, transition: &DragResizeTransition) {
    debug!(
        layout_id,
        transition_id = transition.transition_id,
        effect = ?transition.effect,
        "drag transition"
    );
}
