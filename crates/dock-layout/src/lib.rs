#![forbid(unsafe_code)]

//! Layout: the dockable panel engine.
//!
//! # Role in dockspace
//! `dock-layout` owns the workspace aggregate ([`LayoutState`]), the panel
//! registry, the pointer-drag resize machine, the responsive sidebar rule and
//! the persisted snapshot format. [`LayoutEngine`] ties them together behind
//! one commit path.
//!
//! # Quick start
//! ```
//! use dock_core::event::PointerPosition;
//! use dock_core::geometry::WorkspaceBounds;
//! use dock_layout::{LayoutEngine, PanelDescriptor, PanelId};
//!
//! let mut engine = LayoutEngine::builder("trading")
//!     .mount([PanelDescriptor::new("chart", "Chart")])
//!     .unwrap();
//! let chart = PanelId::new("chart");
//!
//! engine.handle_resize_start(&chart, PointerPosition::new(500.0, 300.0));
//! engine.handle_resize_move(PointerPosition::new(550.0, 300.0), WorkspaceBounds::new(1000.0, 600.0));
//! engine.handle_resize_end();
//!
//! assert_eq!(engine.state().panel(&chart).unwrap().width, 55.0);
//! ```

pub mod config;
pub mod drag;
pub mod engine;
pub mod frame;
pub mod panel;
pub mod persistence;
pub mod registry;
pub mod responsive;
pub mod snapshot;
pub mod state;

pub use config::EngineConfig;
pub use drag::{
    DragCancelReason, DragNoopReason, DragResizeEffect, DragResizeMachine, DragResizeState,
    DragResizeTransition, DragSession,
};
pub use engine::{ChangeListener, KeyOutcome, LayoutEngine, LayoutEngineBuilder};
pub use frame::{PanelChrome, PanelFrame, WorkspaceFrame};
pub use panel::{DockPosition, PanelContent, PanelDescriptor, PanelId, PanelPatch};
pub use persistence::{LayoutStore, LoadOutcome, MemoryStore, PersistenceWarning, StoreError};
pub use registry::{LayoutError, PanelRegistry};
pub use responsive::{SIDEBAR_BREAKPOINT_PX, SidebarResponder, ViewportClass};
pub use snapshot::{LAYOUT_SCHEMA_VERSION, LayoutSnapshot, SanitizeNote, SnapshotError};
pub use state::{LayoutOp, LayoutState, apply};
