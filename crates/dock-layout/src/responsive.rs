#![forbid(unsafe_code)]

//! Breakpoint-crossing sidebar rule.
//!
//! The sidebar auto-collapses when the viewport narrows below
//! [`SIDEBAR_BREAKPOINT_PX`] and auto-expands when it widens back. The rule
//! fires only when the viewport *crosses* the breakpoint, so a manual sidebar
//! toggle survives every resize tick that stays on the same side.
//!
//! # Invariants
//!
//! 1. The first observed width counts as a crossing only when it is narrow
//!    (a narrow mount collapses; a wide mount keeps the persisted choice).
//! 2. Widths on the same side as the previous observation never produce a
//!    decision.
//! 3. A decision is suppressed when the sidebar is already in the target
//!    state, so the rule never emits a redundant change.

/// Viewport width (px) below which the sidebar collapses.
pub const SIDEBAR_BREAKPOINT_PX: f64 = 768.0;

/// Which side of the breakpoint a width falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportClass {
    Narrow,
    Wide,
}

impl ViewportClass {
    #[must_use]
    pub fn of(width: f64) -> Self {
        if width < SIDEBAR_BREAKPOINT_PX {
            Self::Narrow
        } else {
            Self::Wide
        }
    }
}

/// Tracks the last observed viewport class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SidebarResponder {
    last: Option<ViewportClass>,
}

impl SidebarResponder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn last_class(&self) -> Option<ViewportClass> {
        self.last
    }

    /// Observe a viewport width. Returns `Some(collapsed)` when the sidebar
    /// should change to `collapsed`, `None` otherwise.
    pub fn observe(&mut self, width: f64, sidebar_collapsed: bool) -> Option<bool> {
        if !width.is_finite() {
            return None;
        }
        let class = ViewportClass::of(width);
        let previous = self.last.replace(class);
        let crossed = match previous {
            None => class == ViewportClass::Narrow,
            Some(prev) => prev != class,
        };
        if !crossed {
            return None;
        }
        let target = class == ViewportClass::Narrow;
        (target != sidebar_collapsed).then_some(target)
    }
}
