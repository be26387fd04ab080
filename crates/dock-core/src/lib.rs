#![forbid(unsafe_code)]

//! Core: input vocabulary and geometry for the dockspace layout engine.
//!
//! # Role in dockspace
//! `dock-core` is the input layer. It owns the normalized key and pointer
//! event types, the fixed keyboard shortcut table, and the floating-point
//! geometry used to express panel sizes as workspace percentages.
//!
//! # How it fits in the system
//! The layout engine (`dock-layout`) consumes these types and never talks to
//! a UI toolkit directly. Hosts translate their native events into
//! [`event::KeyEvent`] and [`event::PointerPosition`] values before calling
//! into the engine.

pub mod event;
pub mod geometry;
pub mod keybinding;
