#![forbid(unsafe_code)]

//! Fixed keyboard shortcut table for the workspace.
//!
//! The shortcut surface is intentionally not remappable. Each recognized
//! combination resolves to a [`ShortcutAction`]; everything else resolves to
//! `None`, which hosts must treat as "pass through" (do not prevent the
//! default behavior of the key).
//!
//! | Combination      | Action                                        |
//! |------------------|-----------------------------------------------|
//! | `Ctrl+Shift+F`   | toggle fullscreen                             |
//! | `Ctrl+B`         | toggle sidebar                                |
//! | `Ctrl+Shift+H`   | toggle header                                 |
//! | `Escape`         | exit fullscreen (only while one is active)    |
//!
//! # Example
//!
//! ```
//! use dock_core::event::{KeyCode, KeyEvent, Modifiers};
//! use dock_core::keybinding::{ShortcutAction, ShortcutContext, resolve};
//!
//! let ctx = ShortcutContext { fullscreen_active: true };
//! let esc = KeyEvent::new(KeyCode::Escape);
//! assert_eq!(resolve(&esc, &ctx), Some(ShortcutAction::ExitFullscreen));
//!
//! let idle = ShortcutContext::default();
//! assert_eq!(resolve(&esc, &idle), None);
//!
//! let ctrl_b = KeyEvent::new(KeyCode::Char('b')).with_modifiers(Modifiers::CTRL);
//! assert_eq!(resolve(&ctrl_b, &idle), Some(ShortcutAction::ToggleSidebar));
//! ```

use serde::{Deserialize, Serialize};

use crate::event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};

/// Workspace command produced by a recognized shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutAction {
    ToggleFullscreen,
    ToggleSidebar,
    ToggleHeader,
    ExitFullscreen,
}

/// Runtime flags that affect shortcut resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShortcutContext {
    /// A panel is currently fullscreen.
    pub fullscreen_active: bool,
}

/// One row of the shortcut table, for help overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortcutBinding {
    pub modifiers: Modifiers,
    pub code: KeyCode,
    pub action: ShortcutAction,
    pub description: &'static str,
}

impl ShortcutBinding {
    /// Human-readable chord, e.g. `Ctrl+Shift+F`.
    #[must_use]
    pub fn chord(&self) -> String {
        let mut parts: Vec<String> = [
            (Modifiers::CTRL, "Ctrl"),
            (Modifiers::ALT, "Alt"),
            (Modifiers::SHIFT, "Shift"),
            (Modifiers::SUPER, "Super"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.modifiers.contains(*flag))
        .map(|(_, name)| name.to_owned())
        .collect();
        parts.push(match self.code {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Enter => "Enter".to_owned(),
            KeyCode::Escape => "Escape".to_owned(),
            KeyCode::Tab => "Tab".to_owned(),
            KeyCode::Backspace => "Backspace".to_owned(),
            KeyCode::F(n) => format!("F{n}"),
        });
        parts.join("+")
    }
}

/// The complete shortcut table.
pub const SHORTCUTS: [ShortcutBinding; 4] = [
    ShortcutBinding {
        modifiers: Modifiers::CTRL.union(Modifiers::SHIFT),
        code: KeyCode::Char('f'),
        action: ShortcutAction::ToggleFullscreen,
        description: "Toggle fullscreen",
    },
    ShortcutBinding {
        modifiers: Modifiers::CTRL,
        code: KeyCode::Char('b'),
        action: ShortcutAction::ToggleSidebar,
        description: "Toggle sidebar",
    },
    ShortcutBinding {
        modifiers: Modifiers::CTRL.union(Modifiers::SHIFT),
        code: KeyCode::Char('h'),
        action: ShortcutAction::ToggleHeader,
        description: "Toggle header",
    },
    ShortcutBinding {
        modifiers: Modifiers::NONE,
        code: KeyCode::Escape,
        action: ShortcutAction::ExitFullscreen,
        description: "Exit fullscreen",
    },
];

/// Resolve a key event against the fixed shortcut table.
///
/// Only `Press` events participate. Modifier sets must match exactly, so
/// `Ctrl+Alt+B` is not `Ctrl+B`.
#[must_use]
pub fn resolve(event: &KeyEvent, ctx: &ShortcutContext) -> Option<ShortcutAction> {
    if event.kind != KeyEventKind::Press {
        return None;
    }

    let binding = SHORTCUTS
        .iter()
        .find(|binding| binding.modifiers == event.modifiers && matches_code(binding.code, event))?;

    match binding.action {
        ShortcutAction::ExitFullscreen if !ctx.fullscreen_active => None,
        action => Some(action),
    }
}

fn matches_code(code: KeyCode, event: &KeyEvent) -> bool {
    match code {
        KeyCode::Char(c) => event.is_char(c),
        other => other == event.code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(c: char, modifiers: Modifiers) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c)).with_modifiers(modifiers)
    }

    #[test]
    fn chords_render_for_help() {
        let chords: Vec<String> = SHORTCUTS.iter().map(ShortcutBinding::chord).collect();
        assert_eq!(chords, ["Ctrl+Shift+F", "Ctrl+B", "Ctrl+Shift+H", "Escape"]);
    }

    #[test]
    fn recognized_combinations() {
        let ctx = ShortcutContext::default();
        let ctrl_shift = Modifiers::CTRL | Modifiers::SHIFT;
        assert_eq!(
            resolve(&chord('f', ctrl_shift), &ctx),
            Some(ShortcutAction::ToggleFullscreen)
        );
        assert_eq!(
            resolve(&chord('F', ctrl_shift), &ctx),
            Some(ShortcutAction::ToggleFullscreen)
        );
        assert_eq!(
            resolve(&chord('b', Modifiers::CTRL), &ctx),
            Some(ShortcutAction::ToggleSidebar)
        );
        assert_eq!(
            resolve(&chord('H', ctrl_shift), &ctx),
            Some(ShortcutAction::ToggleHeader)
        );
    }

    #[test]
    fn escape_only_exits_while_fullscreen() {
        let esc = KeyEvent::new(KeyCode::Escape);
        assert_eq!(resolve(&esc, &ShortcutContext::default()), None);
        let ctx = ShortcutContext {
            fullscreen_active: true,
        };
        assert_eq!(resolve(&esc, &ctx), Some(ShortcutAction::ExitFullscreen));

        let shift_esc = esc.with_modifiers(Modifiers::SHIFT);
        assert_eq!(resolve(&shift_esc, &ctx), None);
    }

    #[test]
    fn unrecognized_combinations_pass_through() {
        let ctx = ShortcutContext::default();
        assert_eq!(resolve(&chord('b', Modifiers::NONE), &ctx), None);
        assert_eq!(resolve(&chord('b', Modifiers::CTRL | Modifiers::ALT), &ctx), None);
        assert_eq!(resolve(&chord('f', Modifiers::CTRL), &ctx), None);
        assert_eq!(resolve(&KeyEvent::new(KeyCode::Enter), &ctx), None);
    }

    #[test]
    fn repeat_and_release_are_ignored() {
        let ctx = ShortcutContext::default();
        let ctrl_b = chord('b', Modifiers::CTRL);
        assert_eq!(resolve(&ctrl_b.with_kind(KeyEventKind::Repeat), &ctx), None);
        assert_eq!(resolve(&ctrl_b.with_kind(KeyEventKind::Release), &ctx), None);
    }
}
