//! Keyboard shortcut mapping.
//!
//! Maps `KeyboardEvent.key` values plus modifiers to semantic actions so
//! that every host binds the same keys.

use crate::input::Modifiers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Abort drawing or dragging and close the open menu.
    Cancel,
    /// Delete the node under the pointer.
    DeleteHovered,
    ZoomIn,
    ZoomOut,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action, `None` when the key is unbound.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        if modifiers.alt {
            return None;
        }
        match key {
            "Escape" => Some(ShortcutAction::Cancel),
            "Delete" | "Backspace" if !modifiers.command() => Some(ShortcutAction::DeleteHovered),
            "+" | "=" => Some(ShortcutAction::ZoomIn),
            "-" | "_" => Some(ShortcutAction::ZoomOut),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_plain_keys() {
        assert_eq!(
            ShortcutMap::resolve("Escape", Modifiers::NONE),
            Some(ShortcutAction::Cancel)
        );
        assert_eq!(
            ShortcutMap::resolve("Delete", Modifiers::NONE),
            Some(ShortcutAction::DeleteHovered)
        );
        assert_eq!(
            ShortcutMap::resolve("Backspace", Modifiers::NONE),
            Some(ShortcutAction::DeleteHovered)
        );
        assert_eq!(ShortcutMap::resolve("a", Modifiers::NONE), None);
    }

    #[test]
    fn resolve_zoom_with_and_without_shift() {
        let shift = Modifiers {
            shift: true,
            ..Modifiers::NONE
        };
        assert_eq!(ShortcutMap::resolve("+", shift), Some(ShortcutAction::ZoomIn));
        assert_eq!(
            ShortcutMap::resolve("=", Modifiers::NONE),
            Some(ShortcutAction::ZoomIn)
        );
        assert_eq!(
            ShortcutMap::resolve("-", Modifiers::NONE),
            Some(ShortcutAction::ZoomOut)
        );
    }

    #[test]
    fn command_delete_is_left_to_the_host() {
        let cmd = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert_eq!(ShortcutMap::resolve("Delete", cmd), None);
        let alt = Modifiers {
            alt: true,
            ..Modifiers::NONE
        };
        assert_eq!(ShortcutMap::resolve("Escape", alt), None);
    }
}
