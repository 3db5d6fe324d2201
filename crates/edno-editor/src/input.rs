//! Input abstraction layer.
//!
//! Hosts translate their toolkit's mouse and keyboard events into
//! `InputEvent`s. Coordinates are in screen space; the canvas maps them to
//! logical diagram space before any geometry runs.

use edno_core::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left mouse button, pen or touch contact.
    Primary,
    /// Right mouse button; opens context menus.
    Secondary,
    /// Middle and any extra mouse buttons. Presses are ignored.
    Middle,
}

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Ctrl on most platforms, ⌘ on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        position: Point,
        button: PointerButton,
        modifiers: Modifiers,
    },

    PointerMove {
        position: Point,
        modifiers: Modifiers,
    },

    PointerUp {
        position: Point,
        button: PointerButton,
    },

    /// Mouse wheel. Positive `delta_y` scrolls down, which zooms out.
    Wheel { position: Point, delta_y: f64 },

    /// `key` is the `KeyboardEvent.key` value (e.g. `"Escape"`, `"+"`).
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn down(x: f64, y: f64) -> Self {
        Self::PointerDown {
            position: Point::new(x, y),
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn secondary_down(x: f64, y: f64) -> Self {
        Self::PointerDown {
            position: Point::new(x, y),
            button: PointerButton::Secondary,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::PointerMove {
            position: Point::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self::PointerUp {
            position: Point::new(x, y),
            button: PointerButton::Primary,
        }
    }

    pub fn key(key: &str) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers: Modifiers::NONE,
        }
    }

    /// Screen position, if this is a pointer or wheel event.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { position, .. }
            | Self::PointerMove { position, .. }
            | Self::PointerUp { position, .. }
            | Self::Wheel { position, .. } => Some(*position),
            Self::Key { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_of_pointer_events() {
        assert_eq!(InputEvent::down(1.0, 2.0).position(), Some(Point::new(1.0, 2.0)));
        assert_eq!(InputEvent::key("Escape").position(), None);
    }

    #[test]
    fn command_modifier() {
        let m = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert!(m.command());
        assert!(!Modifiers::NONE.command());
    }
}
