//! Pointer input events delivered by the host.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
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

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

/// Pointer event in device (surface element) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Up {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Move {
        position: Point,
        modifiers: Modifiers,
    },
}

impl PointerEvent {
    /// Primary-button press without modifiers.
    pub fn down(position: impl Into<Point>) -> Self {
        PointerEvent::Down {
            position: position.into(),
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        }
    }

    /// Primary-button press with shift held.
    pub fn shift_down(position: impl Into<Point>) -> Self {
        PointerEvent::Down {
            position: position.into(),
            button: MouseButton::Left,
            modifiers: Modifiers::SHIFT,
        }
    }

    pub fn up(position: impl Into<Point>) -> Self {
        PointerEvent::Up {
            position: position.into(),
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn moved(position: impl Into<Point>) -> Self {
        PointerEvent::Move {
            position: position.into(),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position, .. } => *position,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            PointerEvent::Down { modifiers, .. }
            | PointerEvent::Up { modifiers, .. }
            | PointerEvent::Move { modifiers, .. } => *modifiers,
        }
    }
}
