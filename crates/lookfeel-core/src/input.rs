//! Discrete input events consumed by the interaction controller.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
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
        ..Modifiers::NONE
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    /// Command on macOS, ctrl elsewhere: toggles membership.
    pub fn toggles(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A pointer, gesture or keyboard event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Primary button pressed.
    PointerDown {
        position: Point,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Pointer moved with the primary button held.
    PointerDragged { position: Point },
    /// Primary button released.
    PointerUp { position: Point },
    /// Pointer moved with no button held.
    PointerMoved { position: Point },
    /// Pinch gesture with a signed magnification delta.
    Magnify { position: Point, magnification: f64 },
    /// Two-finger scroll or wheel.
    Scroll { delta: Vec2 },
    /// Abort the current drag (Escape).
    Cancel,
}

impl InputEvent {
    /// Screen position carried by the event, if any.
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::PointerDown { position, .. }
            | InputEvent::PointerDragged { position }
            | InputEvent::PointerUp { position }
            | InputEvent::PointerMoved { position }
            | InputEvent::Magnify { position, .. } => Some(*position),
            InputEvent::Scroll { .. } | InputEvent::Cancel => None,
        }
    }
}
