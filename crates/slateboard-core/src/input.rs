//! Input event types consumed by the interaction engine.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// The two buttons with distinct meanings: primary draws and types,
/// secondary selects and drags. Other physical buttons are not mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: PointerButton,
    },
    Up {
        position: Point,
        button: PointerButton,
    },
    Move {
        position: Point,
    },
    /// Wheel notches; positive delta widens the stroke.
    Wheel {
        delta: f64,
    },
}

/// Keystrokes routed to the inline text buffer while typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextKey {
    Char(char),
    Newline,
    Backspace,
}
