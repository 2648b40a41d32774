//! Input abstraction layer.
//!
//! Normalizes mouse and touch events into a unified `InputEvent` consumed
//! by the pad. The host bridge builds these from DOM events (or a replay
//! log) and is responsible for suppressing the browser's default action.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A single touch contact in viewport (client) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchPoint {
    pub client_x: f64,
    pub client_y: f64,
}

/// Where the pointer is, in whichever coordinate space the device reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "device", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PointerPosition {
    /// Mouse events carry surface-local offsets directly.
    Mouse { offset_x: f64, offset_y: f64 },
    /// Touch events carry the active contacts in viewport coordinates.
    Touch { touches: SmallVec<[TouchPoint; 2]> },
}

/// A normalized input event from any pointing device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputEvent {
    /// Mouse down / touch start.
    PointerDown { position: PointerPosition },
    /// Mouse move / touch move.
    PointerMove { position: PointerPosition },
    /// Mouse up anywhere in the document.
    PointerUp,
    /// Touch cancel.
    PointerCancel,
}

impl InputEvent {
    pub fn mouse_down(x: f64, y: f64) -> Self {
        Self::PointerDown {
            position: PointerPosition::mouse(x, y),
        }
    }

    pub fn mouse_move(x: f64, y: f64) -> Self {
        Self::PointerMove {
            position: PointerPosition::mouse(x, y),
        }
    }

    pub fn touch_start(client_x: f64, client_y: f64) -> Self {
        Self::PointerDown {
            position: PointerPosition::touch(client_x, client_y),
        }
    }

    pub fn touch_move(client_x: f64, client_y: f64) -> Self {
        Self::PointerMove {
            position: PointerPosition::touch(client_x, client_y),
        }
    }

    /// The pointer position, if this event carries one.
    pub fn position(&self) -> Option<&PointerPosition> {
        match self {
            Self::PointerDown { position } | Self::PointerMove { position } => Some(position),
            Self::PointerUp | Self::PointerCancel => None,
        }
    }
}

impl PointerPosition {
    pub fn mouse(offset_x: f64, offset_y: f64) -> Self {
        Self::Mouse { offset_x, offset_y }
    }

    /// Single-contact touch.
    pub fn touch(client_x: f64, client_y: f64) -> Self {
        let mut touches = SmallVec::new();
        touches.push(TouchPoint { client_x, client_y });
        Self::Touch { touches }
    }

    /// Resolve to surface-local coordinates.
    ///
    /// `surface_rect` is the surface's bounding box in viewport coordinates
    /// and must be queried fresh for every event, since scrolling and layout
    /// move the surface. Returns `None` for a touch event with no contacts.
    pub fn to_local(&self, surface_rect: Rect) -> Option<Point> {
        match self {
            Self::Mouse { offset_x, offset_y } => Some(Point::new(*offset_x, *offset_y)),
            Self::Touch { touches } => touches
                .first()
                .map(|t| Point::new(t.client_x - surface_rect.x0, t.client_y - surface_rect.y0)),
        }
    }
}
