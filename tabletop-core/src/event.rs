//! Input events for table interaction.
//!
//! All coordinates are screen-space pixels relative to the table surface.

use serde::{Deserialize, Serialize};

use crate::Point;

/// Phase of a mouse/pen pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released.
    Up,
    /// Pointer left the tracking surface.
    Leave,
}

/// A single-pointer (mouse or pen) event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase of this event.
    pub phase: PointerPhase,
    /// X position.
    pub x: f32,
    /// Y position.
    pub y: f32,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self { phase, x, y }
    }

    /// Position as a point.
    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// Touch started (finger down).
    Start,
    /// Touch moved (finger dragging).
    Move,
    /// Touch ended (finger up).
    End,
    /// Touch cancelled (e.g., palm rejection).
    Cancel,
}

/// A single touch point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier (for multi-touch).
    pub id: u32,
    /// X position.
    pub x: f32,
    /// Y position.
    pub y: f32,
}

impl TouchPoint {
    /// Create a new touch point.
    #[must_use]
    pub const fn new(id: u32, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }

    /// Position as a point.
    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A touch event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Phase of this touch event.
    pub phase: TouchPhase,
    /// Every touch still on the surface after this event, in platform order.
    pub touches: Vec<TouchPoint>,
    /// Touches that changed in this event (for `End`, the lifted fingers).
    #[serde(default)]
    pub changed: Vec<TouchPoint>,
}

impl TouchEvent {
    /// Create a new touch event with no changed-touch list.
    #[must_use]
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>) -> Self {
        Self {
            phase,
            touches,
            changed: Vec::new(),
        }
    }

    /// Set the changed-touch list.
    #[must_use]
    pub fn with_changed(mut self, changed: Vec<TouchPoint>) -> Self {
        self.changed = changed;
        self
    }

    /// Get the primary (first) touch point.
    #[must_use]
    pub fn primary_touch(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }

    /// Check if this is a multi-touch event.
    #[must_use]
    pub fn is_multi_touch(&self) -> bool {
        self.touches.len() > 1
    }

    /// The first two touches, which drive a pinch. Further touches are ignored.
    #[must_use]
    pub fn pinch_pair(&self) -> Option<(Point, Point)> {
        match self.touches.as_slice() {
            [a, b, ..] => Some((a.position(), b.position())),
            _ => None,
        }
    }
}

/// All input events the table can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum InputEvent {
    /// Mouse or pen event.
    Pointer(PointerEvent),
    /// Raw touch event.
    Touch(TouchEvent),
}
