//! Conversions between JS-friendly values and core types.
//!
//! Kept free of DOM calls so they run in native unit tests.

use tabletop_core::{GestureOutcome, TouchPoint};

/// Parse a flat `[x0, y0, x1, y1, ...]` list into touch points.
///
/// Ids follow list order. A trailing odd value is dropped.
#[must_use]
pub fn touch_points(flat: &[f32]) -> Vec<TouchPoint> {
    (0u32..)
        .zip(flat.chunks_exact(2))
        .map(|(id, xy)| TouchPoint::new(id, xy[0], xy[1]))
        .collect()
}

/// JSON for a finished gesture, or `None` if nothing finished.
#[must_use]
pub fn outcome_json(outcome: GestureOutcome) -> Option<String> {
    if outcome == GestureOutcome::None {
        return None;
    }
    serde_json::to_string(&outcome).ok()
}

/// CSS colour string for an RGBA byte quad.
#[must_use]
pub fn css_color([r, g, b, a]: [u8; 4]) -> String {
    format!("rgba({r}, {g}, {b}, {:.3})", f32::from(a) / 255.0)
}
