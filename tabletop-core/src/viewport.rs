//! Pan/zoom transform between screen space and world space.
//!
//! ```text
//! screen = world * scale + pan
//! world  = (screen - pan) / scale
//! ```

use crate::{Point, Rect};

/// The table's view transform.
///
/// `scale` is kept within `[min_scale, max_scale]` by every mutator.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    scale: f32,
    pan: Point,
    min_scale: f32,
    max_scale: f32,
    /// Pinch samples closer than this are ignored.
    min_pinch_distance: f32,
    /// Finger distance of the previous pinch sample.
    pinch_distance: Option<f32>,
}

impl Viewport {
    /// Create an unpanned viewport at scale 1 (clamped into the bounds).
    #[must_use]
    pub fn new(min_scale: f32, max_scale: f32) -> Self {
        Self {
            scale: 1.0_f32.clamp(min_scale, max_scale),
            pan: Point::ZERO,
            min_scale,
            max_scale,
            min_pinch_distance: 1.0,
            pinch_distance: None,
        }
    }

    /// Set the distance below which pinch samples are skipped.
    #[must_use]
    pub fn with_min_pinch_distance(mut self, distance: f32) -> Self {
        self.min_pinch_distance = distance;
        self
    }

    /// Current zoom scale.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Current pan offset in screen pixels.
    #[must_use]
    pub fn pan(&self) -> Point {
        self.pan
    }

    fn clamp_scale(&self, scale: f32) -> f32 {
        scale.clamp(self.min_scale, self.max_scale)
    }

    /// Map a screen point to world space.
    #[must_use]
    pub fn to_world(&self, screen: Point) -> Point {
        (screen - self.pan) / self.scale
    }

    /// Map a world point to screen space.
    #[must_use]
    pub fn to_screen(&self, world: Point) -> Point {
        world * self.scale + self.pan
    }

    /// Map a world-space rectangle to screen space.
    #[must_use]
    pub fn world_rect_to_screen(&self, rect: Rect) -> Rect {
        let origin = self.to_screen(rect.origin());
        Rect::new(
            origin.x,
            origin.y,
            rect.width * self.scale,
            rect.height * self.scale,
        )
    }

    /// Set the scale directly, leaving pan untouched.
    ///
    /// The screen origin is the fixed point of this zoom.
    pub fn set_zoom(&mut self, scale: f32) {
        if !scale.is_finite() {
            tracing::warn!("set_zoom: ignoring non-finite scale {scale}");
            return;
        }
        self.scale = self.clamp_scale(scale);
    }

    /// Set the scale so that the world point under `anchor` stays under it.
    pub fn zoom_about(&mut self, scale: f32, anchor: Point) {
        if !scale.is_finite() || !anchor.is_finite() {
            tracing::warn!("zoom_about: ignoring non-finite input");
            return;
        }
        let new_scale = self.clamp_scale(scale);
        let factor = new_scale / self.scale;
        self.pan = anchor - (anchor - self.pan) * factor;
        self.scale = new_scale;
    }

    /// Record the finger distance a pinch starts from.
    pub fn begin_pinch(&mut self, distance: f32) {
        self.pinch_distance = self.usable_distance(distance);
    }

    /// Forget the pinch baseline.
    pub fn end_pinch(&mut self) {
        self.pinch_distance = None;
    }

    /// Whether a pinch baseline is recorded.
    #[must_use]
    pub fn is_pinching(&self) -> bool {
        self.pinch_distance.is_some()
    }

    fn usable_distance(&self, distance: f32) -> Option<f32> {
        (distance.is_finite() && distance >= self.min_pinch_distance && distance > 0.0)
            .then_some(distance)
    }

    /// Apply one incremental pinch step anchored at `midpoint`.
    ///
    /// The scale is multiplied by `new_distance / previous_distance`, then
    /// `new_distance` becomes the previous distance for the next step. With
    /// no baseline recorded the sample only becomes the baseline. Degenerate
    /// samples (near-zero or non-finite) are skipped entirely.
    ///
    /// Returns `true` if the transform changed.
    pub fn apply_pinch(&mut self, new_distance: f32, midpoint: Point) -> bool {
        let Some(current) = self.usable_distance(new_distance) else {
            tracing::debug!("apply_pinch: skipping degenerate distance {new_distance}");
            return false;
        };
        if !midpoint.is_finite() {
            return false;
        }
        let Some(previous) = self.pinch_distance.replace(current) else {
            return false;
        };

        let ratio = current / previous;
        let before = (self.scale, self.pan);
        self.zoom_about(self.scale * ratio, midpoint);
        (self.scale, self.pan) != before
    }

    /// Shift the pan offset by a screen-space delta.
    pub fn pan_by(&mut self, delta: Point) {
        if delta.is_finite() {
            self.pan = self.pan + delta;
        }
    }

    /// Set the pan offset.
    pub fn pan_to(&mut self, pan: Point) {
        if pan.is_finite() {
            self.pan = pan;
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.5, 2.0)
    }
}
