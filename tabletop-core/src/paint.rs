//! The paint layer capability.
//!
//! The engine never owns pixels. It hands stroke segments in world
//! coordinates to whatever surface the host injects: a DOM canvas in the
//! browser, a tiny-skia pixmap natively, or a [`RecordingPaintLayer`] in tests.

use serde::{Deserialize, Serialize};

use crate::Point;

/// What a stroke does to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaintTool {
    /// Lay down brush colour.
    Brush,
    /// Remove paint, revealing the table.
    Eraser,
}

/// A persistent raster surface addressed in world coordinates.
pub trait PaintLayer {
    /// Draw a straight segment between two world points.
    ///
    /// `from == to` marks a single dot.
    fn stroke_segment(&mut self, from: Point, to: Point, tool: PaintTool);

    /// Erase everything.
    fn clear(&mut self);

    /// Resize the surface. Existing strokes are discarded.
    ///
    /// The size is the on-screen surface size, but the layer stays addressed
    /// in world units: afterwards it covers world `[0, width) x [0, height)`
    /// whatever the current zoom or pan. Segments outside that area may be
    /// dropped.
    fn resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
        self.clear();
    }
}

impl<P: PaintLayer + ?Sized> PaintLayer for Box<P> {
    fn stroke_segment(&mut self, from: Point, to: Point, tool: PaintTool) {
        (**self).stroke_segment(from, to, tool);
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height);
    }
}

/// One recorded stroke segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeSegment {
    /// Start point in world space.
    pub from: Point,
    /// End point in world space.
    pub to: Point,
    /// Tool used.
    pub tool: PaintTool,
}

/// A paint layer that remembers segments instead of rasterizing them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingPaintLayer {
    segments: Vec<StrokeSegment>,
    clears: usize,
}

impl RecordingPaintLayer {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Segments drawn since the last clear.
    #[must_use]
    pub fn segments(&self) -> &[StrokeSegment] {
        &self.segments
    }

    /// Number of times the layer was cleared.
    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.clears
    }
}

impl PaintLayer for RecordingPaintLayer {
    fn stroke_segment(&mut self, from: Point, to: Point, tool: PaintTool) {
        self.segments.push(StrokeSegment { from, to, tool });
    }

    fn clear(&mut self) {
        self.segments.clear();
        self.clears += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_keeps_segments_until_cleared() {
        let mut layer = RecordingPaintLayer::new();
        layer.stroke_segment(Point::ZERO, Point::new(1.0, 1.0), PaintTool::Brush);
        layer.stroke_segment(Point::new(1.0, 1.0), Point::new(2.0, 1.0), PaintTool::Eraser);
        assert_eq!(layer.segments().len(), 2);
        assert_eq!(layer.segments()[1].tool, PaintTool::Eraser);

        layer.clear();
        assert!(layer.segments().is_empty());
        assert_eq!(layer.clear_count(), 1);
    }

    #[test]
    fn resize_discards_strokes_by_default() {
        let mut layer = Box::new(RecordingPaintLayer::new());
        PaintLayer::stroke_segment(&mut layer, Point::ZERO, Point::ZERO, PaintTool::Brush);
        PaintLayer::resize(&mut layer, 640, 480);
        assert!(layer.segments().is_empty());
        assert_eq!(layer.clear_count(), 1);
    }
}
