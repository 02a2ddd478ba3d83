//! Raster paint layer backed by a tiny-skia pixmap.
//!
//! Pixels are addressed in world coordinates: pixel `(x, y)` holds the paint
//! at world point `(x, y)`. The compositor applies the viewport transform when
//! drawing the layer, so strokes stay fixed to the table under pan and zoom.

use std::path::Path;

use tabletop_core::{PaintLayer, PaintTool, Point, TableConfig};
use tiny_skia::{
    BlendMode, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform,
};

use crate::error::{RenderError, RenderResult};

/// A persistent, write-only paint surface.
#[derive(Debug, Clone)]
pub struct RasterPaintLayer {
    pixmap: Pixmap,
    brush_radius: f32,
    brush_color: [u8; 4],
}

impl RasterPaintLayer {
    /// Create a transparent layer covering world `[0, width) x [0, height)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pixmap cannot be allocated (zero or huge size).
    pub fn new(width: u32, height: u32, brush_radius: f32, brush_color: [u8; 4]) -> RenderResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            RenderError::Surface(format!("cannot allocate {width}x{height} paint layer"))
        })?;
        Ok(Self {
            pixmap,
            brush_radius,
            brush_color,
        })
    }

    /// Create a layer the size of the configured table, with its brush.
    ///
    /// # Errors
    ///
    /// Returns an error if the pixmap cannot be allocated.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_config(config: &TableConfig) -> RenderResult<Self> {
        Self::new(
            config.table_width.ceil() as u32,
            config.table_height.ceil() as u32,
            config.brush_radius,
            config.brush_color,
        )
    }

    /// Layer width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Layer height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// The underlying pixmap.
    #[must_use]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Alpha of the paint at a world point, or 0 outside the layer.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn alpha_at(&self, world: Point) -> u8 {
        if !world.is_finite() || world.x < 0.0 || world.y < 0.0 {
            return 0;
        }
        self.pixmap
            .pixel(world.x as u32, world.y as u32)
            .map_or(0, |p| p.alpha())
    }

    /// Whether nothing is painted.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.pixmap.pixels().iter().all(|p| p.alpha() == 0)
    }

    /// Encode the layer as PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }

    /// Write the layer to a PNG file.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Whether a brush-width segment touches the surface at all.
    #[allow(clippy::cast_precision_loss)]
    fn reaches(&self, from: Point, to: Point) -> bool {
        let r = self.brush_radius;
        from.x.min(to.x) - r < self.width() as f32
            && from.y.min(to.y) - r < self.height() as f32
            && from.x.max(to.x) + r >= 0.0
            && from.y.max(to.y) + r >= 0.0
    }

    fn paint_for(&self, tool: PaintTool) -> Paint<'static> {
        let [r, g, b, a] = self.brush_color;
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;
        if tool == PaintTool::Eraser {
            paint.blend_mode = BlendMode::Clear;
        }
        paint
    }
}

impl PaintLayer for RasterPaintLayer {
    fn stroke_segment(&mut self, from: Point, to: Point, tool: PaintTool) {
        if !from.is_finite() || !to.is_finite() {
            tracing::warn!("stroke_segment: ignoring non-finite segment");
            return;
        }
        if !self.reaches(from, to) {
            tracing::trace!(
                "stroke_segment: ({:.1}, {:.1}) -> ({:.1}, {:.1}) lies outside the {}x{} surface",
                from.x,
                from.y,
                to.x,
                to.y,
                self.width(),
                self.height()
            );
            return;
        }
        let paint = self.paint_for(tool);

        if from == to {
            // Round cap on a zero-length line: a dot of the brush radius.
            if let Some(dot) = PathBuilder::from_circle(from.x, from.y, self.brush_radius) {
                self.pixmap
                    .fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
            }
            return;
        }

        let mut builder = PathBuilder::new();
        builder.move_to(from.x, from.y);
        builder.line_to(to.x, to.y);
        let Some(path) = builder.finish() else {
            return;
        };
        let stroke = Stroke {
            width: self.brush_radius * 2.0,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    fn resize(&mut self, width: u32, height: u32) {
        match Pixmap::new(width, height) {
            Some(pixmap) => {
                self.pixmap = pixmap;
                tracing::debug!("Paint layer resized to {width}x{height}");
            }
            None => {
                tracing::warn!("Paint layer resize to {width}x{height} failed, keeping size");
                self.clear();
            }
        }
    }
}
