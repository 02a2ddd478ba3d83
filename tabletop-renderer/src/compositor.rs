//! Software compositor: draws a [`RenderFrame`] and its paint layer into a
//! pixmap, in the same order the browser host layers its canvases.
//!
//! Layering, bottom to top: table colour, paint layer (under the viewport
//! transform), cards in deck order. Card images are not loaded here; each card
//! is drawn as a solid face or back with an outline.

use tabletop_core::{CardSprite, RenderFrame, TableConfig};
use tiny_skia::{
    Color, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

use crate::error::{RenderError, RenderResult};
use crate::RasterPaintLayer;

/// Colours used when compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Table surface.
    pub table: [u8; 4],
    /// Face-up card fill.
    pub card_face: [u8; 4],
    /// Face-down card fill.
    pub card_back: [u8; 4],
    /// Card outline.
    pub card_edge: [u8; 4],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            table: [230, 220, 255, 255],
            card_face: [250, 250, 250, 255],
            card_back: [45, 70, 160, 255],
            card_edge: [30, 30, 30, 255],
        }
    }
}

impl Palette {
    /// The default palette with the configured table colour.
    #[must_use]
    pub fn from_config(config: &TableConfig) -> Self {
        Self {
            table: config.table_color,
            ..Self::default()
        }
    }
}

/// Renders frames to raster images.
#[derive(Debug, Clone, Default)]
pub struct Compositor {
    palette: Palette,
}

impl Compositor {
    /// Create a compositor with the given palette.
    #[must_use]
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// The palette in use.
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Render a frame to a pixmap the size of the frame's surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the output pixmap cannot be allocated.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn render(&self, frame: &RenderFrame, paint: &RasterPaintLayer) -> RenderResult<Pixmap> {
        let width = frame.surface_width.ceil().max(1.0) as u32;
        let height = frame.surface_height.ceil().max(1.0) as u32;
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            RenderError::Surface(format!("cannot allocate {width}x{height} frame"))
        })?;

        pixmap.fill(color(self.palette.table));

        let view = Transform::from_row(frame.scale, 0.0, 0.0, frame.scale, frame.pan.x, frame.pan.y);
        pixmap.draw_pixmap(
            0,
            0,
            paint.pixmap().as_ref(),
            &PixmapPaint::default(),
            view,
            None,
        );

        for sprite in &frame.cards {
            self.draw_card(&mut pixmap, sprite, frame.scale);
        }

        tracing::trace!("Composited {} cards at {width}x{height}", frame.cards.len());
        Ok(pixmap)
    }

    /// Render a frame straight to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn render_png(&self, frame: &RenderFrame, paint: &RasterPaintLayer) -> RenderResult<Vec<u8>> {
        self.render(frame, paint)?
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }

    fn draw_card(&self, pixmap: &mut Pixmap, sprite: &CardSprite, scale: f32) {
        let r = sprite.screen_rect;
        let Some(rect) = Rect::from_xywh(r.x, r.y, r.width, r.height) else {
            tracing::debug!("Skipping {} with degenerate rect", sprite.id);
            return;
        };

        let fill = if sprite.face_up {
            self.palette.card_face
        } else {
            self.palette.card_back
        };
        pixmap.fill_rect(rect, &solid(fill), Transform::identity(), None);

        let outline = PathBuilder::from_rect(rect);
        let stroke = Stroke {
            width: scale.max(1.0),
            ..Stroke::default()
        };
        pixmap.stroke_path(
            &outline,
            &solid(self.palette.card_edge),
            &stroke,
            Transform::identity(),
            None,
        );
    }
}

fn color([r, g, b, a]: [u8; 4]) -> Color {
    Color::from_rgba8(r, g, b, a)
}

fn solid(rgba: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color(rgba));
    paint.anti_alias = true;
    paint
}
