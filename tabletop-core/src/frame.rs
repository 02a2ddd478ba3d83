//! Per-frame snapshot handed to the rendering collaborator.

use serde::{Deserialize, Serialize};

use crate::{CardId, Point, Rect, Table, TableResult};

/// One card as it should be drawn this frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSprite {
    /// Card id.
    pub id: CardId,
    /// Image reference for the side showing.
    pub image: String,
    /// Whether the front is showing.
    pub face_up: bool,
    /// Top-left position in world space.
    pub position: Point,
    /// Bounds in screen space.
    pub screen_rect: Rect,
}

/// Everything a renderer needs to draw the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    /// Zoom scale applied to world content.
    pub scale: f32,
    /// Pan offset in screen pixels.
    pub pan: Point,
    /// On-screen surface width.
    pub surface_width: f32,
    /// On-screen surface height.
    pub surface_height: f32,
    /// Paint mode flag (for cursor/affordance display).
    pub paint_mode: bool,
    /// Eraser mode flag.
    pub eraser_mode: bool,
    /// Cards in draw order, bottom first.
    pub cards: Vec<CardSprite>,
}

impl RenderFrame {
    /// Capture the current table state.
    #[must_use]
    pub fn capture(table: &Table) -> Self {
        let viewport = table.viewport();
        let size = table.config().card_size();
        let cards = table
            .deck()
            .cards()
            .iter()
            .map(|card| CardSprite {
                id: card.id,
                image: card.visible_face().to_string(),
                face_up: card.face_up,
                position: card.position,
                screen_rect: viewport.world_rect_to_screen(card.rect(size)),
            })
            .collect();
        let surface = table.surface_size();

        Self {
            scale: viewport.scale(),
            pan: viewport.pan(),
            surface_width: surface.width,
            surface_height: surface.height,
            paint_mode: table.is_paint_mode(),
            eraser_mode: table.is_eraser_mode(),
            cards,
        }
    }

    /// Serialize the frame to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> TableResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
