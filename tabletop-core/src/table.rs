//! Table state: the deck, the viewport and the active tool, plus the actions
//! the controls collaborator can invoke on them.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    standard_faces, CardFaces, CardId, Deck, PaintTool, Point, Rect, Size, TableConfig,
    TableResult, Viewport, ZoomAnchor,
};

/// Which tool a press on the table uses.
///
/// Paint and erase are exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Presses drag cards or pan the table.
    #[default]
    Idle,
    /// Presses paint.
    Paint,
    /// Presses erase.
    Erase,
}

impl InputMode {
    /// The paint tool this mode uses, if any.
    #[must_use]
    pub const fn tool(self) -> Option<PaintTool> {
        match self {
            Self::Idle => None,
            Self::Paint => Some(PaintTool::Brush),
            Self::Erase => Some(PaintTool::Eraser),
        }
    }
}

/// The shared, mutable table state.
#[derive(Debug, Clone)]
pub struct Table {
    config: TableConfig,
    deck: Deck,
    viewport: Viewport,
    input_mode: InputMode,
    /// Size of the on-screen table surface in screen pixels.
    surface: Size,
    rng: StdRng,
}

impl Table {
    /// Create a table with the standard deck.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: TableConfig, seed: u64) -> TableResult<Self> {
        let faces = standard_faces(config.jokers);
        Self::with_faces(config, faces, seed)
    }

    /// Create a table with a custom set of card faces.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_faces(config: TableConfig, faces: Vec<CardFaces>, seed: u64) -> TableResult<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let deck = Deck::new(faces, config.pile_origin(), config.shuffle_jitter, &mut rng);
        let viewport = Viewport::new(config.min_zoom, config.max_zoom)
            .with_min_pinch_distance(config.min_pinch_distance);
        let surface = config.table_size();

        tracing::info!(
            "Table ready: {} cards, {}x{} surface",
            deck.len(),
            surface.width,
            surface.height
        );

        Ok(Self {
            config,
            deck,
            viewport,
            input_mode: InputMode::Idle,
            surface,
            rng,
        })
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// The deck.
    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Mutable access to the deck.
    pub fn deck_mut(&mut self) -> &mut Deck {
        &mut self.deck
    }

    /// The viewport transform.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Mutable access to the viewport.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// The active input mode.
    #[must_use]
    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    /// Whether paint mode is on.
    #[must_use]
    pub fn is_paint_mode(&self) -> bool {
        self.input_mode == InputMode::Paint
    }

    /// Whether eraser mode is on.
    #[must_use]
    pub fn is_eraser_mode(&self) -> bool {
        self.input_mode == InputMode::Erase
    }

    /// Size of the on-screen surface.
    #[must_use]
    pub fn surface_size(&self) -> Size {
        self.surface
    }

    /// Find the card under a screen point.
    ///
    /// Cards are tested topmost first against their screen-space rectangles,
    /// so overlapping cards resolve to the one drawn on top.
    #[must_use]
    pub fn card_at(&self, screen: Point) -> Option<CardId> {
        let size = self.config.card_size();
        self.deck
            .cards()
            .iter()
            .rev()
            .find(|card| {
                self.viewport
                    .world_rect_to_screen(card.rect(size))
                    .contains_point(screen)
            })
            .map(|card| card.id)
    }

    /// Screen-space rectangle of a card.
    #[must_use]
    pub fn card_screen_rect(&self, id: CardId) -> Option<Rect> {
        let size = self.config.card_size();
        self.deck
            .card(id)
            .map(|card| self.viewport.world_rect_to_screen(card.rect(size)))
    }

    /// Toggle every card's face.
    pub fn flip_all(&mut self) {
        self.deck.flip_all();
        tracing::debug!("Flipped all {} cards", self.deck.len());
    }

    /// Reshuffle into a face-down pile at the table center.
    pub fn shuffle(&mut self) {
        let origin = self.config.pile_origin();
        self.deck
            .shuffle(&mut self.rng, origin, self.config.shuffle_jitter);
        tracing::info!("Shuffled {} cards", self.deck.len());
    }

    /// Turn paint mode on or off. Turning it on turns the eraser off.
    pub fn set_paint_mode(&mut self, enabled: bool) {
        self.set_mode(InputMode::Paint, enabled);
    }

    /// Turn eraser mode on or off. Turning it on turns paint off.
    pub fn set_eraser_mode(&mut self, enabled: bool) {
        self.set_mode(InputMode::Erase, enabled);
    }

    fn set_mode(&mut self, mode: InputMode, enabled: bool) {
        if enabled {
            self.input_mode = mode;
        } else if self.input_mode == mode {
            self.input_mode = InputMode::Idle;
        }
        tracing::debug!("Input mode: {:?}", self.input_mode);
    }

    /// Set the zoom scale from a direct control, clamped to the configured bounds.
    ///
    /// The fixed point follows [`TableConfig::zoom_anchor`].
    pub fn set_zoom(&mut self, scale: f32) {
        match self.config.zoom_anchor {
            ZoomAnchor::ViewportCenter => {
                let center = self.surface.center();
                self.viewport.zoom_about(scale, center);
            }
            ZoomAnchor::Origin => self.viewport.set_zoom(scale),
        }
    }

    /// Roll a fair six-sided die. Has no effect on the table.
    pub fn roll_die(&mut self) -> u8 {
        let value = self.rng.random_range(1..=6);
        tracing::debug!("Rolled {value}");
        value
    }

    /// Record a new on-screen surface size.
    pub fn resize(&mut self, width: u32, height: u32) {
        #[allow(clippy::cast_precision_loss)]
        let surface = Size::new(width as f32, height as f32);
        self.surface = surface;
        tracing::info!("Table surface resized to {width}x{height}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::new(TableConfig::default(), 7).expect("valid config")
    }

    #[test]
    fn new_table_lays_out_a_centered_pile() {
        let table = table();
        assert_eq!(table.deck().len(), 52);
        for card in table.deck().cards() {
            assert!(!card.face_up);
            assert!((card.position.x - 550.0).abs() <= 5.0);
            assert!((card.position.y - 327.5).abs() <= 5.0);
        }
    }

    #[test]
    fn jokers_config_builds_54_cards() {
        let config = TableConfig {
            jokers: true,
            ..TableConfig::default()
        };
        let table = Table::new(config, 1).expect("valid config");
        assert_eq!(table.deck().len(), 54);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = TableConfig {
            min_zoom: -1.0,
            ..TableConfig::default()
        };
        assert!(Table::new(config, 1).is_err());
    }

    #[test]
    fn paint_and_eraser_modes_are_exclusive() {
        let mut table = table();
        table.set_paint_mode(true);
        assert!(table.is_paint_mode());
        table.set_eraser_mode(true);
        assert!(table.is_eraser_mode());
        assert!(!table.is_paint_mode());

        // Turning paint off while erasing leaves the eraser alone.
        table.set_paint_mode(false);
        assert_eq!(table.input_mode(), InputMode::Erase);
        table.set_eraser_mode(false);
        assert_eq!(table.input_mode(), InputMode::Idle);
    }

    #[test]
    fn hit_test_prefers_topmost_card() {
        let mut table = table();
        let ids: Vec<_> = table.deck().ids().collect();
        let (lower, upper) = (ids[0], ids[1]);
        table.deck_mut().set_position(lower, Point::new(0.0, 0.0));
        table.deck_mut().set_position(upper, Point::new(50.0, 50.0));
        // Move both off the pile so nothing else overlaps.
        for id in &ids[2..] {
            table.deck_mut().set_position(*id, Point::new(5000.0, 5000.0));
        }

        let shared = Point::new(75.0, 75.0);
        assert_eq!(table.card_at(shared), Some(upper));
        table.deck_mut().bring_to_front(lower);
        assert_eq!(table.card_at(shared), Some(lower));
        assert_eq!(table.card_at(Point::new(10.0, 10.0)), Some(lower));
        assert_eq!(table.card_at(Point::new(-10.0, -10.0)), None);
    }

    #[test]
    fn hit_test_uses_screen_space() {
        let mut table = table();
        let id = table.deck().ids().next().expect("card");
        let others: Vec<_> = table.deck().ids().skip(1).collect();
        for other in others {
            table.deck_mut().set_position(other, Point::new(9000.0, 9000.0));
        }
        table.deck_mut().set_position(id, Point::new(100.0, 100.0));
        table.viewport_mut().set_zoom(2.0);
        table.viewport_mut().pan_to(Point::new(-50.0, 0.0));

        // World rect (100,100)-(200,245) maps to screen (150,200)-(350,490).
        assert_eq!(table.card_at(Point::new(340.0, 480.0)), Some(id));
        assert_eq!(table.card_at(Point::new(120.0, 150.0)), None);
        assert_eq!(
            table.card_screen_rect(id),
            Some(Rect::new(150.0, 200.0, 200.0, 290.0))
        );
    }

    #[test]
    fn set_zoom_clamps_to_max() {
        let config = TableConfig {
            zoom_anchor: ZoomAnchor::Origin,
            ..TableConfig::default()
        };
        let mut table = Table::new(config, 3).expect("valid config");
        table.set_zoom(0.5);
        assert!((table.viewport().scale() - 0.5).abs() < f32::EPSILON);
        table.set_zoom(2.0);
        assert!((table.viewport().scale() - 2.0).abs() < f32::EPSILON);
        table.set_zoom(3.0);
        assert!((table.viewport().scale() - 2.0).abs() < f32::EPSILON);
        assert_eq!(table.viewport().pan(), Point::ZERO);
    }

    #[test]
    fn centered_zoom_keeps_surface_center_fixed() {
        let mut table = table();
        table.resize(1000, 600);
        let center = Point::new(500.0, 300.0);
        let before = table.viewport().to_world(center);
        table.set_zoom(1.8);
        let after = table.viewport().to_world(center);
        assert!((after.x - before.x).abs() < 1e-3);
        assert!((after.y - before.y).abs() < 1e-3);
        assert!((table.viewport().scale() - 1.8).abs() < 1e-6);
    }

    #[test]
    fn die_rolls_stay_in_range_and_leave_the_deck_alone() {
        let mut table = table();
        let before: Vec<_> = table.deck().cards().to_vec();
        let mut seen = [false; 6];
        for _ in 0..600 {
            let value = table.roll_die();
            assert!((1..=6).contains(&value));
            seen[usize::from(value - 1)] = true;
        }
        assert!(seen.iter().all(|s| *s));
        assert_eq!(table.deck().cards(), before.as_slice());
    }

    #[test]
    fn shuffle_regathers_dragged_cards() {
        let mut table = table();
        let id = table.deck().ids().next().expect("card");
        table.deck_mut().set_position(id, Point::new(-900.0, 4000.0));
        table.flip_all();
        table.shuffle();
        let card = table.deck().card(id).expect("card");
        assert!(!card.face_up);
        assert!((card.position.x - 550.0).abs() <= 5.0);
    }
}
