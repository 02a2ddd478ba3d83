//! Cards - the entities that live on the table.

use serde::{Deserialize, Serialize};

use crate::{Point, Rect, Size};

/// Unique identifier for a card.
///
/// Ids are assigned once when the deck is built and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(u32);

impl CardId {
    /// Create an id from its raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "card#{}", self.0)
    }
}

/// Image references for the two sides of a card.
///
/// These are opaque to the engine; only the rendering collaborator resolves them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFaces {
    /// Front (face) image reference.
    pub front: String,
    /// Back image reference.
    pub back: String,
}

impl CardFaces {
    /// Create a pair of face references.
    #[must_use]
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

/// Shared back image of the standard deck.
pub const STANDARD_BACK: &str = "/cards/back.png";

const RANKS: [&str; 13] = [
    "A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K",
];
const SUITS: [&str; 4] = ["S", "H", "C", "D"];
const JOKERS: [&str; 2] = ["RJ", "BJ"];

/// Face references for a standard deck, suit by suit (spades, hearts, clubs, diamonds).
///
/// With `jokers` the red and black jokers are appended, giving 54 cards.
#[must_use]
pub fn standard_faces(jokers: bool) -> Vec<CardFaces> {
    let suited = SUITS
        .iter()
        .flat_map(|suit| RANKS.iter().map(move |rank| format!("{rank}{suit}")));
    let extra = JOKERS
        .iter()
        .filter(|_| jokers)
        .map(|joker| (*joker).to_string());

    suited
        .chain(extra)
        .map(|name| CardFaces::new(format!("/cards/{name}.png"), STANDARD_BACK))
        .collect()
}

/// A card on the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier.
    pub id: CardId,
    /// Image references.
    pub faces: CardFaces,
    /// Whether the front is showing.
    pub face_up: bool,
    /// Top-left position in world space.
    pub position: Point,
    /// Qualifying clicks since the last shuffle, capped at 1 between calls.
    pub pending_clicks: u8,
}

impl Card {
    /// Create a face-down card at the world origin.
    #[must_use]
    pub fn new(id: CardId, faces: CardFaces) -> Self {
        Self {
            id,
            faces,
            face_up: false,
            position: Point::ZERO,
            pending_clicks: 0,
        }
    }

    /// Set the position.
    #[must_use]
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Image reference for the side currently showing.
    #[must_use]
    pub fn visible_face(&self) -> &str {
        if self.face_up {
            &self.faces.front
        } else {
            &self.faces.back
        }
    }

    /// World-space bounds for a card of the given size.
    #[must_use]
    pub const fn rect(&self, size: Size) -> Rect {
        Rect::at(self.position, size)
    }
}
