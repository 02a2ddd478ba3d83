//! The deck: every card on the table, in draw order.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Card, CardFaces, CardId, Point};

/// An ordered sequence of cards.
///
/// Order is z-order: index 0 is drawn first (bottom), the last card is drawn
/// last and wins hit-tests. The set of ids is fixed at construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Build a deck from face references and lay it out as a shuffled pile.
    ///
    /// Ids are assigned in `faces` order, starting at zero.
    pub fn new<R: Rng>(
        faces: Vec<CardFaces>,
        pile_origin: Point,
        jitter: f32,
        rng: &mut R,
    ) -> Self {
        let cards = (0u32..)
            .zip(faces)
            .map(|(raw, faces)| Card::new(CardId::new(raw), faces))
            .collect();
        let mut deck = Self { cards };
        deck.shuffle(rng, pile_origin, jitter);
        deck
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the deck has no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards from bottom to top.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Card ids from bottom to top.
    pub fn ids(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().map(|c| c.id)
    }

    /// Get a card by id.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    /// Position of a card in draw order.
    #[must_use]
    pub fn index_of(&self, id: CardId) -> Option<usize> {
        self.cards.iter().position(|c| c.id == id)
    }

    /// The topmost card.
    #[must_use]
    pub fn top(&self) -> Option<&Card> {
        self.cards.last()
    }

    /// Move a card to the top of the draw order.
    ///
    /// Returns `false` (and changes nothing) if the id is unknown.
    pub fn bring_to_front(&mut self, id: CardId) -> bool {
        let Some(index) = self.index_of(id) else {
            tracing::warn!("bring_to_front: unknown {id}");
            return false;
        };
        let card = self.cards.remove(index);
        self.cards.push(card);
        true
    }

    /// Move a card. Positions are not clamped to the table.
    ///
    /// Returns `false` if the id is unknown or the position is not finite.
    pub fn set_position(&mut self, id: CardId, position: Point) -> bool {
        if !position.is_finite() {
            tracing::warn!("set_position: rejecting non-finite position for {id}");
            return false;
        }
        let Some(card) = self.card_mut(id) else {
            tracing::warn!("set_position: unknown {id}");
            return false;
        };
        card.position = position;
        true
    }

    /// Count a qualifying click on a card.
    ///
    /// The first click arms the card and the second flips it. A flip leaves
    /// the card armed, so tap, tap, tap flips it and then flips it back. Only
    /// a shuffle disarms; dragging the card leaves the counter untouched.
    ///
    /// Returns `true` when this click flipped the card.
    pub fn register_click(&mut self, id: CardId) -> bool {
        let Some(card) = self.card_mut(id) else {
            tracing::warn!("register_click: unknown {id}");
            return false;
        };
        card.pending_clicks = card.pending_clicks.saturating_add(1);
        if card.pending_clicks >= 2 {
            card.face_up = !card.face_up;
            card.pending_clicks = 1;
            tracing::debug!("{id} flipped, face_up={}", card.face_up);
            true
        } else {
            false
        }
    }

    /// Toggle every card's face independently.
    pub fn flip_all(&mut self) {
        for card in &mut self.cards {
            card.face_up = !card.face_up;
        }
    }

    /// Permute the deck uniformly and gather it into a face-down pile.
    ///
    /// Each card lands within `jitter` of `pile_origin` on both axes.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R, pile_origin: Point, jitter: f32) {
        for i in (1..self.cards.len()).rev() {
            let j = rng.random_range(0..=i);
            self.cards.swap(i, j);
        }

        let jitter = jitter.abs();
        for card in &mut self.cards {
            let (dx, dy) = if jitter > 0.0 {
                (
                    rng.random_range(-jitter..=jitter),
                    rng.random_range(-jitter..=jitter),
                )
            } else {
                (0.0, 0.0)
            };
            card.position = pile_origin + Point::new(dx, dy);
            card.face_up = false;
            card.pending_clicks = 0;
        }
    }
}
