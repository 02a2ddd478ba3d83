//! # Interaction engine
//!
//! The pointer/touch state machine. Every press is classified once, when it
//! lands, into one of four gestures and then driven until release:
//!
//! ```text
//!                 press on card, no tool ──▶ DraggingCard ──┐
//!                 press with paint/erase ──▶ Painting ──────┤
//!   Idle ──down──▶ press on empty table ───▶ Panning ───────┼──up/leave──▶ Idle
//!                 second finger down ──────▶ PinchZooming ──┘
//!                                              │ 2 → 1 fingers
//!                                              └──▶ re-classify remaining finger
//! ```
//!
//! Handlers run to completion and never fail. Bad input (non-finite
//! coordinates, unknown cards, degenerate pinches) is logged and ignored.

use serde::{Deserialize, Serialize};

use crate::{
    CardId, ControlAction, ControlOutcome, InputEvent, PaintLayer, PaintTool, Point,
    PointerPhase, RenderFrame, Table, TouchEvent, TouchPhase,
};

/// The gesture currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Session {
    /// Nothing pressed.
    #[default]
    Idle,
    /// A card follows the pointer.
    DraggingCard {
        /// Card being dragged.
        card: CardId,
        /// Pointer world position minus card position at press time.
        grab_offset: Point,
        /// Screen position of the press, for tap detection.
        start_screen: Point,
    },
    /// A stroke is being drawn.
    Painting {
        /// World point the next segment starts from.
        last_point: Point,
        /// Tool chosen when the stroke started.
        tool: PaintTool,
    },
    /// The table follows the pointer.
    Panning {
        /// Press position minus pan at press time.
        anchor: Point,
    },
    /// Two fingers are zooming.
    PinchZooming {
        /// Finger distance when the pinch started.
        anchor_distance: f32,
        /// Finger midpoint when the pinch started.
        anchor_midpoint: Point,
    },
}

impl Session {
    /// Short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::DraggingCard { .. } => "dragging_card",
            Self::Painting { .. } => "painting",
            Self::Panning { .. } => "panning",
            Self::PinchZooming { .. } => "pinch_zooming",
        }
    }

    /// Whether no gesture is in flight.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// How a gesture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GestureOutcome {
    /// No gesture ended.
    None,
    /// A card was tapped (press and release within the tap threshold).
    CardTapped {
        /// The card.
        card: CardId,
        /// Whether this tap completed a flip.
        flipped: bool,
    },
    /// A card was dragged and released.
    CardDropped {
        /// The card.
        card: CardId,
    },
    /// A stroke ended.
    StrokeFinished,
    /// A pan ended.
    PanFinished,
    /// A pinch ended.
    PinchFinished,
    /// The gesture was abandoned (pointer left, touch cancelled, or superseded).
    Cancelled,
}

/// Drives a [`Table`] and a [`PaintLayer`] from raw input.
#[derive(Debug)]
pub struct InteractionEngine<P> {
    table: Table,
    paint: P,
    session: Session,
    /// Last screen position seen, used when a release carries no position.
    last_screen: Option<Point>,
}

impl<P: PaintLayer> InteractionEngine<P> {
    /// Create an engine over a table and an injected paint surface.
    pub fn new(table: Table, paint: P) -> Self {
        Self {
            table,
            paint,
            session: Session::Idle,
            last_screen: None,
        }
    }

    /// The table state.
    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Mutable access to the table state.
    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    /// The paint surface.
    #[must_use]
    pub fn paint(&self) -> &P {
        &self.paint
    }

    /// The gesture in flight.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Snapshot for the renderer.
    #[must_use]
    pub fn frame(&self) -> RenderFrame {
        RenderFrame::capture(&self.table)
    }

    /// Dispatch any input event.
    pub fn handle(&mut self, event: &InputEvent) -> GestureOutcome {
        match event {
            InputEvent::Pointer(pointer) => {
                let position = pointer.position();
                match pointer.phase {
                    PointerPhase::Down => self.pointer_down(position),
                    PointerPhase::Move => {
                        self.pointer_move(position);
                        GestureOutcome::None
                    }
                    PointerPhase::Up => self.pointer_up(position),
                    PointerPhase::Leave => self.pointer_leave(),
                }
            }
            InputEvent::Touch(touch) => self.touch(touch),
        }
    }

    /// Apply a control action.
    pub fn apply(&mut self, action: ControlAction) -> ControlOutcome {
        match action {
            ControlAction::FlipAll => self.table.flip_all(),
            ControlAction::Shuffle => self.table.shuffle(),
            ControlAction::ClearPaint => self.clear_paint(),
            ControlAction::SetPaintMode(enabled) => self.table.set_paint_mode(enabled),
            ControlAction::SetEraserMode(enabled) => self.table.set_eraser_mode(enabled),
            ControlAction::SetZoom(scale) => self.table.set_zoom(scale),
            ControlAction::RollDie => return ControlOutcome::Rolled(self.table.roll_die()),
            ControlAction::Resize { width, height } => self.resize(width, height),
        }
        ControlOutcome::Done
    }

    /// Erase the paint layer.
    pub fn clear_paint(&mut self) {
        self.paint.clear();
        tracing::debug!("Paint cleared");
    }

    /// Resize the on-screen surface. The paint surface is resized and cleared.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.table.resize(width, height);
        self.paint.resize(width, height);
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    /// Mouse/pen button pressed.
    ///
    /// A press while a gesture is still in flight (a release was missed)
    /// abandons that gesture first and reports it as cancelled.
    pub fn pointer_down(&mut self, screen: Point) -> GestureOutcome {
        if !screen.is_finite() {
            tracing::warn!("pointer_down: ignoring non-finite position");
            return GestureOutcome::None;
        }
        let abandoned = self.cancel();
        self.begin(screen);
        abandoned
    }

    /// Mouse/pen moved.
    pub fn pointer_move(&mut self, screen: Point) {
        if !screen.is_finite() {
            tracing::warn!("pointer_move: ignoring non-finite position");
            return;
        }
        self.drive(screen);
    }

    /// Mouse/pen button released.
    pub fn pointer_up(&mut self, screen: Point) -> GestureOutcome {
        let release = if screen.is_finite() {
            screen
        } else {
            self.last_screen.unwrap_or(screen)
        };
        self.finish(release)
    }

    /// Pointer left the tracking surface. Always returns to idle.
    pub fn pointer_leave(&mut self) -> GestureOutcome {
        self.cancel()
    }

    // ------------------------------------------------------------------
    // Touch input
    // ------------------------------------------------------------------

    /// Handle a touch event.
    ///
    /// Two touches start a pinch whatever the first finger was doing; further
    /// touches are ignored and the first two keep driving. When a pinch drops
    /// to one finger, the remaining finger is classified as a fresh press.
    pub fn touch(&mut self, event: &TouchEvent) -> GestureOutcome {
        let all_finite = event
            .touches
            .iter()
            .chain(&event.changed)
            .all(|t| t.position().is_finite());
        if !all_finite {
            tracing::warn!("touch: ignoring event with non-finite coordinates");
            return GestureOutcome::None;
        }

        match event.phase {
            TouchPhase::Start => self.touch_start(event),
            TouchPhase::Move => {
                self.touch_move(event);
                GestureOutcome::None
            }
            TouchPhase::End => self.touch_end(event),
            TouchPhase::Cancel => self.cancel(),
        }
    }

    fn touch_start(&mut self, event: &TouchEvent) -> GestureOutcome {
        if let Some((a, b)) = event.pinch_pair() {
            if matches!(self.session, Session::PinchZooming { .. }) {
                tracing::trace!("Ignoring extra touch during pinch");
                return GestureOutcome::None;
            }
            let abandoned = self.cancel();
            self.begin_pinch(a, b);
            return abandoned;
        }

        match event.primary_touch() {
            Some(touch) => {
                let abandoned = self.cancel();
                self.begin(touch.position());
                abandoned
            }
            None => GestureOutcome::None,
        }
    }

    fn touch_move(&mut self, event: &TouchEvent) {
        if matches!(self.session, Session::PinchZooming { .. }) {
            if let Some((a, b)) = event.pinch_pair() {
                self.drive_pinch(a, b);
            }
        } else if let Some(touch) = event.primary_touch() {
            self.drive(touch.position());
        }
    }

    fn touch_end(&mut self, event: &TouchEvent) -> GestureOutcome {
        let pinching = matches!(self.session, Session::PinchZooming { .. });

        match (pinching, event.touches.as_slice()) {
            (true, []) => self.finish(Point::ZERO),
            (true, [remaining]) => {
                let outcome = self.finish(Point::ZERO);
                tracing::debug!("Pinch dropped to one finger, re-classifying");
                self.begin(remaining.position());
                outcome
            }
            (true, [a, b, ..]) => {
                // One of three or more fingers lifted: re-anchor on the new first pair.
                self.begin_pinch(a.position(), b.position());
                GestureOutcome::None
            }
            (false, []) => {
                let release = event
                    .changed
                    .first()
                    .map(|t| t.position())
                    .or(self.last_screen)
                    .unwrap_or(Point::ZERO);
                self.finish(release)
            }
            (false, [a, b, ..]) => {
                let abandoned = self.cancel();
                self.begin_pinch(a.position(), b.position());
                abandoned
            }
            (false, [_]) => GestureOutcome::None,
        }
    }

    // ------------------------------------------------------------------
    // State machine core
    // ------------------------------------------------------------------

    /// Classify a fresh press.
    fn begin(&mut self, screen: Point) {
        self.last_screen = Some(screen);
        let world = self.table.viewport().to_world(screen);

        self.session = match self.table.input_mode().tool() {
            Some(tool) => {
                // A press without movement still leaves a dot.
                self.paint.stroke_segment(world, world, tool);
                Session::Painting {
                    last_point: world,
                    tool,
                }
            }
            None => match self.table.card_at(screen) {
                Some(card) => {
                    self.table.deck_mut().bring_to_front(card);
                    let origin = self
                        .table
                        .deck()
                        .card(card)
                        .map_or(world, |c| c.position);
                    Session::DraggingCard {
                        card,
                        grab_offset: world - origin,
                        start_screen: screen,
                    }
                }
                None => Session::Panning {
                    anchor: screen - self.table.viewport().pan(),
                },
            },
        };

        tracing::debug!("Gesture started: {}", self.session.name());
    }

    fn begin_pinch(&mut self, a: Point, b: Point) {
        let distance = a.distance(b);
        let midpoint = a.midpoint(b);
        self.table.viewport_mut().begin_pinch(distance);
        self.session = Session::PinchZooming {
            anchor_distance: distance,
            anchor_midpoint: midpoint,
        };
        tracing::debug!("Pinch started: distance={distance:.1}");
    }

    /// Continue the current single-pointer gesture.
    fn drive(&mut self, screen: Point) {
        self.last_screen = Some(screen);

        match self.session {
            Session::Idle | Session::PinchZooming { .. } => {}
            Session::DraggingCard {
                card, grab_offset, ..
            } => {
                let world = self.table.viewport().to_world(screen);
                self.table.deck_mut().set_position(card, world - grab_offset);
            }
            Session::Painting { last_point, tool } => {
                let world = self.table.viewport().to_world(screen);
                self.paint.stroke_segment(last_point, world, tool);
                self.session = Session::Painting {
                    last_point: world,
                    tool,
                };
            }
            Session::Panning { anchor } => {
                self.table.viewport_mut().pan_to(screen - anchor);
            }
        }

        tracing::trace!("{} at ({:.1}, {:.1})", self.session.name(), screen.x, screen.y);
    }

    fn drive_pinch(&mut self, a: Point, b: Point) {
        let changed = self
            .table
            .viewport_mut()
            .apply_pinch(a.distance(b), a.midpoint(b));
        if changed {
            tracing::trace!("Pinch zoom: scale={:.3}", self.table.viewport().scale());
        }
    }

    /// End the current gesture normally at `release`.
    fn finish(&mut self, release: Point) -> GestureOutcome {
        let session = std::mem::take(&mut self.session);

        let outcome = match session {
            Session::Idle => GestureOutcome::None,
            Session::DraggingCard {
                card, start_screen, ..
            } => {
                let moved = release - start_screen;
                let threshold = self.table.config().tap_threshold_px;
                if moved.x.abs() < threshold && moved.y.abs() < threshold {
                    let flipped = self.table.deck_mut().register_click(card);
                    GestureOutcome::CardTapped { card, flipped }
                } else {
                    GestureOutcome::CardDropped { card }
                }
            }
            Session::Painting { .. } => GestureOutcome::StrokeFinished,
            Session::Panning { .. } => GestureOutcome::PanFinished,
            Session::PinchZooming { .. } => {
                self.table.viewport_mut().end_pinch();
                GestureOutcome::PinchFinished
            }
        };

        if outcome != GestureOutcome::None {
            tracing::debug!("Gesture finished: {outcome:?}");
        }
        outcome
    }

    /// Abandon the current gesture without completing it.
    fn cancel(&mut self) -> GestureOutcome {
        let session = std::mem::take(&mut self.session);
        if matches!(session, Session::PinchZooming { .. }) {
            self.table.viewport_mut().end_pinch();
        }
        if session.is_idle() {
            GestureOutcome::None
        } else {
            tracing::debug!("Gesture cancelled: {}", session.name());
            GestureOutcome::Cancelled
        }
    }
}
