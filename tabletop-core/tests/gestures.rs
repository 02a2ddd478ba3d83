//! Gesture Integration Tests
//!
//! Drives the interaction engine through complete sessions:
//! - Card flipping by double tap
//! - Dragging under zoom and pan
//! - Painting and clearing
//! - Pinch zoom and the 2 → 1 finger hand-off
//! - Control actions mixed with gestures

use tabletop_core::{
    CardFaces, CardId, ControlAction, ControlOutcome, GestureOutcome, InputEvent,
    InteractionEngine, PaintTool, Point, PointerEvent, PointerPhase, RecordingPaintLayer,
    Session, Table, TableConfig, TouchEvent, TouchPhase, TouchPoint,
};

type Engine = InteractionEngine<RecordingPaintLayer>;

/// A table with two cards: `low` at (0,0) and `high` at (60,60), overlapping.
fn two_card_engine() -> (Engine, CardId, CardId) {
    let faces = vec![
        CardFaces::new("/cards/AS.png", "/cards/back.png"),
        CardFaces::new("/cards/KH.png", "/cards/back.png"),
    ];
    let mut table = Table::with_faces(TableConfig::default(), faces, 99).expect("table");
    let ids: Vec<_> = table.deck().ids().collect();
    let (low, high) = (ids[0], ids[1]);
    table.deck_mut().set_position(low, Point::new(0.0, 0.0));
    table.deck_mut().set_position(high, Point::new(60.0, 60.0));
    (InteractionEngine::new(table, RecordingPaintLayer::new()), low, high)
}

fn pointer(phase: PointerPhase, x: f32, y: f32) -> InputEvent {
    InputEvent::Pointer(PointerEvent::new(phase, x, y))
}

fn touch(phase: TouchPhase, points: &[(f32, f32)]) -> InputEvent {
    let touches = (0u32..)
        .zip(points)
        .map(|(id, (x, y))| TouchPoint::new(id, *x, *y))
        .collect();
    InputEvent::Touch(TouchEvent::new(phase, touches))
}

fn tap(engine: &mut Engine, x: f32, y: f32) -> GestureOutcome {
    engine.handle(&pointer(PointerPhase::Down, x, y));
    engine.handle(&pointer(PointerPhase::Up, x, y))
}

// ============================================================================
// Flipping
// ============================================================================

#[test]
fn test_double_tap_flips_only_the_top_card() {
    let (mut engine, low, high) = two_card_engine();

    tap(&mut engine, 80.0, 80.0);
    let outcome = tap(&mut engine, 80.0, 80.0);
    assert_eq!(
        outcome,
        GestureOutcome::CardTapped {
            card: high,
            flipped: true
        }
    );

    let deck = engine.table().deck();
    assert!(deck.card(high).is_some_and(|c| c.face_up));
    assert!(deck.card(low).is_some_and(|c| !c.face_up));
    let frame = engine.frame();
    let top = frame.cards.last().expect("sprite");
    assert_eq!(top.id, high);
    assert!(top.face_up);
    assert_ne!(top.image, "/cards/back.png");
}

#[test]
fn test_triple_tap_flips_and_flips_back() {
    let (mut engine, _, high) = two_card_engine();

    let flips: Vec<_> = (0..3)
        .map(|_| match tap(&mut engine, 80.0, 80.0) {
            GestureOutcome::CardTapped { flipped, .. } => flipped,
            other => panic!("expected a tap, got {other:?}"),
        })
        .collect();
    assert_eq!(flips, vec![false, true, true]);
    assert!(engine.table().deck().card(high).is_some_and(|c| !c.face_up));
}

#[test]
fn test_tapping_lower_card_raises_it() {
    let (mut engine, low, high) = two_card_engine();

    tap(&mut engine, 10.0, 10.0);
    assert_eq!(engine.table().deck().top().map(|c| c.id), Some(low));

    // The overlap now belongs to the lower card.
    let outcome = tap(&mut engine, 80.0, 80.0);
    assert_eq!(
        outcome,
        GestureOutcome::CardTapped {
            card: low,
            flipped: true
        }
    );
    assert!(engine.table().deck().card(high).is_some_and(|c| !c.face_up));
}

#[test]
fn test_taps_on_different_cards_count_separately() {
    let (mut engine, low, high) = two_card_engine();
    engine
        .table_mut()
        .deck_mut()
        .set_position(high, Point::new(500.0, 500.0));

    tap(&mut engine, 10.0, 10.0);
    tap(&mut engine, 510.0, 510.0);
    let deck = engine.table().deck();
    assert!(deck.card(low).is_some_and(|c| !c.face_up && c.pending_clicks == 1));
    assert!(deck.card(high).is_some_and(|c| !c.face_up && c.pending_clicks == 1));
}

// ============================================================================
// Dragging and panning
// ============================================================================

#[test]
fn test_drag_survives_zoom_change_between_gestures() {
    let (mut engine, _, high) = two_card_engine();

    engine.handle(&pointer(PointerPhase::Down, 100.0, 100.0));
    engine.handle(&pointer(PointerPhase::Move, 200.0, 100.0));
    engine.handle(&pointer(PointerPhase::Up, 200.0, 100.0));
    assert_eq!(
        engine.table().deck().card(high).map(|c| c.position),
        Some(Point::new(160.0, 60.0))
    );

    engine.apply(ControlAction::SetZoom(2.0));
    let rect = engine
        .table()
        .card_screen_rect(high)
        .expect("card on table");
    let grab = Point::new(rect.x + 10.0, rect.y + 10.0);
    engine.handle(&pointer(PointerPhase::Down, grab.x, grab.y));
    engine.handle(&pointer(PointerPhase::Move, grab.x + 40.0, grab.y));
    engine.handle(&pointer(PointerPhase::Up, grab.x + 40.0, grab.y));

    // 40 screen pixels at 2x is 20 world units.
    let moved = engine
        .table()
        .deck()
        .card(high)
        .map(|c| c.position)
        .expect("card");
    assert!((moved.x - 180.0).abs() < 1e-3);
    assert!((moved.y - 60.0).abs() < 1e-3);
}

#[test]
fn test_pan_moves_cards_on_screen_not_in_world() {
    let (mut engine, low, _) = two_card_engine();
    let before = engine.table().card_screen_rect(low).expect("rect");

    engine.handle(&pointer(PointerPhase::Down, 700.0, 700.0));
    engine.handle(&pointer(PointerPhase::Move, 650.0, 720.0));
    let outcome = engine.handle(&pointer(PointerPhase::Up, 650.0, 720.0));
    assert_eq!(outcome, GestureOutcome::PanFinished);

    let after = engine.table().card_screen_rect(low).expect("rect");
    assert!((after.x - (before.x - 50.0)).abs() < 1e-4);
    assert!((after.y - (before.y + 20.0)).abs() < 1e-4);
    assert_eq!(
        engine.table().deck().card(low).map(|c| c.position),
        Some(Point::ZERO)
    );
}

// ============================================================================
// Painting
// ============================================================================

#[test]
fn test_paint_then_erase_then_clear() {
    let (mut engine, _, _) = two_card_engine();

    engine.apply(ControlAction::SetPaintMode(true));
    engine.handle(&pointer(PointerPhase::Down, 300.0, 300.0));
    engine.handle(&pointer(PointerPhase::Move, 310.0, 300.0));
    engine.handle(&pointer(PointerPhase::Up, 310.0, 300.0));

    engine.apply(ControlAction::SetEraserMode(true));
    assert!(!engine.table().is_paint_mode());
    engine.handle(&pointer(PointerPhase::Down, 305.0, 300.0));
    engine.handle(&pointer(PointerPhase::Leave, 0.0, 0.0));
    assert!(engine.session().is_idle());

    let tools: Vec<_> = engine.paint().segments().iter().map(|s| s.tool).collect();
    assert_eq!(
        tools,
        vec![PaintTool::Brush, PaintTool::Brush, PaintTool::Eraser]
    );

    engine.apply(ControlAction::ClearPaint);
    assert!(engine.paint().segments().is_empty());
    assert_eq!(engine.paint().clear_count(), 1);
}

#[test]
fn test_paint_strokes_stay_in_world_space_across_pan() {
    let (mut engine, _, _) = two_card_engine();
    engine.table_mut().viewport_mut().pan_to(Point::new(100.0, 0.0));
    engine.apply(ControlAction::SetPaintMode(true));

    engine.handle(&touch(TouchPhase::Start, &[(400.0, 400.0)]));
    engine.handle(&touch(TouchPhase::Move, &[(420.0, 400.0)]));
    let segment = engine.paint().segments().last().copied().expect("segment");
    assert_eq!(segment.from, Point::new(300.0, 400.0));
    assert_eq!(segment.to, Point::new(320.0, 400.0));
}

// ============================================================================
// Pinch zoom
// ============================================================================

#[test]
fn test_pinch_keeps_midpoint_fixed() {
    let (mut engine, _, _) = two_card_engine();
    let midpoint = Point::new(400.0, 300.0);
    let anchored = engine.table().viewport().to_world(midpoint);

    engine.handle(&touch(TouchPhase::Start, &[(350.0, 300.0), (450.0, 300.0)]));
    engine.handle(&touch(TouchPhase::Move, &[(340.0, 300.0), (460.0, 300.0)]));
    engine.handle(&touch(TouchPhase::Move, &[(325.0, 300.0), (475.0, 300.0)]));

    let viewport = engine.table().viewport();
    assert!((viewport.scale() - 1.5).abs() < 1e-4);
    let now = viewport.to_world(midpoint);
    assert!((now.x - anchored.x).abs() < 1e-3);
    assert!((now.y - anchored.y).abs() < 1e-3);
}

#[test]
fn test_pinch_hand_off_then_pan_with_remaining_finger() {
    let (mut engine, _, _) = two_card_engine();

    engine.handle(&touch(TouchPhase::Start, &[(600.0, 600.0), (700.0, 600.0)]));
    let outcome = engine.handle(&touch(TouchPhase::End, &[(700.0, 600.0)]));
    assert_eq!(outcome, GestureOutcome::PinchFinished);
    assert!(matches!(engine.session(), Session::Panning { .. }));

    engine.handle(&touch(TouchPhase::Move, &[(720.0, 610.0)]));
    assert_eq!(engine.table().viewport().pan(), Point::new(20.0, 10.0));
    let outcome = engine.handle(&touch(TouchPhase::End, &[]));
    assert_eq!(outcome, GestureOutcome::PanFinished);
}

// ============================================================================
// Controls
// ============================================================================

#[test]
fn test_shuffle_during_drag_keeps_gesture_consistent() {
    let (mut engine, _, high) = two_card_engine();

    engine.handle(&pointer(PointerPhase::Down, 100.0, 100.0));
    engine.apply(ControlAction::Shuffle);
    engine.handle(&pointer(PointerPhase::Move, 120.0, 100.0));
    let outcome = engine.handle(&pointer(PointerPhase::Up, 120.0, 100.0));

    assert_eq!(outcome, GestureOutcome::CardDropped { card: high });
    let position = engine
        .table()
        .deck()
        .card(high)
        .map(|c| c.position)
        .expect("card");
    assert!(position.is_finite());
}

#[test]
fn test_die_roll_is_reproducible_for_a_seed() {
    let roll = |seed| {
        let table = Table::new(TableConfig::default(), seed).expect("table");
        let mut engine = InteractionEngine::new(table, RecordingPaintLayer::new());
        (0..10)
            .map(|_| engine.apply(ControlAction::RollDie))
            .collect::<Vec<_>>()
    };
    let first = roll(42);
    assert_eq!(first, roll(42));
    assert!(first
        .iter()
        .all(|o| matches!(o, ControlOutcome::Rolled(1..=6))));
}
