//! End-to-end replay tests: script file in, state JSON and PNG out.

use std::path::Path;

use clap::Parser;
use tabletop_core::GestureOutcome;
use tabletop_replay::{execute, CliArgs, ReplayError, Report};

fn args(dir: &Path, extra: &[&str]) -> CliArgs {
    let script = dir.join("script.json");
    let mut argv = vec![
        "tabletop-replay".to_string(),
        "--script".to_string(),
        script.display().to_string(),
        "--seed".to_string(),
        "17".to_string(),
    ];
    argv.extend(extra.iter().map(|s| (*s).to_string()));
    CliArgs::parse_from(argv)
}

fn write_script(dir: &Path, json: &str) {
    std::fs::write(dir.join("script.json"), json).expect("write script");
}

const PAINT_AND_PAN: &str = r#"[
    {"action": "set_paint_mode", "value": true},
    {"type": "pointer", "data": {"phase": "down", "x": 100, "y": 100}},
    {"type": "pointer", "data": {"phase": "move", "x": 200, "y": 100}},
    {"type": "pointer", "data": {"phase": "up", "x": 200, "y": 100}},
    {"action": "set_paint_mode", "value": false},
    {"type": "touch", "data": {"phase": "start", "touches": [{"id": 0, "x": 100, "y": 700}]}},
    {"type": "touch", "data": {"phase": "move", "touches": [{"id": 0, "x": 150, "y": 700}]}},
    {"type": "touch", "data": {"phase": "end", "touches": [], "changed": [{"id": 0, "x": 150, "y": 700}]}},
    {"action": "roll_die"}
]"#;

#[test]
fn test_replay_writes_state_and_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_script(dir.path(), PAINT_AND_PAN);
    let state = dir.path().join("state.json");
    let png = dir.path().join("table.png");

    let report = execute(&args(
        dir.path(),
        &[
            "--out-state",
            &state.display().to_string(),
            "--out-png",
            &png.display().to_string(),
        ],
    ))
    .expect("replay");

    assert_eq!(report.steps, 9);
    assert_eq!(
        report.gestures,
        vec![GestureOutcome::StrokeFinished, GestureOutcome::PanFinished]
    );
    assert_eq!(report.rolls.len(), 1);
    assert!((report.frame.pan.x - 50.0).abs() < f32::EPSILON);

    let saved: Report =
        serde_json::from_slice(&std::fs::read(&state).expect("state file")).expect("state json");
    assert_eq!(saved, report);

    let bytes = std::fs::read(&png).expect("png file");
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn test_same_seed_replays_identically() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_script(
        dir.path(),
        r#"[{"action": "shuffle"}, {"action": "roll_die"}, {"action": "roll_die"}]"#,
    );

    let first = execute(&args(dir.path(), &[])).expect("first");
    let second = execute(&args(dir.path(), &[])).expect("second");
    assert_eq!(first, second);
}

#[test]
fn test_config_file_is_applied() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_script(dir.path(), "[]");
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{"jokers": true, "table_width": 800}"#).expect("config");

    let report = execute(&args(dir.path(), &["--config", &config.display().to_string()]))
        .expect("replay");
    assert_eq!(report.frame.cards.len(), 54);
    assert!((report.frame.surface_width - 800.0).abs() < f32::EPSILON);
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_script(dir.path(), "[]");
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{"min_zoom": 3.0, "max_zoom": 1.0}"#).expect("config");

    let err = execute(&args(dir.path(), &["--config", &config.display().to_string()]))
        .unwrap_err();
    assert!(matches!(err, ReplayError::Config(_)));
}

#[test]
fn test_missing_script_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = execute(&args(dir.path(), &[])).unwrap_err();
    assert!(matches!(err, ReplayError::Io { .. }));
}
