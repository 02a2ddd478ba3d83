//! Actions exposed to the controls collaborator (buttons, menus, sliders).

use serde::{Deserialize, Serialize};

/// A control action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum ControlAction {
    /// Toggle every card's face.
    FlipAll,
    /// Reshuffle into a face-down pile at the table center.
    Shuffle,
    /// Erase the paint layer.
    ClearPaint,
    /// Enable or disable paint mode (enabling disables the eraser).
    SetPaintMode(bool),
    /// Enable or disable eraser mode (enabling disables paint).
    SetEraserMode(bool),
    /// Set the zoom scale (clamped).
    SetZoom(f32),
    /// Roll a six-sided die.
    RollDie,
    /// The table surface changed size (screen pixels).
    Resize {
        /// New width.
        width: u32,
        /// New height.
        height: u32,
    },
}

/// Result of a control action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum ControlOutcome {
    /// The action was applied.
    Done,
    /// A die was rolled.
    Rolled(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_deserialize_from_json() {
        let actions: Vec<ControlAction> = serde_json::from_str(
            r#"[
                {"action":"flip_all"},
                {"action":"set_paint_mode","value":true},
                {"action":"set_zoom","value":1.5},
                {"action":"resize","value":{"width":800,"height":600}}
            ]"#,
        )
        .expect("should parse");
        assert_eq!(
            actions,
            vec![
                ControlAction::FlipAll,
                ControlAction::SetPaintMode(true),
                ControlAction::SetZoom(1.5),
                ControlAction::Resize {
                    width: 800,
                    height: 600
                },
            ]
        );
    }
}
