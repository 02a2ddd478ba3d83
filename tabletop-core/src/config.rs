//! Table configuration.
//!
//! Every field has a default, so a host may supply a partial JSON document
//! and only override what it cares about.

use serde::{Deserialize, Serialize};

use crate::{Point, Size, TableError, TableResult};

/// Where a direct zoom change (the zoom slider) is anchored.
///
/// Pinch zoom always anchors at the pinch midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomAnchor {
    /// Keep the world point under the viewport center fixed.
    #[default]
    ViewportCenter,
    /// Keep the screen origin fixed (pan is left unchanged).
    Origin,
}

/// Configuration for a table session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Table width in world units; the shuffle pile is centered on the table.
    pub table_width: f32,
    /// Table height in world units.
    pub table_height: f32,
    /// Card width in world units.
    pub card_width: f32,
    /// Card height in world units.
    pub card_height: f32,
    /// Smallest allowed zoom scale.
    pub min_zoom: f32,
    /// Largest allowed zoom scale.
    pub max_zoom: f32,
    /// A card release closer than this (screen pixels, per axis) to the press is a tap.
    pub tap_threshold_px: f32,
    /// Maximum per-axis offset from the pile center applied on shuffle.
    pub shuffle_jitter: f32,
    /// Pinch samples with a finger distance below this (screen pixels) are skipped.
    pub min_pinch_distance: f32,
    /// Anchor policy for direct zoom changes.
    pub zoom_anchor: ZoomAnchor,
    /// Include the two jokers (54 cards instead of 52).
    pub jokers: bool,
    /// Brush and eraser radius in world units; strokes are twice as wide.
    pub brush_radius: f32,
    /// Brush colour as RGBA.
    pub brush_color: [u8; 4],
    /// Table background colour as RGBA.
    pub table_color: [u8; 4],
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            table_width: 1200.0,
            table_height: 800.0,
            card_width: 100.0,
            card_height: 145.0,
            min_zoom: 0.5,
            max_zoom: 2.0,
            tap_threshold_px: 5.0,
            shuffle_jitter: 5.0,
            min_pinch_distance: 1.0,
            zoom_anchor: ZoomAnchor::default(),
            jokers: false,
            brush_radius: 8.0,
            brush_color: [0, 0, 0, 255],
            table_color: [230, 220, 255, 255],
        }
    }
}

impl TableConfig {
    /// Parse a configuration from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> TableResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that all values are usable.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> TableResult<()> {
        let positive = [
            ("table_width", self.table_width),
            ("table_height", self.table_height),
            ("card_width", self.card_width),
            ("card_height", self.card_height),
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
            ("brush_radius", self.brush_radius),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TableError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        let non_negative = [
            ("tap_threshold_px", self.tap_threshold_px),
            ("shuffle_jitter", self.shuffle_jitter),
            ("min_pinch_distance", self.min_pinch_distance),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TableError::InvalidConfig(format!(
                    "{name} must be zero or positive, got {value}"
                )));
            }
        }

        if self.min_zoom > self.max_zoom {
            return Err(TableError::InvalidConfig(format!(
                "min_zoom ({}) exceeds max_zoom ({})",
                self.min_zoom, self.max_zoom
            )));
        }

        Ok(())
    }

    /// Card size in world units.
    #[must_use]
    pub fn card_size(&self) -> Size {
        Size::new(self.card_width, self.card_height)
    }

    /// Table size in world units.
    #[must_use]
    pub fn table_size(&self) -> Size {
        Size::new(self.table_width, self.table_height)
    }

    /// Top-left position of a card centered on the table.
    #[must_use]
    pub fn pile_origin(&self) -> Point {
        self.table_size().center() - self.card_size().center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = TableConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pile_origin(), Point::new(550.0, 327.5));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = TableConfig::from_json(r#"{"max_zoom": 3.0, "jokers": true}"#)
            .expect("should parse");
        assert!((config.max_zoom - 3.0).abs() < f32::EPSILON);
        assert!(config.jokers);
        assert!((config.card_width - 100.0).abs() < f32::EPSILON);
        assert_eq!(config.zoom_anchor, ZoomAnchor::ViewportCenter);
    }

    #[test]
    fn zoom_anchor_uses_snake_case() {
        let config =
            TableConfig::from_json(r#"{"zoom_anchor": "origin"}"#).expect("should parse");
        assert_eq!(config.zoom_anchor, ZoomAnchor::Origin);
    }

    #[test]
    fn inverted_zoom_bounds_are_rejected() {
        let config = TableConfig {
            min_zoom: 3.0,
            max_zoom: 2.0,
            ..TableConfig::default()
        };
        let err = config.validate().expect_err("should reject");
        assert!(err.to_string().contains("min_zoom"));
    }

    #[test]
    fn non_positive_sizes_are_rejected() {
        let config = TableConfig {
            card_width: 0.0,
            ..TableConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TableError::InvalidConfig(msg)) if msg.contains("card_width")
        ));

        let config = TableConfig {
            tap_threshold_px: f32::NAN,
            ..TableConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        assert!(matches!(
            TableConfig::from_json("{ nope"),
            Err(TableError::Serialization(_))
        ));
    }
}
