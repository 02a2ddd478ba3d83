//! # Tabletop Core
//!
//! Core logic for a shared virtual card table: a deck of cards laid out on a
//! zoomable, pannable surface, a freehand paint overlay, and the pointer and
//! touch state machine that ties them together. No rendering or platform code
//! lives here, so the same engine drives the browser app and headless replays.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              tabletop-core                  │
//! ├─────────────────────────────────────────────┤
//! │  Table           │  Interaction Engine      │
//! │  - Deck / cards  │  - Pointer & touch       │
//! │  - Viewport      │  - Drag / tap / flip     │
//! │  - Input mode    │  - Pan & pinch zoom      │
//! ├─────────────────────────────────────────────┤
//! │  Paint Layer     │  Render Frame            │
//! │  - Brush/eraser  │  - Draw-order snapshot   │
//! │  - World space   │  - JSON for the host     │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod card;
pub mod config;
pub mod control;
pub mod deck;
pub mod error;
pub mod event;
pub mod frame;
pub mod geometry;
pub mod interaction;
pub mod paint;
pub mod table;
pub mod viewport;

pub use card::{standard_faces, Card, CardFaces, CardId, STANDARD_BACK};
pub use config::{TableConfig, ZoomAnchor};
pub use control::{ControlAction, ControlOutcome};
pub use deck::Deck;
pub use error::{TableError, TableResult};
pub use event::{InputEvent, PointerEvent, PointerPhase, TouchEvent, TouchPhase, TouchPoint};
pub use frame::{CardSprite, RenderFrame};
pub use geometry::{Point, Rect, Size};
pub use interaction::{GestureOutcome, InteractionEngine, Session};
pub use paint::{PaintLayer, PaintTool, RecordingPaintLayer, StrokeSegment};
pub use table::{InputMode, Table};
pub use viewport::Viewport;

/// Tabletop core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
