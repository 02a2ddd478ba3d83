//! # Tabletop Renderer
//!
//! Software rendering for the tabletop, built on tiny-skia so it runs the same
//! natively and under test with no GPU or browser.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                Compositor                   │
//! ├─────────────────────────────────────────────┤
//! │  cards (deck order, screen rects)           │
//! │  RasterPaintLayer (world space, viewport)   │
//! │  table colour                               │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The browser host paints onto a DOM canvas instead and only shares the
//! frame model with this crate.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod compositor;
pub mod error;
pub mod raster;

pub use compositor::{Compositor, Palette};
pub use error::{RenderError, RenderResult};
pub use raster::RasterPaintLayer;
