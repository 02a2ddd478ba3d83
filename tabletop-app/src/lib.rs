//! # Tabletop WASM Application
//!
//! Browser bindings for the tabletop. The interaction engine runs in Rust; the
//! page forwards pointer and touch events and calls `render()` every frame.
//!
//! ## Usage
//!
//! Build for WASM:
//! ```bash
//! wasm-pack build --target web tabletop-app
//! ```
//!
//! Then import in JavaScript:
//! ```javascript
//! import init, { TableApp } from './pkg/tabletop_app.js';
//!
//! await init();
//! const app = new TableApp('table', null);
//! canvas.onpointerdown = (e) => app.pointerDown(e.offsetX, e.offsetY);
//! canvas.ontouchmove = (e) => app.touchMove(flatten(e.touches), flatten(e.changedTouches));
//!
//! function render() {
//!     app.render();
//!     requestAnimationFrame(render);
//! }
//! render();
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod dom;
pub mod input;

use tabletop_core::{
    ControlAction, ControlOutcome, InteractionEngine, Point, Table, TableConfig,
    TableError, TouchEvent, TouchPhase,
};
use thiserror::Error;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::dom::{DomPaintLayer, TableView};
use crate::input::{outcome_json, touch_points};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init_wasm() {
    console_error_panic_hook::set_once();
    tracing::info!("Tabletop WASM initialized");
}

/// Errors raised while setting up or driving the app from JS.
#[derive(Debug, Error)]
pub enum AppError {
    /// A DOM object was missing or of the wrong type.
    #[error("DOM error: {0}")]
    Dom(String),

    /// The table could not be created.
    #[error(transparent)]
    Table(#[from] TableError),

    /// A JSON argument could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<AppError> for JsValue {
    fn from(err: AppError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Tabletop application for the browser.
#[wasm_bindgen]
pub struct TableApp {
    engine: InteractionEngine<DomPaintLayer>,
    view: TableView,
    frame_count: u64,
}

#[wasm_bindgen]
impl TableApp {
    /// Create the app on the canvas with the given element ID.
    ///
    /// `config_json` is an optional partial [`TableConfig`]; missing fields
    /// take their defaults. The shuffle seed comes from `Math.random`.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas is missing or the config is invalid.
    #[wasm_bindgen(constructor)]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(canvas_id: &str, config_json: Option<String>) -> Result<TableApp, JsValue> {
        let seed = (js_sys::Math::random() * 9_007_199_254_740_992.0) as u64;
        Ok(Self::create(canvas_id, config_json.as_deref(), seed)?)
    }

    /// Create the app with a fixed shuffle seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas is missing or the config is invalid.
    #[wasm_bindgen(js_name = withSeed)]
    pub fn with_seed(canvas_id: &str, config_json: Option<String>, seed: u32) -> Result<TableApp, JsValue> {
        Ok(Self::create(canvas_id, config_json.as_deref(), u64::from(seed))?)
    }

    fn create(canvas_id: &str, config_json: Option<&str>, seed: u64) -> Result<Self, AppError> {
        let config = match config_json {
            Some(json) => TableConfig::from_json(json)?,
            None => TableConfig::default(),
        };

        let window = web_sys::window().ok_or_else(|| AppError::Dom("No window object".into()))?;
        let document = window
            .document()
            .ok_or_else(|| AppError::Dom("No document object".into()))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| AppError::Dom(format!("Canvas element '{canvas_id}' not found")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| AppError::Dom("Element is not a canvas".into()))?;

        let (width, height) = (canvas.width(), canvas.height());
        let paint = DomPaintLayer::new(&document, width, height, &config)?;
        let mut view = TableView::new(canvas, &paint, &config)?;

        let mut table = Table::new(config, seed)?;
        table.resize(width, height);
        view.preload(
            table
                .deck()
                .cards()
                .iter()
                .flat_map(|c| [c.faces.front.as_str(), c.faces.back.as_str()]),
        );

        Ok(Self {
            engine: InteractionEngine::new(table, paint),
            view,
            frame_count: 0,
        })
    }

    /// Draw the current frame.
    pub fn render(&mut self) {
        let frame = self.engine.frame();
        if let Err(err) = self.view.draw(&frame) {
            tracing::error!("Render error: {:?}", err);
        }
        self.frame_count += 1;
    }

    /// Current frame as JSON, for hosts that draw cards themselves.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    #[wasm_bindgen(js_name = frameJson)]
    pub fn frame_json(&self) -> Result<String, JsValue> {
        self.engine
            .frame()
            .to_json()
            .map_err(|e| AppError::from(e).into())
    }

    /// Number of frames rendered.
    #[wasm_bindgen(js_name = frameCount)]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    // ------------------------------------------------------------------
    // Pointer input. Each returns outcome JSON when a gesture finishes.
    // ------------------------------------------------------------------

    /// Mouse/pen pressed.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f32, y: f32) -> Option<String> {
        outcome_json(self.engine.pointer_down(Point::new(x, y)))
    }

    /// Mouse/pen moved.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.engine.pointer_move(Point::new(x, y));
    }

    /// Mouse/pen released.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, x: f32, y: f32) -> Option<String> {
        outcome_json(self.engine.pointer_up(Point::new(x, y)))
    }

    /// Pointer left the table canvas.
    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) -> Option<String> {
        outcome_json(self.engine.pointer_leave())
    }

    // ------------------------------------------------------------------
    // Touch input: flat [x0, y0, x1, y1, ...] arrays in canvas pixels.
    // ------------------------------------------------------------------

    /// `touchstart`.
    #[wasm_bindgen(js_name = touchStart)]
    pub fn touch_start(&mut self, touches: &[f32], changed: &[f32]) -> Option<String> {
        self.touch(TouchPhase::Start, touches, changed)
    }

    /// `touchmove`.
    #[wasm_bindgen(js_name = touchMove)]
    pub fn touch_move(&mut self, touches: &[f32], changed: &[f32]) -> Option<String> {
        self.touch(TouchPhase::Move, touches, changed)
    }

    /// `touchend`.
    #[wasm_bindgen(js_name = touchEnd)]
    pub fn touch_end(&mut self, touches: &[f32], changed: &[f32]) -> Option<String> {
        self.touch(TouchPhase::End, touches, changed)
    }

    /// `touchcancel`.
    #[wasm_bindgen(js_name = touchCancel)]
    pub fn touch_cancel(&mut self, touches: &[f32], changed: &[f32]) -> Option<String> {
        self.touch(TouchPhase::Cancel, touches, changed)
    }

    fn touch(&mut self, phase: TouchPhase, touches: &[f32], changed: &[f32]) -> Option<String> {
        let event =
            TouchEvent::new(phase, touch_points(touches)).with_changed(touch_points(changed));
        outcome_json(self.engine.touch(&event))
    }

    // ------------------------------------------------------------------
    // Controls
    // ------------------------------------------------------------------

    /// Toggle every card's face.
    #[wasm_bindgen(js_name = flipAll)]
    pub fn flip_all(&mut self) {
        self.engine.apply(ControlAction::FlipAll);
    }

    /// Gather and reshuffle the deck.
    pub fn shuffle(&mut self) {
        self.engine.apply(ControlAction::Shuffle);
    }

    /// Erase all paint.
    #[wasm_bindgen(js_name = clearPaint)]
    pub fn clear_paint(&mut self) {
        self.engine.apply(ControlAction::ClearPaint);
    }

    /// Enable or disable paint mode.
    #[wasm_bindgen(js_name = setPaintMode)]
    pub fn set_paint_mode(&mut self, enabled: bool) {
        self.engine.apply(ControlAction::SetPaintMode(enabled));
    }

    /// Enable or disable eraser mode.
    #[wasm_bindgen(js_name = setEraserMode)]
    pub fn set_eraser_mode(&mut self, enabled: bool) {
        self.engine.apply(ControlAction::SetEraserMode(enabled));
    }

    /// Whether paint mode is on.
    #[wasm_bindgen(js_name = isPaintMode)]
    #[must_use]
    pub fn is_paint_mode(&self) -> bool {
        self.engine.table().is_paint_mode()
    }

    /// Whether eraser mode is on.
    #[wasm_bindgen(js_name = isEraserMode)]
    #[must_use]
    pub fn is_eraser_mode(&self) -> bool {
        self.engine.table().is_eraser_mode()
    }

    /// Set the zoom scale (clamped to the configured bounds).
    #[wasm_bindgen(js_name = setZoom)]
    pub fn set_zoom(&mut self, scale: f32) {
        self.engine.apply(ControlAction::SetZoom(scale));
    }

    /// Current zoom scale.
    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.engine.table().viewport().scale()
    }

    /// Roll a six-sided die.
    #[wasm_bindgen(js_name = rollDie)]
    pub fn roll_die(&mut self) -> u8 {
        match self.engine.apply(ControlAction::RollDie) {
            ControlOutcome::Rolled(value) => value,
            ControlOutcome::Done => 0,
        }
    }

    /// Apply a control action given as JSON, e.g. `{"action":"set_zoom","value":1.5}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not a control action.
    #[wasm_bindgen(js_name = applyControl)]
    pub fn apply_control(&mut self, json: &str) -> Result<String, JsValue> {
        let action: ControlAction = serde_json::from_str(json).map_err(AppError::from)?;
        if let ControlAction::Resize { width, height } = action {
            self.view.resize(width, height);
        }
        let outcome = self.engine.apply(action);
        Ok(serde_json::to_string(&outcome).map_err(AppError::from)?)
    }

    /// Resize the table canvas. Paint is discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.view.resize(width, height);
        self.engine.resize(width, height);
    }

    /// Whether a gesture is in progress.
    #[wasm_bindgen(js_name = isGestureActive)]
    #[must_use]
    pub fn is_gesture_active(&self) -> bool {
        !self.engine.session().is_idle()
    }
}
