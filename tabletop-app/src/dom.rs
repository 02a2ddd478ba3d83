//! DOM canvas plumbing: the offscreen paint canvas and the visible table canvas.

use std::{cell::RefCell, collections::HashMap, f64::consts::TAU, rc::Rc};

use tabletop_core::{PaintLayer, PaintTool, Point, RenderFrame, TableConfig};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

use crate::input::css_color;
use crate::AppError;

type SurfaceHandle = Rc<RefCell<PaintSurfaceState>>;

/// Get a 2D context from a canvas.
pub(crate) fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, AppError> {
    canvas
        .get_context("2d")
        .map_err(|_| AppError::Dom("Failed to get 2D context".into()))?
        .ok_or_else(|| AppError::Dom("2D context not available".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| AppError::Dom("Failed to cast to 2D context".into()))
}

struct PaintSurfaceState {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: u32,
    height: u32,
    brush_radius: f64,
    brush_color: String,
}

impl PaintSurfaceState {
    fn apply_brush(&self) {
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
        self.ctx.set_line_width(self.brush_radius * 2.0);
        self.ctx.set_stroke_style_str(&self.brush_color);
        self.ctx.set_fill_style_str(&self.brush_color);
    }

    fn set_tool(&self, tool: PaintTool) {
        let op = match tool {
            PaintTool::Brush => "source-over",
            PaintTool::Eraser => "destination-out",
        };
        if self.ctx.set_global_composite_operation(op).is_err() {
            tracing::warn!("Composite operation {op} rejected");
        }
    }
}

/// Paint layer backed by an offscreen `<canvas>` addressed in world space.
pub struct DomPaintLayer {
    state: SurfaceHandle,
}

impl DomPaintLayer {
    /// Create the offscreen canvas.
    pub(crate) fn new(document: &Document, width: u32, height: u32, config: &TableConfig) -> Result<Self, AppError> {
        let canvas = document
            .create_element("canvas")
            .map_err(|_| AppError::Dom("Failed to create paint canvas".into()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| AppError::Dom("Paint element is not a canvas".into()))?;
        canvas.set_width(width);
        canvas.set_height(height);
        let ctx = context_2d(&canvas)?;

        let state = PaintSurfaceState {
            canvas,
            ctx,
            width,
            height,
            brush_radius: f64::from(config.brush_radius),
            brush_color: css_color(config.brush_color),
        };
        state.apply_brush();

        Ok(Self {
            state: Rc::new(RefCell::new(state)),
        })
    }

    fn handle(&self) -> SurfaceHandle {
        Rc::clone(&self.state)
    }
}

impl PaintLayer for DomPaintLayer {
    fn stroke_segment(&mut self, from: Point, to: Point, tool: PaintTool) {
        let Ok(state) = self.state.try_borrow() else {
            tracing::warn!("Paint surface busy, dropping segment");
            return;
        };
        state.set_tool(tool);
        let ctx = &state.ctx;
        ctx.begin_path();
        if from == to {
            if ctx
                .arc(f64::from(from.x), f64::from(from.y), state.brush_radius, 0.0, TAU)
                .is_ok()
            {
                ctx.fill();
            }
        } else {
            ctx.move_to(f64::from(from.x), f64::from(from.y));
            ctx.line_to(f64::from(to.x), f64::from(to.y));
            ctx.stroke();
        }
    }

    fn clear(&mut self) {
        if let Ok(state) = self.state.try_borrow() {
            state
                .ctx
                .clear_rect(0.0, 0.0, f64::from(state.width), f64::from(state.height));
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            // Setting the size resets the bitmap and the context state.
            state.canvas.set_width(width);
            state.canvas.set_height(height);
            state.width = width;
            state.height = height;
            state.apply_brush();
        }
    }
}

/// The visible table canvas plus the loaded card images.
pub(crate) struct TableView {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    paint: SurfaceHandle,
    images: HashMap<String, HtmlImageElement>,
    table_color: String,
}

impl TableView {
    pub(crate) fn new(
        canvas: HtmlCanvasElement,
        paint: &DomPaintLayer,
        config: &TableConfig,
    ) -> Result<Self, AppError> {
        let ctx = context_2d(&canvas)?;
        Ok(Self {
            canvas,
            ctx,
            paint: paint.handle(),
            images: HashMap::new(),
            table_color: css_color(config.table_color),
        })
    }

    /// Start loading every image reference once.
    pub(crate) fn preload<'a>(&mut self, sources: impl IntoIterator<Item = &'a str>) {
        for src in sources {
            if self.images.contains_key(src) {
                continue;
            }
            match HtmlImageElement::new() {
                Ok(img) => {
                    img.set_src(src);
                    self.images.insert(src.to_string(), img);
                }
                Err(_) => tracing::warn!("Could not create image for {src}"),
            }
        }
        tracing::debug!("Preloading {} card images", self.images.len());
    }

    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    /// Draw one frame: table colour, paint under the viewport transform, cards.
    pub(crate) fn draw(&self, frame: &RenderFrame) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        ctx.set_fill_style_str(&self.table_color);
        ctx.fill_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );

        let scale = f64::from(frame.scale);
        ctx.set_transform(scale, 0.0, 0.0, scale, f64::from(frame.pan.x), f64::from(frame.pan.y))?;
        if let Ok(paint) = self.paint.try_borrow() {
            ctx.draw_image_with_html_canvas_element(&paint.canvas, 0.0, 0.0)?;
        }
        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;

        for sprite in &frame.cards {
            let r = sprite.screen_rect;
            let (x, y, w, h) = (
                f64::from(r.x),
                f64::from(r.y),
                f64::from(r.width),
                f64::from(r.height),
            );
            match self.images.get(&sprite.image) {
                Some(img) if img.complete() && img.natural_width() > 0 => {
                    ctx.draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h)?;
                }
                _ => {
                    ctx.set_fill_style_str(if sprite.face_up { "#fafafa" } else { "#2d46a0" });
                    ctx.fill_rect(x, y, w, h);
                    ctx.set_stroke_style_str("#1e1e1e");
                    ctx.set_line_width(1.0);
                    ctx.stroke_rect(x, y, w, h);
                }
            }
        }

        tracing::trace!("Drew {} cards", frame.cards.len());
        Ok(())
    }
}
