use std::f64::consts::PI;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::api::ClientError;
use crate::scene::{DrawOp, LABEL, LABEL_FONT};

// --- CANVAS PAINTER ---

/// Thin wrapper that replays `DrawOp`s onto a 2D context.
pub struct Painter {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Painter {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Painter, ClientError> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| ClientError::Js("canvas has no 2d context".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| ClientError::Js("2d context has an unexpected type".to_string()))?;
        Ok(Painter { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Resizes (which also clears) the canvas and pushes the camera
    /// translation. Every `begin` must be paired with `end`.
    pub fn begin(&self, size: (u32, u32), offset: (f64, f64)) -> Result<(), JsValue> {
        self.canvas.set_width(size.0);
        self.canvas.set_height(size.1);
        self.ctx.save();
        self.ctx.translate(offset.0, offset.1)
    }

    pub fn end(&self) {
        self.ctx.restore();
    }

    pub fn paint(&self, ops: &[DrawOp]) -> Result<(), JsValue> {
        for op in ops {
            match op {
                DrawOp::Square { x, y, size, fill, stroke } => {
                    self.ctx.set_fill_style_str(fill);
                    self.ctx.fill_rect(*x, *y, *size, *size);
                    if let Some(stroke) = stroke {
                        self.ctx.set_stroke_style_str(stroke);
                        self.ctx.stroke_rect(*x, *y, *size, *size);
                    }
                }
                DrawOp::Disc { cx, cy, radius, fill, stroke } => {
                    self.ctx.set_fill_style_str(fill);
                    self.ctx.begin_path();
                    self.ctx.arc(*cx, *cy, *radius, 0.0, PI * 2.0)?;
                    self.ctx.fill();
                    self.ctx.set_stroke_style_str(stroke);
                    self.ctx.stroke();
                }
                DrawOp::Label { text, x, y } => {
                    self.ctx.set_fill_style_str(LABEL);
                    self.ctx.set_font(LABEL_FONT);
                    self.ctx.fill_text(text, *x, *y)?;
                }
            }
        }
        Ok(())
    }
}
