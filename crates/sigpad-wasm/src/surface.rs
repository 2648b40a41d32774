//! `<canvas>`-backed surface.
//!
//! Thin adapter from the core surface traits onto `HtmlCanvasElement` and
//! `CanvasRenderingContext2d`. Canvas calls that can throw are logged and
//! otherwise ignored, matching how the context treats bad input.

use sigpad_core::{
    DrawingContext, LineCap, LineJoin, PadError, PadResult, Point, Rect, Size, Surface,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

pub struct WebSurface {
    canvas: HtmlCanvasElement,
    /// Used to create off-screen canvases for export.
    document: Document,
}

impl WebSurface {
    pub fn new(canvas: HtmlCanvasElement, document: Document) -> Self {
        Self { canvas, document }
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for WebSurface {
    type Context = WebContext;

    fn context_2d(&mut self) -> Option<WebContext> {
        let ctx = self
            .canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(WebContext { ctx })
    }

    fn displayed_size(&self) -> Size {
        Size::new(
            self.canvas.offset_width() as f64,
            self.canvas.offset_height() as f64,
        )
    }

    fn set_displayed_size(&mut self, size: Size) {
        let style = self.canvas.style();
        let width = style.set_property("width", &format!("{}px", size.width));
        let height = style.set_property("height", &format!("{}px", size.height));
        if let Err(e) = width.and(height) {
            log::warn!("failed to pin canvas display size: {e:?}");
        }
    }

    fn backing_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn bounding_rect(&self) -> Rect {
        let r = self.canvas.get_bounding_client_rect();
        Rect::new(r.left(), r.top(), r.right(), r.bottom())
    }

    fn create_offscreen(&self, width: u32, height: u32) -> PadResult<Self> {
        let canvas = self
            .document
            .create_element("canvas")
            .map_err(host_error)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| PadError::Host("created element is not a canvas".into()))?;
        canvas.set_width(width);
        canvas.set_height(height);
        Ok(Self::new(canvas, self.document.clone()))
    }

    fn to_data_url(&self, mime: &str, quality: f64) -> PadResult<String> {
        self.canvas
            .to_data_url_with_type_and_encoder_options(mime, &JsValue::from_f64(quality))
            .map_err(host_error)
    }
}

fn host_error(e: JsValue) -> PadError {
    PadError::Host(format!("{e:?}"))
}

// ─── Context ─────────────────────────────────────────────────────────────

pub struct WebContext {
    ctx: CanvasRenderingContext2d,
}

impl DrawingContext for WebContext {
    type Surface = WebSurface;

    fn scale(&mut self, x: f64, y: f64) {
        if let Err(e) = self.ctx.scale(x, y) {
            log::warn!("canvas scale failed: {e:?}");
        }
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.ctx.set_line_cap(cap.as_str());
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.ctx.set_line_join(join.as_str());
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }

    fn set_fill_style(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, p: Point) {
        self.ctx.move_to(p.x, p.y);
    }

    fn line_to(&mut self, p: Point) {
        self.ctx.line_to(p.x, p.y);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.ctx
            .fill_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn draw_surface(&mut self, source: &WebSurface, dest: Rect) {
        if let Err(e) = self.ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
            &source.canvas,
            dest.x0,
            dest.y0,
            dest.width(),
            dest.height(),
        ) {
            log::warn!("drawImage failed: {e:?}");
        }
    }
}
