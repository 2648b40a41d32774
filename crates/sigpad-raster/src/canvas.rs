//! Software canvas: a tiny-skia pixmap behind the [`Surface`] traits.
//!
//! The surface and every context obtained from it share one backing store,
//! as a `<canvas>` and its `CanvasRenderingContext2D` do. Resizing the
//! backing buffer clears its pixels and resets the drawing state.

use crate::encode::{self, ImageFormat};
use sigpad_core::{
    DrawingContext, LineCap, LineJoin, PadError, PadResult, Point, Rect, Size, Surface,
};
use std::cell::RefCell;
use std::rc::Rc;
use tiny_skia::{
    FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

// ─── Drawing state ───────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct DrawingState {
    fill: tiny_skia::Color,
    stroke: tiny_skia::Color,
    line_width: f32,
    line_cap: LineCap,
    line_join: LineJoin,
    transform: Transform,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self {
            fill: tiny_skia::Color::BLACK,
            stroke: tiny_skia::Color::BLACK,
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            transform: Transform::identity(),
        }
    }
}

/// Pixels plus the context state that lives with them.
struct Backing {
    /// `None` when either dimension is zero.
    pixmap: Option<Pixmap>,
    state: DrawingState,
    path: PathBuilder,
    /// Points of the current path, used to detect zero-length subpaths.
    path_points: Vec<(f32, f32)>,
}

impl Backing {
    fn new(width: u32, height: u32) -> Self {
        Self {
            pixmap: Pixmap::new(width, height),
            state: DrawingState::default(),
            path: PathBuilder::new(),
            path_points: Vec::new(),
        }
    }

    fn size(&self) -> (u32, u32) {
        self.pixmap
            .as_ref()
            .map(|p| (p.width(), p.height()))
            .unwrap_or((0, 0))
    }
}

// ─── Surface ─────────────────────────────────────────────────────────────

/// An in-memory drawing surface.
pub struct RasterSurface {
    backing: Rc<RefCell<Backing>>,
    displayed: Size,
    /// Top-left corner in viewport coordinates.
    origin: Point,
}

impl RasterSurface {
    /// A surface displayed at `width × height` logical pixels, with a backing
    /// buffer of the same size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            backing: Rc::new(RefCell::new(Backing::new(width as u32, height as u32))),
            displayed: Size::new(width, height),
            origin: Point::ZERO,
        }
    }

    /// Place the surface at `origin` in viewport coordinates.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Straight-alpha RGBA of a backing pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let backing = self.backing.borrow();
        let c = backing.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Encode the backing buffer, returning the format actually used.
    pub fn encode(&self, mime: &str, quality: f64) -> PadResult<(ImageFormat, Vec<u8>)> {
        let backing = self.backing.borrow();
        let (w, h) = backing.size();
        let pixmap = backing
            .pixmap
            .as_ref()
            .ok_or(PadError::InvalidDimensions {
                width: w,
                height: h,
            })?;
        encode::encode_pixmap(pixmap, mime, quality)
    }
}

impl Surface for RasterSurface {
    type Context = RasterContext;

    fn context_2d(&mut self) -> Option<RasterContext> {
        Some(RasterContext {
            backing: self.backing.clone(),
        })
    }

    fn displayed_size(&self) -> Size {
        self.displayed
    }

    fn set_displayed_size(&mut self, size: Size) {
        self.displayed = size;
    }

    fn backing_size(&self) -> (u32, u32) {
        self.backing.borrow().size()
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        *self.backing.borrow_mut() = Backing::new(width, height);
    }

    fn bounding_rect(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.displayed)
    }

    fn create_offscreen(&self, width: u32, height: u32) -> PadResult<Self> {
        let surface = Self::new(width as f64, height as f64);
        if surface.backing.borrow().pixmap.is_none() {
            return Err(PadError::InvalidDimensions { width, height });
        }
        Ok(surface)
    }

    fn to_data_url(&self, mime: &str, quality: f64) -> PadResult<String> {
        if self.backing.borrow().pixmap.is_none() {
            return Ok(sigpad_core::EMPTY_DATA_URL.to_string());
        }
        let (format, bytes) = self.encode(mime, quality)?;
        Ok(encode::data_url(format, &bytes))
    }
}

// ─── Context ─────────────────────────────────────────────────────────────

/// 2D context over a [`RasterSurface`].
pub struct RasterContext {
    backing: Rc<RefCell<Backing>>,
}

impl DrawingContext for RasterContext {
    type Surface = RasterSurface;

    fn scale(&mut self, x: f64, y: f64) {
        let mut b = self.backing.borrow_mut();
        b.state.transform = b.state.transform.pre_scale(x as f32, y as f32);
    }

    fn set_line_width(&mut self, width: f64) {
        // Canvas ignores zero, negative and non-finite widths.
        if width.is_finite() && width > 0.0 {
            self.backing.borrow_mut().state.line_width = width as f32;
        }
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.backing.borrow_mut().state.line_cap = cap;
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.backing.borrow_mut().state.line_join = join;
    }

    fn set_stroke_style(&mut self, color: &str) {
        if let Some(c) = parse_color(color) {
            self.backing.borrow_mut().state.stroke = c;
        }
    }

    fn set_fill_style(&mut self, color: &str) {
        if let Some(c) = parse_color(color) {
            self.backing.borrow_mut().state.fill = c;
        }
    }

    fn begin_path(&mut self) {
        let mut b = self.backing.borrow_mut();
        b.path = PathBuilder::new();
        b.path_points.clear();
    }

    fn move_to(&mut self, p: Point) {
        let mut b = self.backing.borrow_mut();
        b.path.move_to(p.x as f32, p.y as f32);
        b.path_points.push((p.x as f32, p.y as f32));
    }

    fn line_to(&mut self, p: Point) {
        let mut b = self.backing.borrow_mut();
        b.path.line_to(p.x as f32, p.y as f32);
        b.path_points.push((p.x as f32, p.y as f32));
    }

    fn close_path(&mut self) {
        self.backing.borrow_mut().path.close();
    }

    fn stroke(&mut self) {
        let mut guard = self.backing.borrow_mut();
        let b = &mut *guard;
        let Some(pixmap) = b.pixmap.as_mut() else {
            return;
        };
        let state = &b.state;
        let paint = solid_paint(state.stroke);

        // The path is kept after stroking, as on a canvas.
        if let Some(&(x, y)) = b.path_points.first()
            && b.path_points.iter().all(|&p| p == (x, y))
        {
            stroke_dot(pixmap, x, y, state, &paint);
            return;
        }

        let Some(path) = b.path.clone().finish() else {
            return;
        };
        let stroke = Stroke {
            width: state.line_width,
            line_cap: map_cap(state.line_cap),
            line_join: map_join(state.line_join),
            ..Default::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, state.transform, None);
    }

    fn fill_rect(&mut self, rect: Rect) {
        let mut guard = self.backing.borrow_mut();
        let b = &mut *guard;
        let Some(pixmap) = b.pixmap.as_mut() else {
            return;
        };
        if let Some(r) = tiny_skia::Rect::from_xywh(
            rect.x0 as f32,
            rect.y0 as f32,
            rect.width() as f32,
            rect.height() as f32,
        ) {
            pixmap.fill_rect(r, &solid_paint(b.state.fill), b.state.transform, None);
        }
    }

    fn draw_surface(&mut self, source: &RasterSurface, dest: Rect) {
        // Copy first so drawing a surface onto itself cannot double-borrow.
        let Some(src) = source.backing.borrow().pixmap.clone() else {
            return;
        };
        let mut guard = self.backing.borrow_mut();
        let b = &mut *guard;
        let Some(pixmap) = b.pixmap.as_mut() else {
            return;
        };
        let sx = dest.width() as f32 / src.width() as f32;
        let sy = dest.height() as f32 / src.height() as f32;
        let transform = b
            .state
            .transform
            .pre_translate(dest.x0 as f32, dest.y0 as f32)
            .pre_scale(sx, sy);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        pixmap.draw_pixmap(0, 0, src.as_ref(), &paint, transform, None);
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────

/// Zero-length subpaths render as their caps: a disc for round caps, a
/// square for square caps, nothing for butt caps.
fn stroke_dot(pixmap: &mut Pixmap, x: f32, y: f32, state: &DrawingState, paint: &Paint) {
    let r = state.line_width / 2.0;
    let shape = match state.line_cap {
        LineCap::Round => PathBuilder::from_circle(x, y, r),
        LineCap::Square => {
            tiny_skia::Rect::from_xywh(x - r, y - r, r * 2.0, r * 2.0).map(PathBuilder::from_rect)
        }
        LineCap::Butt => None,
    };
    if let Some(path) = shape {
        pixmap.fill_path(&path, paint, FillRule::Winding, state.transform, None);
    }
}

fn solid_paint(color: tiny_skia::Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

/// Parse a CSS color. Invalid colors are ignored, as a canvas ignores them.
fn parse_color(s: &str) -> Option<tiny_skia::Color> {
    match csscolorparser::parse(s) {
        Ok(parsed) => {
            let [r, g, b, a] = parsed.to_array();
            tiny_skia::Color::from_rgba(r, g, b, a)
        }
        Err(e) => {
            log::warn!("ignoring invalid color {s:?}: {e}");
            None
        }
    }
}

fn map_cap(cap: LineCap) -> tiny_skia::LineCap {
    match cap {
        LineCap::Butt => tiny_skia::LineCap::Butt,
        LineCap::Round => tiny_skia::LineCap::Round,
        LineCap::Square => tiny_skia::LineCap::Square,
    }
}

fn map_join(join: LineJoin) -> tiny_skia::LineJoin {
    match join {
        LineJoin::Miter => tiny_skia::LineJoin::Miter,
        LineJoin::Round => tiny_skia::LineJoin::Round,
        LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_surface_is_transparent() {
        let s = RasterSurface::new(4.0, 4.0);
        assert_eq!(s.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(s.backing_size(), (4, 4));
    }

    #[test]
    fn resizing_clears_pixels_and_state() {
        let mut s = RasterSurface::new(4.0, 4.0);
        let mut ctx = s.context_2d().unwrap();
        ctx.scale(2.0, 2.0);
        ctx.set_fill_style("red");
        ctx.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(s.pixel(1, 1), Some([255, 0, 0, 255]));

        s.set_backing_size(8, 8);
        assert_eq!(s.backing_size(), (8, 8));
        assert_eq!(s.pixel(1, 1), Some([0, 0, 0, 0]));

        // Transform and fill were reset: a 1×1 fill now covers one pixel.
        ctx.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(s.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(s.pixel(1, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn invalid_colors_are_ignored() {
        let mut s = RasterSurface::new(2.0, 2.0);
        let mut ctx = s.context_2d().unwrap();
        ctx.set_fill_style("#00f");
        ctx.set_fill_style("not a color");
        ctx.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0));
        assert_eq!(s.pixel(0, 0), Some([0, 0, 255, 255]));
    }

    #[test]
    fn zero_length_round_subpath_draws_a_disc() {
        let mut s = RasterSurface::new(20.0, 20.0);
        let mut ctx = s.context_2d().unwrap();
        ctx.set_line_width(6.0);
        ctx.set_line_cap(LineCap::Round);
        ctx.begin_path();
        ctx.move_to(Point::new(10.0, 10.0));
        ctx.line_to(Point::new(10.0, 10.0));
        ctx.stroke();

        assert_eq!(s.pixel(10, 10), Some([0, 0, 0, 255]));
        assert_eq!(s.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(s.pixel(10, 16), Some([0, 0, 0, 0]));
    }

    #[test]
    fn zero_length_butt_subpath_draws_nothing() {
        let mut s = RasterSurface::new(20.0, 20.0);
        let mut ctx = s.context_2d().unwrap();
        ctx.set_line_width(6.0);
        ctx.begin_path();
        ctx.move_to(Point::new(10.0, 10.0));
        ctx.line_to(Point::new(10.0, 10.0));
        ctx.stroke();
        assert_eq!(s.pixel(10, 10), Some([0, 0, 0, 0]));
    }

    #[test]
    fn non_positive_line_width_is_ignored() {
        let mut s = RasterSurface::new(20.0, 20.0);
        let mut ctx = s.context_2d().unwrap();
        ctx.set_line_width(4.0);
        ctx.set_line_width(0.0);
        ctx.set_line_width(-3.0);
        assert_eq!(s.backing.borrow().state.line_width, 4.0);
    }

    #[test]
    fn bounding_rect_follows_origin() {
        let s = RasterSurface::new(300.0, 150.0).with_origin(Point::new(8.0, 20.0));
        assert_eq!(s.bounding_rect(), Rect::new(8.0, 20.0, 308.0, 170.0));
        let scrolled = RasterSurface::new(300.0, 150.0).with_origin(Point::new(8.0, -40.0));
        assert_eq!(scrolled.bounding_rect().origin(), Point::new(8.0, -40.0));
    }

    #[test]
    fn zero_sized_offscreen_is_rejected() {
        let s = RasterSurface::new(10.0, 10.0);
        assert!(matches!(
            s.create_offscreen(0, 10),
            Err(PadError::InvalidDimensions {
                width: 0,
                height: 10
            })
        ));
    }
}
