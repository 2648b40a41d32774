//! Drawing surface and 2D context abstraction.
//!
//! Mirrors the subset of the HTML canvas API the pad needs, so the same
//! state machine drives a browser `<canvas>` and the software rasterizer.
//! Coordinates passed to a context are logical pixels; the context's
//! transform maps them onto the backing buffer.

use crate::error::PadResult;
use crate::model::{LineCap, LineJoin};
use kurbo::{Point, Rect, Size};

/// A 2D drawing context bound to a surface.
pub trait DrawingContext {
    /// The surface type this context can copy pixels from.
    type Surface;

    /// Post-multiply the current transform by a scale.
    fn scale(&mut self, x: f64, y: f64);

    fn set_line_width(&mut self, width: f64);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);
    /// Set the stroke color from a CSS color string.
    fn set_stroke_style(&mut self, color: &str);
    /// Set the fill color from a CSS color string.
    fn set_fill_style(&mut self, color: &str);

    fn begin_path(&mut self);
    fn move_to(&mut self, p: Point);
    fn line_to(&mut self, p: Point);
    fn close_path(&mut self);
    /// Stroke the current path with the current stroke state.
    fn stroke(&mut self);

    fn fill_rect(&mut self, rect: Rect);

    /// Draw the whole backing buffer of `source`, scaled into `dest`.
    fn draw_surface(&mut self, source: &Self::Surface, dest: Rect);
}

/// A drawable area with a layout (displayed) size and a backing buffer.
pub trait Surface: Sized {
    type Context: DrawingContext<Surface = Self>;

    /// Obtain the surface's 2D context, if it has one.
    fn context_2d(&mut self) -> Option<Self::Context>;

    /// Size the surface occupies on screen, in logical pixels.
    fn displayed_size(&self) -> Size;

    /// Pin the on-screen size (the CSS `width`/`height`).
    fn set_displayed_size(&mut self, size: Size);

    /// Backing buffer size in device pixels.
    fn backing_size(&self) -> (u32, u32);

    /// Resize the backing buffer. Clears its content.
    fn set_backing_size(&mut self, width: u32, height: u32);

    /// Bounding box in viewport coordinates. Queried on every touch event.
    fn bounding_rect(&self) -> Rect;

    /// Create a separate off-screen surface whose backing buffer is exactly
    /// `width × height`.
    fn create_offscreen(&self, width: u32, height: u32) -> PadResult<Self>;

    /// Encode the backing buffer as a data URI.
    fn to_data_url(&self, mime: &str, quality: f64) -> PadResult<String>;
}
