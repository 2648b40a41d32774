//! The signature pad: stroke state machine over a [`Surface`].
//!
//! ```text
//! idle ──down──▶ drawing ──move──▶ drawing
//!   ▲              │
//!   └──up/cancel───┘        (moves while idle are ignored)
//! ```

use crate::device::{DeviceClass, HostEnvironment, Listener};
use crate::error::{PadError, PadResult};
use crate::input::{InputEvent, PointerPosition};
use crate::model::{LineCap, LineJoin, PadConfig, PadOptions, or_default_num};
use crate::surface::{DrawingContext, Surface};
use kurbo::{Point, Rect, Size};

/// Data URI returned for a zero-area export, as canvases do.
pub const EMPTY_DATA_URL: &str = "data:,";

pub struct SignaturePad<S: Surface> {
    surface: S,
    ctx: S::Context,
    config: PadConfig,
    pixel_ratio: f64,
    device: DeviceClass,
    /// End of the most recently drawn segment.
    last_point: Point,
    drawing: bool,
}

impl<S: Surface> SignaturePad<S> {
    /// Bind a pad to `surface`.
    ///
    /// Scales the backing buffer by the host's pixel ratio while keeping the
    /// displayed size, merges `options` over the defaults and classifies the
    /// device. Fails if the surface has no 2D context.
    pub fn new(
        mut surface: S,
        env: &HostEnvironment,
        options: Option<&PadOptions>,
    ) -> PadResult<Self> {
        let mut ctx = surface.context_2d().ok_or(PadError::ContextUnavailable)?;

        let pixel_ratio = env.pixel_ratio();
        let displayed = surface.displayed_size();
        surface.set_backing_size(
            (displayed.width * pixel_ratio) as u32,
            (displayed.height * pixel_ratio) as u32,
        );
        surface.set_displayed_size(displayed);
        ctx.scale(pixel_ratio, pixel_ratio);

        let config = PadConfig::merge(options);
        let device = env.device_class();
        log::debug!(
            "signature pad bound: {}x{} @{}x, {:?}, {:?}",
            displayed.width,
            displayed.height,
            pixel_ratio,
            device,
            config
        );

        Ok(Self {
            surface,
            ctx,
            config,
            pixel_ratio,
            device,
            last_point: Point::ZERO,
            drawing: false,
        })
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn is_mobile_device(&self) -> bool {
        self.device.is_mobile()
    }

    pub fn device_class(&self) -> DeviceClass {
        self.device
    }

    /// Scale factor applied to the backing buffer.
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub fn config(&self) -> &PadConfig {
        &self.config
    }

    /// Whether a stroke is in progress.
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn last_point(&self) -> Point {
        self.last_point
    }

    /// Listeners the host must install for the detected device class.
    pub fn listeners(&self) -> &'static [Listener] {
        self.device.listeners()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Dispatch a normalized event. Returns `true` if anything was drawn.
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { position } => self.pointer_down(position),
            InputEvent::PointerMove { position } => self.pointer_move(position),
            InputEvent::PointerUp | InputEvent::PointerCancel => self.pointer_up(),
        }
    }

    /// Start a stroke: draw a dot at the pointer and remember it.
    pub fn pointer_down(&mut self, position: &PointerPosition) -> bool {
        let Some(p) = self.resolve(position) else {
            log::debug!("pointer down without a contact point, ignored");
            return false;
        };
        self.last_point = p;
        self.draw_segment(p, p);
        self.drawing = true;
        true
    }

    /// Extend the active stroke with a straight segment.
    pub fn pointer_move(&mut self, position: &PointerPosition) -> bool {
        if !self.drawing {
            return false;
        }
        let Some(p) = self.resolve(position) else {
            log::debug!("pointer move without a contact point, ignored");
            return false;
        };
        self.draw_segment(self.last_point, p);
        self.last_point = p;
        true
    }

    /// End the stroke (pointer up or touch cancel). Never draws.
    pub fn pointer_up(&mut self) -> bool {
        self.drawing = false;
        false
    }

    fn resolve(&self, position: &PointerPosition) -> Option<Point> {
        position.to_local(self.surface.bounding_rect())
    }

    // ─── Drawing ─────────────────────────────────────────────────────────

    fn apply_stroke_style(&mut self) {
        self.ctx.set_line_width(self.config.line_width);
        self.ctx.set_line_cap(LineCap::Round);
        self.ctx.set_line_join(LineJoin::Round);
        self.ctx.set_stroke_style(&self.config.color);
    }

    fn draw_segment(&mut self, from: Point, to: Point) {
        log::trace!("segment ({}, {}) -> ({}, {})", from.x, from.y, to.x, to.y);
        self.apply_stroke_style();
        self.ctx.begin_path();
        self.ctx.move_to(from);
        self.ctx.line_to(to);
        self.ctx.stroke();
        self.ctx.close_path();
    }

    /// Repaint the visible area with the background color.
    pub fn clear(&mut self) {
        let size = self.surface.displayed_size();
        self.ctx.set_fill_style(&self.config.bg_color);
        self.ctx.fill_rect(Rect::from_origin_size(Point::ZERO, size));
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// Export the current content as a data URI.
    ///
    /// `width`/`height` default to the displayed size (an explicit `0` also
    /// falls back). The live surface is left untouched.
    pub fn generate_image(&self, width: Option<f64>, height: Option<f64>) -> PadResult<String> {
        let displayed = self.surface.displayed_size();
        let target = Size::new(
            or_default_num(width, displayed.width),
            or_default_num(height, displayed.height),
        );
        let (w, h) = (target.width as u32, target.height as u32);
        if w == 0 || h == 0 {
            return Ok(EMPTY_DATA_URL.to_string());
        }

        let mut offscreen = self.surface.create_offscreen(w, h)?;
        let mut ctx = offscreen
            .context_2d()
            .ok_or(PadError::ContextUnavailable)?;
        let dest = Rect::new(0.0, 0.0, w as f64, h as f64);
        ctx.set_fill_style(&self.config.bg_color);
        ctx.fill_rect(dest);
        ctx.draw_surface(&self.surface, dest);

        log::debug!("exporting {w}x{h} as {}", self.config.image_type);
        offscreen.to_data_url(&self.config.image_type, self.config.quality)
    }
}
