//! Software rendering backend for the signature pad.
//!
//! `RasterSurface` implements the core surface traits on a tiny-skia pixmap,
//! so a pad can be driven and exported without a browser.
//!
//! ```rust,ignore
//! use sigpad_core::{HostEnvironment, InputEvent, SignaturePad};
//! use sigpad_raster::RasterSurface;
//!
//! let surface = RasterSurface::new(300.0, 150.0);
//! let mut pad = SignaturePad::new(surface, &HostEnvironment::desktop(2.0), None)?;
//! pad.handle(&InputEvent::mouse_down(10.0, 10.0));
//! let url = pad.generate_image(None, None)?;
//! ```

pub mod canvas;
pub mod encode;

pub use canvas::{RasterContext, RasterSurface};
pub use encode::{ImageFormat, data_url, encode_pixmap};
