//! Signature pad core: freehand stroke capture and raster export,
//! independent of any particular host surface.

pub mod device;
pub mod error;
pub mod input;
pub mod model;
pub mod pad;
pub mod surface;

pub use device::{DeviceClass, HostEnvironment, ListenTarget, Listener, PadAction};
pub use error::{PadError, PadResult};
pub use input::{InputEvent, PointerPosition, TouchPoint};
pub use model::*;
pub use pad::{EMPTY_DATA_URL, SignaturePad};
pub use surface::{DrawingContext, Surface};

// Re-export kurbo geometry so downstream crates don't need a direct dependency
pub use kurbo::{Point, Rect, Size};
