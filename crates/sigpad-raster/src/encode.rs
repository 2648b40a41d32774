//! Pixmap → PNG / JPEG / WebP bytes → base64 data URI.
//!
//! Follows `HTMLCanvasElement.toDataURL`: an unsupported MIME type falls
//! back to PNG, and a quality outside `0..=1` falls back to the default.

use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};
use sigpad_core::{DEFAULT_QUALITY, PadError, PadResult};
use tiny_skia::Pixmap;

/// Raster formats the software surface can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    /// Lossless only; quality is ignored.
    Webp,
}

impl ImageFormat {
    /// Match a MIME type (case-insensitive). `None` for anything unsupported.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }
}

/// Encode `pixmap` as `mime`, falling back to PNG for unknown types.
pub fn encode_pixmap(pixmap: &Pixmap, mime: &str, quality: f64) -> PadResult<(ImageFormat, Vec<u8>)> {
    let format = ImageFormat::from_mime(mime).unwrap_or_else(|| {
        log::debug!("unsupported export type {mime:?}, using PNG");
        ImageFormat::Png
    });
    let (w, h) = (pixmap.width(), pixmap.height());
    let mut buf = Vec::new();

    let result = match format {
        ImageFormat::Png => PngEncoder::new(&mut buf).write_image(
            &straight_rgba(pixmap),
            w,
            h,
            ExtendedColorType::Rgba8,
        ),
        ImageFormat::Jpeg => JpegEncoder::new_with_quality(&mut buf, jpeg_quality(quality)).write_image(
            &rgb_over_black(pixmap),
            w,
            h,
            ExtendedColorType::Rgb8,
        ),
        ImageFormat::Webp => WebPEncoder::new_lossless(&mut buf).write_image(
            &straight_rgba(pixmap),
            w,
            h,
            ExtendedColorType::Rgba8,
        ),
    };
    result.map_err(|e| PadError::Encode(e.to_string()))?;
    Ok((format, buf))
}

/// `data:<mime>;base64,<payload>`.
pub fn data_url(format: ImageFormat, bytes: &[u8]) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{payload}", format.mime())
}

/// Map canvas quality (0..=1) to a JPEG quality (1..=100).
fn jpeg_quality(quality: f64) -> u8 {
    let q = if (0.0..=1.0).contains(&quality) {
        quality
    } else {
        DEFAULT_QUALITY
    };
    (q * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Premultiplied pixmap data → straight-alpha RGBA.
fn straight_rgba(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}

/// Composite onto opaque black and drop alpha. Premultiplied channels are
/// exactly that composite.
fn rgb_over_black(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| [p.red(), p.green(), p.blue()])
        .collect()
}
