//! Replay a recorded event log onto a software surface.

use anyhow::{Context, Result, bail};
use base64::Engine;
use sigpad_core::{HostEnvironment, InputEvent, PadOptions, Point, SignaturePad};
use sigpad_raster::RasterSurface;

/// Everything needed to rebuild the pad the events were recorded on.
#[derive(Debug, Clone)]
pub struct ReplaySetup {
    pub width: f64,
    pub height: f64,
    pub env: HostEnvironment,
    /// Surface origin in viewport coordinates, for touch logs.
    pub origin: Point,
    pub options: Option<PadOptions>,
}

#[derive(Debug)]
pub struct ReplayOutcome {
    pub events: usize,
    /// Events that drew something.
    pub drawn: usize,
    pub data_url: String,
}

/// Parse a JSON array of events.
pub fn parse_events(json: &str) -> Result<Vec<InputEvent>> {
    serde_json::from_str(json).context("event log is not a JSON array of pointer events")
}

pub fn parse_options(json: &str) -> Result<PadOptions> {
    serde_json::from_str(json).context("invalid pad options")
}

/// Drive a fresh pad with `events`, then export it.
pub fn replay(
    setup: &ReplaySetup,
    events: &[InputEvent],
    export_width: Option<f64>,
    export_height: Option<f64>,
) -> Result<ReplayOutcome> {
    let surface = RasterSurface::new(setup.width, setup.height).with_origin(setup.origin);
    let mut pad = SignaturePad::new(surface, &setup.env, setup.options.as_ref())?;
    log::debug!(
        "replaying {} events on {}x{} @{}x ({:?})",
        events.len(),
        setup.width,
        setup.height,
        pad.pixel_ratio(),
        pad.device_class()
    );

    let drawn = events.iter().filter(|e| pad.handle(e)).count();
    let data_url = pad.generate_image(export_width, export_height)?;
    Ok(ReplayOutcome {
        events: events.len(),
        drawn,
        data_url,
    })
}

/// Decode the payload of a base64 data URI.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let Some((_, payload)) = url.split_once(";base64,") else {
        bail!("nothing to export: the pad has zero area");
    };
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .context("export is not valid base64")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LOG: &str = r#"[
        {"type":"pointerMove","position":{"device":"mouse","offsetX":5,"offsetY":5}},
        {"type":"pointerDown","position":{"device":"mouse","offsetX":20,"offsetY":40}},
        {"type":"pointerMove","position":{"device":"mouse","offsetX":100,"offsetY":60}},
        {"type":"pointerMove","position":{"device":"mouse","offsetX":180,"offsetY":30}},
        {"type":"pointerUp"},
        {"type":"pointerMove","position":{"device":"mouse","offsetX":250,"offsetY":100}}
    ]"#;

    fn setup() -> ReplaySetup {
        ReplaySetup {
            width: 300.0,
            height: 150.0,
            env: HostEnvironment::desktop(2.0),
            origin: Point::ZERO,
            options: None,
        }
    }

    #[test]
    fn replay_counts_drawing_events() {
        let events = parse_events(LOG).unwrap();
        let out = replay(&setup(), &events, None, None).unwrap();
        assert_eq!(out.events, 6);
        // Down and the two in-stroke moves; idle moves and up draw nothing.
        assert_eq!(out.drawn, 3);
        assert!(out.data_url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn replay_matches_driving_the_pad_directly() {
        let events = parse_events(LOG).unwrap();
        let replayed = replay(&setup(), &events, Some(150.0), Some(75.0)).unwrap();

        let mut pad = SignaturePad::new(
            RasterSurface::new(300.0, 150.0),
            &HostEnvironment::desktop(2.0),
            None,
        )
        .unwrap();
        pad.handle(&InputEvent::mouse_down(20.0, 40.0));
        pad.handle(&InputEvent::mouse_move(100.0, 60.0));
        pad.handle(&InputEvent::mouse_move(180.0, 30.0));
        pad.handle(&InputEvent::PointerUp);
        let direct = pad.generate_image(Some(150.0), Some(75.0)).unwrap();

        assert_eq!(replayed.data_url, direct);
    }

    #[test]
    fn touch_logs_replay_relative_to_origin() {
        let log = r#"[
            {"type":"pointerDown","position":{"device":"touch","touches":[{"clientX":120,"clientY":540}]}},
            {"type":"pointerMove","position":{"device":"touch","touches":[{"clientX":200,"clientY":560}]}},
            {"type":"pointerCancel"}
        ]"#;
        let touch = ReplaySetup {
            env: HostEnvironment::touch(2.0),
            origin: Point::new(100.0, 500.0),
            ..setup()
        };
        let from_touch = replay(&touch, &parse_events(log).unwrap(), None, None).unwrap();

        let mouse = vec![
            InputEvent::mouse_down(20.0, 40.0),
            InputEvent::mouse_move(100.0, 60.0),
            InputEvent::PointerUp,
        ];
        let from_mouse = replay(&setup(), &mouse, None, None).unwrap();
        assert_eq!(from_touch.data_url, from_mouse.data_url);
    }

    #[test]
    fn decoded_export_is_png() {
        let out = replay(&setup(), &[], Some(10.0), Some(10.0)).unwrap();
        let bytes = decode_data_url(&out.data_url).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn zero_area_export_cannot_be_decoded() {
        let empty = ReplaySetup {
            width: 0.0,
            ..setup()
        };
        let out = replay(&empty, &[], None, None).unwrap();
        assert_eq!(out.data_url, "data:,");
        assert!(decode_data_url(&out.data_url).is_err());
    }

    #[test]
    fn malformed_log_is_rejected() {
        assert!(parse_events(r#"[{"type":"pinch"}]"#).is_err());
        assert!(parse_events(r#"{"type":"pointerUp"}"#).is_err());
    }
}
