//! Pad configuration: user-facing options and the effective, merged config.
//!
//! Options are merged over defaults with a "falsy" rule: an absent field,
//! a numeric `0`/`NaN`, or an empty string all fall back to the default.
//! An explicit `lineWidth: 0` therefore still draws 5px strokes.

use serde::{Deserialize, Serialize};

// ─── Defaults ────────────────────────────────────────────────────────────

pub const DEFAULT_BG_COLOR: &str = "#fff";
pub const DEFAULT_LINE_WIDTH: f64 = 5.0;
pub const DEFAULT_COLOR: &str = "#000";
pub const DEFAULT_IMAGE_TYPE: &str = "image/png";
pub const DEFAULT_QUALITY: f64 = 0.92;

// ─── Options ─────────────────────────────────────────────────────────────

/// Construction options. Every field is optional.
///
/// Deserializes from the same camelCase shape a JS caller passes:
/// `{ "bgColor": "#fafafa", "lineWidth": 3, "type": "image/jpeg" }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PadOptions {
    pub bg_color: Option<String>,
    pub line_width: Option<f64>,
    pub color: Option<String>,
    #[serde(rename = "type")]
    pub image_type: Option<String>,
    pub quality: Option<f64>,
}

// ─── Effective config ────────────────────────────────────────────────────

/// Effective configuration. Fixed for the lifetime of a pad.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PadConfig {
    /// Fill color for the background and for exports.
    pub bg_color: String,
    /// Stroke thickness in logical pixels.
    pub line_width: f64,
    /// Stroke color.
    pub color: String,
    /// Export MIME type.
    #[serde(rename = "type")]
    pub image_type: String,
    /// Export compression quality, 0..=1.
    pub quality: f64,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            bg_color: DEFAULT_BG_COLOR.to_string(),
            line_width: DEFAULT_LINE_WIDTH,
            color: DEFAULT_COLOR.to_string(),
            image_type: DEFAULT_IMAGE_TYPE.to_string(),
            quality: DEFAULT_QUALITY,
        }
    }
}

impl PadConfig {
    /// Merge user options over the defaults.
    pub fn merge(options: Option<&PadOptions>) -> Self {
        let Some(opts) = options else {
            return Self::default();
        };
        Self {
            bg_color: or_default_str(opts.bg_color.as_deref(), DEFAULT_BG_COLOR),
            line_width: or_default_num(opts.line_width, DEFAULT_LINE_WIDTH),
            color: or_default_str(opts.color.as_deref(), DEFAULT_COLOR),
            image_type: or_default_str(opts.image_type.as_deref(), DEFAULT_IMAGE_TYPE),
            quality: or_default_num(opts.quality, DEFAULT_QUALITY),
        }
    }
}

/// `value || default` for strings.
fn or_default_str(value: Option<&str>, default: &str) -> String {
    match value {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => default.to_string(),
    }
}

/// `value || default` for numbers: `0` and `NaN` count as unset.
pub fn or_default_num(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if is_truthy(v) => v,
        _ => default,
    }
}

/// Numeric truthiness: everything except `0`, `-0` and `NaN`.
pub fn is_truthy(v: f64) -> bool {
    v != 0.0 && !v.is_nan()
}

// ─── Stroke style ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    pub fn as_str(self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl LineJoin {
    pub fn as_str(self) -> &'static str {
        match self {
            LineJoin::Miter => "miter",
            LineJoin::Round => "round",
            LineJoin::Bevel => "bevel",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_options_use_defaults() {
        assert_eq!(PadConfig::merge(None), PadConfig::default());
        assert_eq!(
            PadConfig::merge(Some(&PadOptions::default())),
            PadConfig::default()
        );
    }

    #[test]
    fn each_omitted_field_falls_back_individually() {
        let opts = PadOptions {
            color: Some("red".into()),
            quality: Some(0.5),
            ..Default::default()
        };
        let cfg = PadConfig::merge(Some(&opts));
        assert_eq!(cfg.color, "red");
        assert_eq!(cfg.quality, 0.5);
        assert_eq!(cfg.bg_color, DEFAULT_BG_COLOR);
        assert_eq!(cfg.line_width, DEFAULT_LINE_WIDTH);
        assert_eq!(cfg.image_type, DEFAULT_IMAGE_TYPE);
    }

    #[test]
    fn explicit_zero_is_treated_as_unset() {
        let opts = PadOptions {
            line_width: Some(0.0),
            quality: Some(0.0),
            ..Default::default()
        };
        let cfg = PadConfig::merge(Some(&opts));
        assert_eq!(cfg.line_width, 5.0);
        assert_eq!(cfg.quality, 0.92);
    }

    #[test]
    fn empty_strings_and_nan_are_treated_as_unset() {
        let opts = PadOptions {
            bg_color: Some(String::new()),
            color: Some(String::new()),
            image_type: Some(String::new()),
            line_width: Some(f64::NAN),
            quality: None,
        };
        assert_eq!(PadConfig::merge(Some(&opts)), PadConfig::default());
    }

    #[test]
    fn options_deserialize_from_camel_case_json() {
        let json = r##"{"bgColor":"#eee","lineWidth":2,"type":"image/jpeg","quality":0.8}"##;
        let opts: PadOptions = serde_json::from_str(json).unwrap();
        assert_eq!(opts.bg_color.as_deref(), Some("#eee"));
        assert_eq!(opts.line_width, Some(2.0));
        assert_eq!(opts.image_type.as_deref(), Some("image/jpeg"));
        assert_eq!(opts.color, None);

        let cfg = PadConfig::merge(Some(&opts));
        assert_eq!(cfg.color, "#000");
        assert_eq!(cfg.quality, 0.8);
    }

    #[test]
    fn negative_values_are_truthy_and_kept() {
        let opts = PadOptions {
            line_width: Some(-1.0),
            ..Default::default()
        };
        assert_eq!(PadConfig::merge(Some(&opts)).line_width, -1.0);
    }
}
