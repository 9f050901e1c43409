//! Resolution of caller-supplied render options against global defaults.
//!
//! Options arrive as a loosely typed map (JSON body, query string, CLI). Every
//! value is validated individually: out-of-range numbers are clamped, unknown
//! style tokens and malformed colors fall back to the configured default.
//! Resolution never fails.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::domain::entities::{
    Color, EyeStyle, MAX_LOGO_SIZE_PERCENT, MAX_MARGIN, MAX_SIZE, MIN_LOGO_SIZE_PERCENT, MIN_SIZE,
    ModuleStyle, OutputFormat, RenderRequest, StyleDefaults,
};

/// Render options exactly as the caller supplied them.
///
/// Recognized keys: `size`, `color`, `bg`, `eyeColor`, `format`, `margin`,
/// `moduleStyle`, `eyeStyle`, `logo`, `logoSize` (alias `logoSizePercent`).
/// Unrecognized keys are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRenderOptions {
    pub size: Option<i64>,
    pub color: Option<String>,
    pub bg: Option<String>,
    pub eye_color: Option<String>,
    pub format: Option<String>,
    pub margin: Option<i64>,
    pub module_style: Option<String>,
    pub eye_style: Option<String>,
    pub logo: Option<String>,
    pub logo_size: Option<i64>,
}

impl RawRenderOptions {
    /// Extracts options from a JSON object.
    ///
    /// String fields also accept numbers (`"logo": 5` reads as `"5"`) and
    /// integer fields accept numeric strings. Booleans, arrays, objects and
    /// `null` are treated as absent, as are blank strings.
    pub fn from_json(map: &Map<String, Value>) -> Self {
        Self {
            size: map.get("size").and_then(int_value),
            color: map.get("color").and_then(string_value),
            bg: map.get("bg").and_then(string_value),
            eye_color: map.get("eyeColor").and_then(string_value),
            format: map.get("format").and_then(string_value),
            margin: map.get("margin").and_then(int_value),
            module_style: map.get("moduleStyle").and_then(string_value),
            eye_style: map.get("eyeStyle").and_then(string_value),
            logo: map.get("logo").and_then(string_value),
            logo_size: map
                .get("logoSize")
                .or_else(|| map.get("logoSizePercent"))
                .and_then(int_value),
        }
    }

    /// Extracts options from string pairs such as a parsed query string.
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let map = params
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect::<Map<_, _>>();

        Self::from_json(&map)
    }
}

fn int_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.round() as i64))
        }
        _ => None,
    }
}

fn string_value(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    (!s.is_empty()).then_some(s)
}

fn clamp(value: Option<i64>, default: u32, min: u32, max: u32) -> u32 {
    value
        .unwrap_or(i64::from(default))
        .clamp(i64::from(min), i64::from(max)) as u32
}

/// Resolves raw options for `url` into a clamped [`RenderRequest`].
///
/// # Rules
///
/// - `size` is clamped to 50–2000, `margin` to 0–10, `logoSize` to 10–30
/// - `format`, `moduleStyle`, `eyeStyle` fall back to defaults when unrecognized
/// - colors are normalized to canonical hex; malformed colors fall back to defaults
/// - for SVG output the logo reference is dropped, since vector output is
///   never composited
pub fn resolve(url: &str, raw: &RawRenderOptions, defaults: &StyleDefaults) -> RenderRequest {
    let format = raw
        .format
        .as_deref()
        .and_then(OutputFormat::parse)
        .unwrap_or(defaults.format);

    let logo_ref = match format {
        OutputFormat::Png => raw.logo.clone(),
        OutputFormat::Svg => None,
    };

    RenderRequest {
        url: url.to_string(),
        size: clamp(raw.size, defaults.size, MIN_SIZE, MAX_SIZE),
        foreground: raw
            .color
            .as_deref()
            .and_then(Color::from_hex)
            .unwrap_or(defaults.foreground),
        background: raw
            .bg
            .as_deref()
            .and_then(Color::from_hex)
            .unwrap_or(defaults.background),
        eye_color: raw
            .eye_color
            .as_deref()
            .and_then(Color::from_hex)
            .or(defaults.eye_color),
        format,
        margin: clamp(raw.margin, defaults.margin, 0, MAX_MARGIN),
        module_style: raw
            .module_style
            .as_deref()
            .and_then(ModuleStyle::parse)
            .unwrap_or(defaults.module_style),
        eye_style: raw
            .eye_style
            .as_deref()
            .and_then(EyeStyle::parse)
            .unwrap_or(defaults.eye_style),
        logo_ref,
        logo_size_percent: clamp(
            raw.logo_size,
            defaults.logo_size_percent,
            MIN_LOGO_SIZE_PERCENT,
            MAX_LOGO_SIZE_PERCENT,
        ),
    }
}
