//! Deterministic cache keys for rendered QR payloads.

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256};

use crate::domain::entities::RenderRequest;

/// Field delimiter in the canonical tuple. Escaped inside free-form fields.
const DELIMITER: &str = ":";
/// Stand-in for absent optional fields.
const NULL_SENTINEL: &str = "null";
/// A present free-form value spelled like the sentinel, with its first byte
/// percent-encoded.
const ESCAPED_SENTINEL: &str = "%6Eull";

/// Logical groups of cache entries that can be evicted in bulk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheNamespace {
    /// Rendered QR images.
    Qr,
    /// Device-detection results written by the analytics side.
    Device,
}

impl CacheNamespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Qr => "qr",
            Self::Device => "device",
        }
    }

    /// Namespace encoded in a key's prefix, e.g. `qr:0f3a...`.
    pub fn of_key(key: &str) -> Option<Self> {
        key.split_once(DELIMITER)
            .and_then(|(prefix, _)| prefix.parse().ok())
    }
}

impl FromStr for CacheNamespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qr" => Ok(Self::Qr),
            "device" => Ok(Self::Device),
            other => Err(format!("Unknown cache namespace: {other}")),
        }
    }
}

impl fmt::Display for CacheNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the cache key for a resolved request.
///
/// Fields are serialized in a fixed order (url, size, foreground, background,
/// format, margin, moduleStyle, eyeStyle, eyeColor, logoRef, logoSizePercent),
/// joined with `:`, hashed with SHA-256 and prefixed with the namespace, so the
/// key depends only on the field values and never on how options were supplied.
pub fn build(namespace: CacheNamespace, req: &RenderRequest) -> String {
    let eye_color = req
        .eye_color
        .map(|c| c.to_hex())
        .unwrap_or_else(|| NULL_SENTINEL.to_string());
    let logo_ref = req
        .logo_ref
        .as_deref()
        .map(escape)
        .unwrap_or_else(|| NULL_SENTINEL.to_string());

    let fields = [
        escape(&req.url),
        req.size.to_string(),
        req.foreground.to_hex(),
        req.background.to_hex(),
        req.format.as_str().to_string(),
        req.margin.to_string(),
        req.module_style.as_str().to_string(),
        req.eye_style.as_str().to_string(),
        eye_color,
        logo_ref,
        req.logo_size_percent.to_string(),
    ];

    let canonical = fields.join(DELIMITER);
    let digest = Sha256::digest(canonical.as_bytes());

    format!("{}{}{}", namespace.as_str(), DELIMITER, hex::encode(digest))
}

/// Keeps the delimiter unique to field boundaries and the sentinel unique to
/// absent fields.
fn escape(value: &str) -> String {
    let escaped = value.replace('%', "%25").replace(DELIMITER, "%3A");
    if escaped == NULL_SENTINEL {
        ESCAPED_SENTINEL.to_string()
    } else {
        escaped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Color, StyleDefaults};
    use crate::domain::style_resolver::{RawRenderOptions, resolve};
    use serde_json::{Map, Value, json};

    fn request(value: Value) -> RenderRequest {
        let map = value.as_object().unwrap();
        resolve(
            "https://x.test/a",
            &RawRenderOptions::from_json(map),
            &StyleDefaults::default(),
        )
    }

    #[test]
    fn test_key_is_deterministic_and_prefixed() {
        let req = request(json!({ "size": 256 }));
        let key = build(CacheNamespace::Qr, &req);

        assert_eq!(key, build(CacheNamespace::Qr, &req));
        assert!(key.starts_with("qr:"));
        assert_eq!(key.len(), "qr:".len() + 64);
        assert_eq!(CacheNamespace::of_key(&key), Some(CacheNamespace::Qr));
    }

    #[test]
    fn test_key_ignores_option_order() {
        let mut forward = Map::new();
        forward.insert("size".into(), json!(256));
        forward.insert("color".into(), json!("ff0000"));
        forward.insert("moduleStyle".into(), json!("dots"));

        let mut reverse = Map::new();
        reverse.insert("moduleStyle".into(), json!("dots"));
        reverse.insert("color".into(), json!("#FF0000"));
        reverse.insert("size".into(), json!("256"));

        let defaults = StyleDefaults::default();
        let a = resolve("u", &RawRenderOptions::from_json(&forward), &defaults);
        let b = resolve("u", &RawRenderOptions::from_json(&reverse), &defaults);

        assert_eq!(build(CacheNamespace::Qr, &a), build(CacheNamespace::Qr, &b));
    }

    #[test]
    fn test_every_field_affects_key() {
        let base = request(json!({}));
        let base_key = build(CacheNamespace::Qr, &base);

        let variants = [
            json!({ "size": 301 }),
            json!({ "color": "010101" }),
            json!({ "bg": "FEFEFE" }),
            json!({ "eyeColor": "FF0000" }),
            json!({ "format": "svg" }),
            json!({ "margin": 4 }),
            json!({ "moduleStyle": "dots" }),
            json!({ "eyeStyle": "leaf" }),
            json!({ "logo": "asset-5" }),
            json!({ "logoSize": 25 }),
        ];

        for variant in variants {
            let key = build(CacheNamespace::Qr, &request(variant.clone()));
            assert_ne!(key, base_key, "variant {variant} must change the key");
        }
    }

    #[test]
    fn test_explicit_eye_color_differs_from_inherited() {
        let inherited = request(json!({}));
        let mut explicit = inherited.clone();
        explicit.eye_color = Some(Color::BLACK);

        assert_ne!(
            build(CacheNamespace::Qr, &explicit),
            build(CacheNamespace::Qr, &inherited)
        );
    }

    #[test]
    fn test_delimiter_in_free_fields_cannot_shift_fields() {
        let mut a = request(json!({ "logo": "x" }));
        a.url = "https://x.test/a:300".to_string();
        let mut b = request(json!({ "logo": "x" }));
        b.url = "https://x.test/a".to_string();

        assert_ne!(build(CacheNamespace::Qr, &a), build(CacheNamespace::Qr, &b));
    }

    #[test]
    fn test_literal_null_logo_differs_from_absent() {
        let absent = request(json!({}));
        let literal = request(json!({ "logo": "null" }));
        assert_eq!(literal.logo_ref.as_deref(), Some("null"));

        assert_ne!(
            build(CacheNamespace::Qr, &literal),
            build(CacheNamespace::Qr, &absent)
        );

        // The escaped spelling stays distinct from the literal one.
        let mut encoded = absent.clone();
        encoded.logo_ref = Some(ESCAPED_SENTINEL.to_string());
        assert_ne!(
            build(CacheNamespace::Qr, &encoded),
            build(CacheNamespace::Qr, &literal)
        );
    }

    #[test]
    fn test_namespace_parsing() {
        assert_eq!("qr".parse::<CacheNamespace>(), Ok(CacheNamespace::Qr));
        assert_eq!("DEVICE".parse::<CacheNamespace>(), Ok(CacheNamespace::Device));
        assert!("links".parse::<CacheNamespace>().is_err());
        assert_eq!(CacheNamespace::of_key("nokey"), None);
    }
}
