//! RGB color value with hex-string conversion.

use std::fmt;
use std::str::FromStr;

/// An opaque RGB color.
///
/// Parsed from hex strings with or without a leading `#`. Both the 6-digit
/// (`FF8800`) and 3-digit shorthand (`F80`) forms are accepted; the canonical
/// form is always upper-case 6-digit hex without `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Error returned when a string is not a valid hex color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid hex color: {0:?}")]
pub struct InvalidColor(pub String);

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a hex color string, returning `None` on malformed input.
    pub fn from_hex(value: &str) -> Option<Self> {
        let digits = value.trim().trim_start_matches('#');

        let expanded = match digits.len() {
            6 => digits.to_string(),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            _ => return None,
        };

        let bytes = hex::decode(expanded).ok()?;
        Some(Self::new(bytes[0], bytes[1], bytes[2]))
    }

    /// Canonical 6-digit upper-case hex, without `#`.
    pub fn to_hex(&self) -> String {
        hex::encode_upper([self.r, self.g, self.b])
    }

    /// CSS/SVG form, `#rrggbb`.
    pub fn to_css(&self) -> String {
        format!("#{}", hex::encode([self.r, self.g, self.b]))
    }

    pub fn to_rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for Color {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| InvalidColor(s.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
