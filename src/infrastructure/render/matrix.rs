//! QR symbol encoding via the `qrcode` crate.

use std::fmt;
use std::str::FromStr;

use qrcode::{EcLevel, QrCode};

use crate::domain::renderer::RenderError;

/// Side length of a finder pattern in modules.
pub const FINDER_SIZE: usize = 7;

/// Error-correction level used by the encoder.
///
/// Fixed per deployment (see `QR_ERROR_CORRECTION`), never derived from the
/// request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCorrection {
    Low,
    #[default]
    Medium,
    Quartile,
    High,
}

impl ErrorCorrection {
    fn ec_level(self) -> EcLevel {
        match self {
            Self::Low => EcLevel::L,
            Self::Medium => EcLevel::M,
            Self::Quartile => EcLevel::Q,
            Self::High => EcLevel::H,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "L",
            Self::Medium => "M",
            Self::Quartile => "Q",
            Self::High => "H",
        }
    }
}

impl FromStr for ErrorCorrection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" | "LOW" => Ok(Self::Low),
            "M" | "MEDIUM" => Ok(Self::Medium),
            "Q" | "QUARTILE" => Ok(Self::Quartile),
            "H" | "HIGH" => Ok(Self::High),
            other => Err(format!("Unknown error-correction level: {other}")),
        }
    }
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoded QR symbol: a square grid of dark/light modules, without quiet zone.
#[derive(Debug, Clone)]
pub struct QrMatrix {
    width: usize,
    dark: Vec<bool>,
}

impl QrMatrix {
    /// Encodes `data` at the given error-correction level.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Encode`] if the data does not fit any QR version.
    pub fn encode(data: &str, ec: ErrorCorrection) -> Result<Self, RenderError> {
        let code = QrCode::with_error_correction_level(data.as_bytes(), ec.ec_level())
            .map_err(|e| RenderError::Encode(e.to_string()))?;

        let dark = code
            .to_colors()
            .into_iter()
            .map(|c| c == qrcode::Color::Dark)
            .collect();

        Ok(Self {
            width: code.width(),
            dark,
        })
    }

    /// Number of modules per side.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.dark[y * self.width + x]
    }

    /// Top-left corners of the three finder patterns: top-left, top-right,
    /// bottom-left.
    pub fn finder_origins(&self) -> [(usize, usize); 3] {
        let far = self.width - FINDER_SIZE;
        [(0, 0), (far, 0), (0, far)]
    }

    /// Whether `(x, y)` lies inside one of the finder patterns.
    pub fn in_finder(&self, x: usize, y: usize) -> bool {
        self.finder_origins().iter().any(|&(ox, oy)| {
            (ox..ox + FINDER_SIZE).contains(&x) && (oy..oy + FINDER_SIZE).contains(&y)
        })
    }
}
