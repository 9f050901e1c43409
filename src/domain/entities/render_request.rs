//! Fully resolved render parameters and the style vocabulary.

use super::color::Color;

/// Smallest accepted output size in pixels.
pub const MIN_SIZE: u32 = 50;
/// Largest accepted output size in pixels.
pub const MAX_SIZE: u32 = 2000;
/// Largest quiet-zone width in modules.
pub const MAX_MARGIN: u32 = 10;
/// Logo box size bounds, as a percentage of the QR width.
pub const MIN_LOGO_SIZE_PERCENT: u32 = 10;
pub const MAX_LOGO_SIZE_PERCENT: u32 = 30;

/// Output encoding of a rendered QR code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }

    /// MIME type used for HTTP responses and data URLs.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
        }
    }
}

/// Shape drawn for each dark body module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleStyle {
    Square,
    Dots,
    Rounded,
}

impl ModuleStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "square" => Some(Self::Square),
            "dots" => Some(Self::Dots),
            "rounded" => Some(Self::Rounded),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Dots => "dots",
            Self::Rounded => "rounded",
        }
    }
}

/// Shape drawn for the three finder patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EyeStyle {
    Square,
    Rounded,
    Leaf,
}

impl EyeStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "square" => Some(Self::Square),
            "rounded" => Some(Self::Rounded),
            "leaf" => Some(Self::Leaf),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Rounded => "rounded",
            Self::Leaf => "leaf",
        }
    }
}

/// A validated, clamped set of render parameters.
///
/// Produced by [`crate::domain::style_resolver::resolve`]; every field is
/// within its documented range. For [`OutputFormat::Svg`] `logo_ref` is
/// always `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderRequest {
    pub url: String,
    pub size: u32,
    pub foreground: Color,
    pub background: Color,
    /// `None` means the eyes are drawn in `foreground`.
    pub eye_color: Option<Color>,
    pub format: OutputFormat,
    pub margin: u32,
    pub module_style: ModuleStyle,
    pub eye_style: EyeStyle,
    pub logo_ref: Option<String>,
    pub logo_size_percent: u32,
}

impl RenderRequest {
    /// Color used for the finder patterns.
    pub fn effective_eye_color(&self) -> Color {
        self.eye_color.unwrap_or(self.foreground)
    }

    /// Logo reference, if compositing applies to this request.
    pub fn logo_for_raster(&self) -> Option<&str> {
        match self.format {
            OutputFormat::Png => self.logo_ref.as_deref(),
            OutputFormat::Svg => None,
        }
    }
}

/// Global style defaults applied to options the caller omitted or got wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDefaults {
    pub size: u32,
    pub margin: u32,
    pub foreground: Color,
    pub background: Color,
    pub eye_color: Option<Color>,
    pub format: OutputFormat,
    pub module_style: ModuleStyle,
    pub eye_style: EyeStyle,
    pub logo_size_percent: u32,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            size: 300,
            margin: 1,
            foreground: Color::BLACK,
            background: Color::WHITE,
            eye_color: None,
            format: OutputFormat::Png,
            module_style: ModuleStyle::Square,
            eye_style: EyeStyle::Square,
            logo_size_percent: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_tokens_are_case_insensitive() {
        assert_eq!(OutputFormat::parse("SVG"), Some(OutputFormat::Svg));
        assert_eq!(ModuleStyle::parse(" Dots "), Some(ModuleStyle::Dots));
        assert_eq!(EyeStyle::parse("LEAF"), Some(EyeStyle::Leaf));
        assert_eq!(EyeStyle::parse("dots"), None);
        assert_eq!(ModuleStyle::parse("leaf"), None);
    }

    #[test]
    fn test_eye_color_inherits_foreground() {
        let defaults = StyleDefaults::default();
        let mut req = RenderRequest {
            url: "https://x.test".to_string(),
            size: defaults.size,
            foreground: Color::new(10, 20, 30),
            background: defaults.background,
            eye_color: None,
            format: OutputFormat::Png,
            margin: defaults.margin,
            module_style: defaults.module_style,
            eye_style: defaults.eye_style,
            logo_ref: Some("logo".to_string()),
            logo_size_percent: defaults.logo_size_percent,
        };

        assert_eq!(req.effective_eye_color(), Color::new(10, 20, 30));
        assert_eq!(req.logo_for_raster(), Some("logo"));

        req.eye_color = Some(Color::new(255, 0, 0));
        req.format = OutputFormat::Svg;
        assert_eq!(req.effective_eye_color(), Color::new(255, 0, 0));
        assert_eq!(req.logo_for_raster(), None);
    }
}
