use crate::Severity;

/// RGBA color (values 0.0-1.0)
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let short = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);

        let (r, g, b, a) = match hex.len() {
            3 => (short(0)?, short(1)?, short(2)?, 255),
            6 => (channel(0)?, channel(2)?, channel(4)?, 255),
            8 => (channel(0)?, channel(2)?, channel(4)?, channel(6)?),
            _ => return None,
        };
        let mut color = Self::from_rgb8(r, g, b);
        color.a = a as f32 / 255.0;
        Some(color)
    }

    pub fn to_hex(self) -> String {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", to_u8(self.r), to_u8(self.g), to_u8(self.b))
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                to_u8(self.r),
                to_u8(self.g),
                to_u8(self.b),
                to_u8(self.a)
            )
        }
    }
}

/// Background colors for the severity levels
pub mod severity_colors {
    use super::Color;

    /// Unstyled toast - dark gray
    pub const NONE: Color = Color::rgb(0.2, 0.2, 0.2);

    pub const INFO: Color = Color::rgb(0.129, 0.588, 0.953);

    pub const SUCCESS: Color = Color::rgb(0.298, 0.686, 0.314);

    pub const WARNING: Color = Color::rgb(1.0, 0.596, 0.0);

    pub const ERROR: Color = Color::rgb(0.957, 0.263, 0.212);

    /// Foreground used on every palette entry
    pub const TEXT: Color = Color::rgb(1.0, 1.0, 1.0);
}

/// Get the background color for a severity level
pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => severity_colors::INFO,
        Severity::Success => severity_colors::SUCCESS,
        Severity::Warning => severity_colors::WARNING,
        Severity::Error => severity_colors::ERROR,
        Severity::None => severity_colors::NONE,
    }
}

/// Resolved look of a single toast
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ToastStyle {
    pub background: Color,
    pub text: Color,
    pub corner_radius: u32,
}

impl ToastStyle {
    /// Start from the severity palette and apply caller overrides.
    ///
    /// Overrides that do not parse are ignored and the palette value is kept.
    pub fn resolve(
        severity: Severity,
        background: Option<&str>,
        text: Option<&str>,
        corner_radius: u32,
    ) -> Self {
        Self {
            background: parse_override(background).unwrap_or_else(|| severity_color(severity)),
            text: parse_override(text).unwrap_or(severity_colors::TEXT),
            corner_radius,
        }
    }
}

fn parse_override(value: Option<&str>) -> Option<Color> {
    let value = value?;
    let color = Color::from_hex(value);
    if color.is_none() {
        tracing::warn!("Ignoring unparsable color '{}'", value);
    }
    color
}
