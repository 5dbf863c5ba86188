//! RGBA colors, color-spec normalization and string formats.
//!
//! Palette definitions may give colors as gray (`[g]`), RGB (`[r, g, b]`),
//! RGBA (`[r, g, b, a]`) or as a CSS/hex string. Everything is normalized to
//! [`Rgba`] on ingestion so nothing downstream deals with 3-channel colors.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{StyleError, StyleResult};

/// A 4-channel color with byte channels.
///
/// `Rgba` is `Copy`: a color returned from a palette lookup is the caller's
/// own value and may be modified freely (e.g. overwriting the alpha).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    pub const fn black() -> Self {
        Self::opaque(0, 0, 0)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Same color with the alpha byte replaced.
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Same color with the alpha set from an opacity in `[0, 1]`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        self.with_alpha(unit_to_byte(opacity))
    }

    /// Alpha as an opacity in `[0, 1]`.
    pub fn opacity(self) -> f64 {
        self.a as f64 / 255.0
    }

    /// `#rrggbb`, alpha dropped.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `#rrggbbaa`.
    pub fn to_hex_rgba(self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }

    /// `rgb(r,g,b)`.
    pub fn to_css_rgb(self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }

    /// `rgba(r,g,b,alpha)` with the alpha written as a fraction of 1.
    pub fn to_css_rgba(self) -> String {
        format!(
            "rgba({},{},{},{})",
            self.r,
            self.g,
            self.b,
            format_alpha(self.a)
        )
    }

    /// Parse any of the formats produced above, plus a few named colors.
    pub fn from_css(s: &str) -> StyleResult<Self> {
        let trimmed = s.trim();
        let invalid = || StyleError::InvalidColorString(s.to_string());

        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }

        let lower = trimmed.to_ascii_lowercase();
        if let Some(body) = lower
            .strip_prefix("rgba(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parts: Vec<&str> = body.split(',').map(str::trim).collect();
            if parts.len() != 4 {
                return Err(invalid());
            }
            let (r, g, b) = parse_rgb_parts(&parts[..3]).ok_or_else(invalid)?;
            let alpha: f64 = parts[3].parse().map_err(|_| invalid())?;
            if !(0.0..=1.0).contains(&alpha) {
                return Err(invalid());
            }
            return Ok(Rgba::new(r, g, b, unit_to_byte(alpha)));
        }

        if let Some(body) = lower
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parts: Vec<&str> = body.split(',').map(str::trim).collect();
            if parts.len() != 3 {
                return Err(invalid());
            }
            let (r, g, b) = parse_rgb_parts(&parts).ok_or_else(invalid)?;
            return Ok(Rgba::opaque(r, g, b));
        }

        named_color(&lower).ok_or_else(invalid)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::black()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css_rgba())
    }
}

impl From<[u8; 4]> for Rgba {
    fn from(c: [u8; 4]) -> Self {
        Rgba::new(c[0], c[1], c[2], c[3])
    }
}

impl From<Rgba> for [u8; 4] {
    fn from(c: Rgba) -> Self {
        c.to_array()
    }
}

/// Normalize a raw channel list into an RGBA color.
///
/// - `[g]` becomes `(g, g, g, 255)`
/// - `[r, g, b]` becomes `(r, g, b, 255)`
/// - `[r, g, b, a]` is returned unchanged
///
/// Any other length is rejected with [`StyleError::InvalidColorSpec`].
pub fn normalize_channels(channels: &[u8]) -> StyleResult<Rgba> {
    match *channels {
        [g] => Ok(Rgba::opaque(g, g, g)),
        [r, g, b] => Ok(Rgba::opaque(r, g, b)),
        [r, g, b, a] => Ok(Rgba::new(r, g, b, a)),
        _ => Err(StyleError::InvalidColorSpec(channels.len())),
    }
}

/// Color as written in a palette definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Gray, RGB or RGBA byte channels: `[g]`, `[r, g, b]`, `[r, g, b, a]`
    Channels(Vec<u8>),

    /// Hex or CSS string: `"#rrggbb"`, `"rgba(r,g,b,a)"`, ...
    Css(String),
}

impl ColorSpec {
    pub fn gray(g: u8) -> Self {
        ColorSpec::Channels(vec![g])
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        ColorSpec::Channels(vec![r, g, b])
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        ColorSpec::Channels(vec![r, g, b, a])
    }

    /// Convert to the uniform 4-channel representation.
    pub fn normalize(&self) -> StyleResult<Rgba> {
        match self {
            ColorSpec::Channels(channels) => normalize_channels(channels),
            ColorSpec::Css(s) => Rgba::from_css(s),
        }
    }
}

impl From<Rgba> for ColorSpec {
    fn from(c: Rgba) -> Self {
        ColorSpec::Channels(c.to_array().to_vec())
    }
}

impl From<&[u8]> for ColorSpec {
    fn from(channels: &[u8]) -> Self {
        ColorSpec::Channels(channels.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for ColorSpec {
    fn from(channels: [u8; N]) -> Self {
        ColorSpec::Channels(channels.to_vec())
    }
}

impl From<&str> for ColorSpec {
    fn from(s: &str) -> Self {
        ColorSpec::Css(s.to_string())
    }
}

fn unit_to_byte(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Three decimals are enough to recover every alpha byte exactly.
fn format_alpha(a: u8) -> String {
    let s = format!("{:.3}", a as f64 / 255.0);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.is_ascii() {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        6 => Some(Rgba::opaque(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn parse_rgb_parts(parts: &[&str]) -> Option<(u8, u8, u8)> {
    let r = parts.first()?.parse().ok()?;
    let g = parts.get(1)?.parse().ok()?;
    let b = parts.get(2)?.parse().ok()?;
    Some((r, g, b))
}

fn named_color(name: &str) -> Option<Rgba> {
    let c = match name {
        "transparent" => Rgba::transparent(),
        "black" => Rgba::black(),
        "white" => Rgba::opaque(255, 255, 255),
        "gray" | "grey" => Rgba::opaque(128, 128, 128),
        "red" => Rgba::opaque(255, 0, 0),
        "green" => Rgba::opaque(0, 255, 0),
        "blue" => Rgba::opaque(0, 0, 255),
        "yellow" => Rgba::opaque(255, 255, 0),
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_arity() {
        assert_eq!(normalize_channels(&[7]).unwrap(), Rgba::new(7, 7, 7, 255));
        assert_eq!(
            normalize_channels(&[1, 2, 3]).unwrap(),
            Rgba::new(1, 2, 3, 255)
        );
        assert_eq!(
            normalize_channels(&[1, 2, 3, 4]).unwrap(),
            Rgba::new(1, 2, 3, 4)
        );
    }

    #[test]
    fn test_normalize_rejects_bad_arity() {
        assert_eq!(normalize_channels(&[]), Err(StyleError::InvalidColorSpec(0)));
        assert_eq!(
            normalize_channels(&[1, 2]),
            Err(StyleError::InvalidColorSpec(2))
        );
        assert_eq!(
            normalize_channels(&[1, 2, 3, 4, 5]),
            Err(StyleError::InvalidColorSpec(5))
        );
    }

    #[test]
    fn test_hex_zero_padding() {
        assert_eq!(Rgba::opaque(0, 5, 255).to_hex(), "#0005ff");
        assert_eq!(Rgba::new(1, 2, 3, 4).to_hex_rgba(), "#01020304");
    }

    #[test]
    fn test_alpha_formatting() {
        assert_eq!(format_alpha(255), "1");
        assert_eq!(format_alpha(0), "0");
        assert_eq!(format_alpha(128), "0.502");
    }

    #[test]
    fn test_color_spec_from_json() {
        let spec: ColorSpec = serde_json::from_str("[128, 128, 128]").unwrap();
        assert_eq!(spec.normalize().unwrap(), Rgba::opaque(128, 128, 128));

        let spec: ColorSpec = serde_json::from_str(r##""#FF5500""##).unwrap();
        assert_eq!(spec.normalize().unwrap(), Rgba::opaque(255, 85, 0));
    }
}
