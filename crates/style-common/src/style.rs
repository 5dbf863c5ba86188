//! Style configuration for road feature rendering.
//!
//! This module defines the JSON schema for palettes, zoom-band blending and
//! the per-mode style policies that combine them. Documents are parsed from
//! in-memory strings; where they come from is up to the caller.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::color::ColorSpec;
use crate::error::{StyleError, StyleResult};

/// Root style configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Version of the style schema
    #[serde(default = "default_version")]
    pub version: String,

    /// Named palette definitions
    #[serde(default)]
    pub palettes: HashMap<String, PaletteDefinition>,

    /// Resolution breakpoints of the near/mid/far bands
    #[serde(default)]
    pub zone_blend: ZoneBlendConfig,

    /// Stroke width and opacity per band
    #[serde(default)]
    pub stroke: StrokeConfig,

    /// Named style policies (one per visualization mode)
    #[serde(default)]
    pub policies: HashMap<String, PolicyDefinition>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl StyleConfig {
    /// Parse style configuration from JSON string.
    pub fn from_json(json: &str) -> StyleResult<Self> {
        serde_json::from_str(json).map_err(|e| StyleError::ParseError(e.to_string()))
    }

    /// Serialize back to pretty-printed JSON.
    pub fn to_json(&self) -> StyleResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Get a palette by name.
    pub fn palette(&self, name: &str) -> Option<&PaletteDefinition> {
        self.palettes.get(name)
    }

    /// Get a policy by name.
    pub fn policy(&self, name: &str) -> Option<&PolicyDefinition> {
        self.policies.get(name)
    }

    /// Validate the whole document.
    ///
    /// Policies must only reference palettes defined in the same document.
    pub fn validate(&self) -> StyleResult<()> {
        for (name, palette) in &self.palettes {
            palette
                .validate()
                .map_err(|e| StyleError::ValidationError(format!("{}: {}", name, e)))?;
        }

        self.zone_blend
            .validate()
            .map_err(|e| StyleError::ValidationError(format!("zone_blend: {}", e)))?;
        self.stroke
            .validate()
            .map_err(|e| StyleError::ValidationError(format!("stroke: {}", e)))?;

        for (name, policy) in &self.policies {
            policy
                .validate()
                .map_err(|e| StyleError::ValidationError(format!("{}: {}", name, e)))?;
            for palette in policy.palettes.values() {
                if !self.palettes.contains_key(palette) {
                    return Err(StyleError::ValidationError(format!(
                        "{}: unknown palette '{}'",
                        name, palette
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Default for StyleConfig {
    /// The built-in urban/rural distance palettes, the overtaker-ratio
    /// palette and one policy per metric.
    fn default() -> Self {
        let mut palettes = HashMap::new();
        palettes.insert("distance_urban".to_string(), PaletteDefinition::urban_distance());
        palettes.insert("distance_rural".to_string(), PaletteDefinition::rural_distance());
        palettes.insert(
            "close_overtaker_ratio".to_string(),
            PaletteDefinition::close_overtaker_ratio(),
        );

        let mut policies = HashMap::new();
        for metric in [
            Metric::MeanDistance,
            Metric::MedianDistance,
            Metric::MinimumDistance,
        ] {
            policies.insert(metric.name().to_string(), PolicyDefinition::zoned_distance(metric));
        }
        policies.insert(
            Metric::CloseOvertakerRatio.name().to_string(),
            PolicyDefinition::uniform(Metric::CloseOvertakerRatio, "close_overtaker_ratio"),
        );

        Self {
            version: default_version(),
            palettes,
            zone_blend: ZoneBlendConfig::default(),
            stroke: StrokeConfig::default(),
            policies,
        }
    }
}

/// A piecewise-linear palette: control points plus sentinel colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteDefinition {
    /// Control points, in any order
    pub stops: Vec<ControlPoint>,

    /// Color for undefined / NaN values
    #[serde(default)]
    pub color_invalid: Option<ColorSpec>,

    /// Color below the domain; defaults to the first stop's color
    #[serde(default)]
    pub color_low: Option<ColorSpec>,

    /// Color above the domain; defaults to the last stop's color
    #[serde(default)]
    pub color_high: Option<ColorSpec>,

    /// Number of lookup table entries
    #[serde(default = "default_lut_size")]
    pub lut_size: usize,
}

/// Largest accepted lookup table.
pub const MAX_LUT_SIZE: usize = 65_536;

fn default_lut_size() -> usize {
    256
}

impl PaletteDefinition {
    pub fn new(stops: Vec<ControlPoint>) -> Self {
        Self {
            stops,
            color_invalid: None,
            color_low: None,
            color_high: None,
            lut_size: default_lut_size(),
        }
    }

    pub fn with_invalid(mut self, color: impl Into<ColorSpec>) -> Self {
        self.color_invalid = Some(color.into());
        self
    }

    /// Structural checks that do not need a resample.
    pub fn validate(&self) -> Result<(), String> {
        if self.stops.len() < 2 {
            return Err("Palette must have at least 2 control points".to_string());
        }
        if !(2..=MAX_LUT_SIZE).contains(&self.lut_size) {
            return Err(format!(
                "lut_size must be between 2 and {}, got {}",
                MAX_LUT_SIZE, self.lut_size
            ));
        }

        let mut positions = Vec::with_capacity(self.stops.len());
        for stop in &self.stops {
            if !stop.position.is_finite() {
                return Err(format!("position {} is not finite", stop.position));
            }
            stop.color.normalize().map_err(|e| e.to_string())?;
            positions.push(stop.position);
        }
        positions.sort_by(f64::total_cmp);
        if let Some(w) = positions.windows(2).find(|w| w[0] == w[1]) {
            return Err(format!("duplicate position {}", w[0]));
        }

        for color in [&self.color_invalid, &self.color_low, &self.color_high]
            .into_iter()
            .flatten()
        {
            color.normalize().map_err(|e| e.to_string())?;
        }

        Ok(())
    }

    /// Overtaking distance palette for urban roads (metres).
    pub fn urban_distance() -> Self {
        Self::new(vec![
            ControlPoint::new(0.0, [64, 0, 0]),
            ControlPoint::new(1.4999, [196, 0, 0]),
            ControlPoint::new(1.5, [196, 196, 0]),
            ControlPoint::new(2.0, [0, 196, 0]),
            ControlPoint::new(2.55, [0, 255, 0]),
        ])
        .with_invalid([128, 128, 128])
    }

    /// Overtaking distance palette for rural roads (metres).
    pub fn rural_distance() -> Self {
        Self::new(vec![
            ControlPoint::new(0.0, [64, 0, 0]),
            ControlPoint::new(1.9999, [196, 0, 0]),
            ControlPoint::new(2.0, [196, 196, 0]),
            ControlPoint::new(2.5, [0, 196, 0]),
            ControlPoint::new(2.55, [0, 255, 0]),
        ])
        .with_invalid([128, 128, 128])
    }

    /// Percentage of overtakers below the legal distance.
    pub fn close_overtaker_ratio() -> Self {
        Self::new(vec![
            ControlPoint::new(0.0, [0, 255, 0]),
            ControlPoint::new(50.0, [255, 255, 0]),
            ControlPoint::new(100.0, [255, 0, 0]),
        ])
        .with_invalid([128, 128, 128, 255])
    }
}

/// One knot of a palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    /// Data value at this knot
    #[serde(alias = "value")]
    pub position: f64,

    /// Color at this knot
    pub color: ColorSpec,

    /// Optional label for legend
    #[serde(default)]
    pub label: Option<String>,
}

impl ControlPoint {
    pub fn new(position: f64, color: impl Into<ColorSpec>) -> Self {
        Self {
            position,
            color: color.into(),
            label: None,
        }
    }
}

/// Resolution breakpoints (map units per pixel) of the zoom bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneBlendConfig {
    /// At or below this resolution the near band has full weight
    #[serde(default = "default_near_full")]
    pub near_full: f64,

    /// At or above this resolution the near band has no weight
    #[serde(default = "default_near_end")]
    pub near_end: f64,

    /// Far band starts fading in here
    #[serde(default = "default_far_start")]
    pub far_start: f64,

    /// At or above this resolution the far band has full weight
    #[serde(default = "default_far_full")]
    pub far_full: f64,
}

fn default_near_full() -> f64 {
    1.0
}
fn default_near_end() -> f64 {
    2.0
}
fn default_far_start() -> f64 {
    20.0
}
fn default_far_full() -> f64 {
    30.0
}

impl Default for ZoneBlendConfig {
    fn default() -> Self {
        Self {
            near_full: default_near_full(),
            near_end: default_near_end(),
            far_start: default_far_start(),
            far_full: default_far_full(),
        }
    }
}

impl ZoneBlendConfig {
    pub fn validate(&self) -> Result<(), String> {
        let all = [self.near_full, self.near_end, self.far_start, self.far_full];
        if all.iter().any(|v| !v.is_finite()) {
            return Err("breakpoints must be finite".to_string());
        }
        if !(self.near_full < self.near_end
            && self.near_end <= self.far_start
            && self.far_start < self.far_full)
        {
            return Err(format!(
                "breakpoints must satisfy near_full < near_end <= far_start < far_full, got {:?}",
                all
            ));
        }
        Ok(())
    }
}

/// Stroke width (pixels) and opacity for each zoom band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeConfig {
    #[serde(default = "default_near_width")]
    pub near_width: f64,

    /// Near width of a selected or hovered feature
    #[serde(default = "default_near_width_highlighted")]
    pub near_width_highlighted: f64,

    #[serde(default = "default_mid_width")]
    pub mid_width: f64,

    /// Far width is `far_reference / resolution`, clamped to
    /// `[far_min_width, far_max_width]`
    #[serde(default = "default_far_reference")]
    pub far_reference: f64,

    #[serde(default = "default_far_min_width")]
    pub far_min_width: f64,

    #[serde(default = "default_far_max_width")]
    pub far_max_width: f64,

    #[serde(default = "default_near_opacity")]
    pub near_opacity: f64,

    #[serde(default = "default_band_opacity")]
    pub mid_opacity: f64,

    #[serde(default = "default_band_opacity")]
    pub far_opacity: f64,
}

fn default_near_width() -> f64 {
    2.0
}
fn default_near_width_highlighted() -> f64 {
    4.0
}
fn default_mid_width() -> f64 {
    4.0
}
fn default_far_reference() -> f64 {
    200.0
}
fn default_far_min_width() -> f64 {
    1.0
}
fn default_far_max_width() -> f64 {
    10.0
}
fn default_near_opacity() -> f64 {
    1.0
}
fn default_band_opacity() -> f64 {
    0.5
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            near_width: default_near_width(),
            near_width_highlighted: default_near_width_highlighted(),
            mid_width: default_mid_width(),
            far_reference: default_far_reference(),
            far_min_width: default_far_min_width(),
            far_max_width: default_far_max_width(),
            near_opacity: default_near_opacity(),
            mid_opacity: default_band_opacity(),
            far_opacity: default_band_opacity(),
        }
    }
}

impl StrokeConfig {
    pub fn validate(&self) -> Result<(), String> {
        let widths = [
            self.near_width,
            self.near_width_highlighted,
            self.mid_width,
            self.far_reference,
            self.far_min_width,
            self.far_max_width,
        ];
        if widths.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err("widths must be finite and non-negative".to_string());
        }
        if self.far_min_width > self.far_max_width {
            return Err(format!(
                "far_min_width {} exceeds far_max_width {}",
                self.far_min_width, self.far_max_width
            ));
        }
        for opacity in [self.near_opacity, self.mid_opacity, self.far_opacity] {
            if !(0.0..=1.0).contains(&opacity) {
                return Err(format!("opacity {} outside [0, 1]", opacity));
            }
        }
        Ok(())
    }
}

/// Which feature measurement a policy colors by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    MeanDistance,
    MedianDistance,
    MinimumDistance,
    /// Percentage of overtakers closer than the legal limit
    CloseOvertakerRatio,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Metric::MeanDistance => "mean_distance",
            Metric::MedianDistance => "median_distance",
            Metric::MinimumDistance => "minimum_distance",
            Metric::CloseOvertakerRatio => "close_overtaker_ratio",
        }
    }
}

/// A visualization mode: one metric, palettes selected by zone tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDefinition {
    pub metric: Metric,

    /// Zone tag (e.g. "urban") to palette name
    pub palettes: HashMap<String, String>,

    /// Zone used when a feature's tag is missing or unknown
    #[serde(default = "default_zone")]
    pub default_zone: String,

    /// Color of features flagged as not valid
    #[serde(default)]
    pub color_invalid: Option<ColorSpec>,
}

fn default_zone() -> String {
    "urban".to_string()
}

impl PolicyDefinition {
    /// Urban and rural distance palettes.
    pub fn zoned_distance(metric: Metric) -> Self {
        let mut palettes = HashMap::new();
        palettes.insert("urban".to_string(), "distance_urban".to_string());
        palettes.insert("rural".to_string(), "distance_rural".to_string());
        Self {
            metric,
            palettes,
            default_zone: default_zone(),
            color_invalid: None,
        }
    }

    /// The same palette for every zone.
    pub fn uniform(metric: Metric, palette: &str) -> Self {
        let mut palettes = HashMap::new();
        palettes.insert(default_zone(), palette.to_string());
        Self {
            metric,
            palettes,
            default_zone: default_zone(),
            color_invalid: None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.palettes.contains_key(&self.default_zone) {
            return Err(format!(
                "default zone '{}' has no palette",
                self.default_zone
            ));
        }
        if let Some(color) = &self.color_invalid {
            color.normalize().map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = StyleConfig::default();
        config.validate().unwrap();
        assert_eq!(config.palettes.len(), 3);
        assert_eq!(config.policies.len(), 4);
    }

    #[test]
    fn test_parse_minimal_palette() {
        let json = r##"{"palettes":{"ratio":{"stops":[{"value":0,"color":[0,255,0]},{"value":100,"color":"#FF0000"}]}}}"##;

        let config = StyleConfig::from_json(json).unwrap();
        config.validate().unwrap();

        let palette = config.palette("ratio").unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(palette.lut_size, 256);
        assert_eq!(palette.stops[1].position, 100.0);
        assert_eq!(config.zone_blend, ZoneBlendConfig::default());
    }

    #[test]
    fn test_validate_rejects_oversized_lut() {
        let json = r#"{"palettes":{"p":{"stops":[{"value":0,"color":[0]},{"value":1,"color":[255]}],"lut_size":18446744073709551615}}}"#;
        let config = StyleConfig::from_json(json).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, StyleError::ValidationError(ref m) if m.contains("lut_size")));

        let mut palette = config.palette("p").unwrap().clone();
        palette.lut_size = MAX_LUT_SIZE;
        palette.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_duplicate_positions() {
        let palette = PaletteDefinition::new(vec![
            ControlPoint::new(1.0, [0]),
            ControlPoint::new(1.0, [255]),
        ]);
        assert!(palette.validate().unwrap_err().contains("duplicate"));
    }

    #[test]
    fn test_validate_rejects_unknown_palette_reference() {
        let mut config = StyleConfig::default();
        config.palettes.remove("distance_rural");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, StyleError::ValidationError(ref m) if m.contains("distance_rural")));
    }

    #[test]
    fn test_zone_blend_ordering() {
        let bad = ZoneBlendConfig {
            near_full: 2.0,
            near_end: 1.0,
            ..ZoneBlendConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
