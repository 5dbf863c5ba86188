//! Style policies: per-mode stroke color, width and opacity of road features.
//!
//! A policy reads one measurement from a feature, colors it with the palette
//! selected by the feature's zone tag, and blends width and opacity across
//! the near/mid/far zoom bands. The visualization modes (mean, median and
//! minimum overtaking distance, close-overtaker ratio) differ only in the
//! [`Metric`] they read and the palettes they hold.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use style_common::{Rgba, StrokeConfig, StyleConfig, StyleError, StyleResult};

use crate::colorscale::ColorScale;
use crate::presets;
use crate::registry::PaletteRegistry;
use crate::zone_blend::{ZoneBlend, ZoneWeights};

pub use style_common::Metric;

/// Road environment a feature was classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Urban,
    Rural,
}

impl Zone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Urban => "urban",
            Zone::Rural => "rural",
        }
    }

    /// Case-insensitive match of a raw zone attribute, ignoring surrounding
    /// whitespace. Tags such as "unknown" or "motorway" give `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case("urban") {
            Some(Zone::Urban)
        } else if tag.eq_ignore_ascii_case("rural") {
            Some(Zone::Rural)
        } else {
            None
        }
    }
}

impl FromStr for Zone {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Zone::from_tag(s)
            .ok_or_else(|| StyleError::ValidationError(format!("unknown zone '{}'", s.trim())))
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Palette selection by zone tag.
///
/// A plain lookup table; a zone without its own palette uses the default
/// zone's palette.
#[derive(Debug, Clone)]
pub struct ZonePalettes {
    default_zone: Zone,
    default_palette: Arc<ColorScale>,
    by_zone: HashMap<Zone, Arc<ColorScale>>,
}

impl ZonePalettes {
    pub fn new(default_zone: Zone, default_palette: Arc<ColorScale>) -> Self {
        Self {
            default_zone,
            default_palette,
            by_zone: HashMap::new(),
        }
    }

    /// One palette regardless of zone.
    pub fn uniform(palette: Arc<ColorScale>) -> Self {
        Self::new(Zone::Urban, palette)
    }

    pub fn with(mut self, zone: Zone, palette: Arc<ColorScale>) -> Self {
        if zone == self.default_zone {
            self.default_palette = palette;
        } else {
            self.by_zone.insert(zone, palette);
        }
        self
    }

    pub fn default_zone(&self) -> Zone {
        self.default_zone
    }

    pub fn for_zone(&self, zone: Zone) -> &ColorScale {
        self.by_zone
            .get(&zone)
            .unwrap_or(&self.default_palette)
            .as_ref()
    }

    /// Palette for a raw zone attribute. Missing or unknown tags fall back to
    /// the default zone.
    pub fn for_tag(&self, tag: Option<&str>) -> &ColorScale {
        let zone = tag.and_then(Zone::from_tag).unwrap_or(self.default_zone);
        self.for_zone(zone)
    }
}

/// Properties of a road feature that styling depends on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureAttributes {
    #[serde(default)]
    pub valid: bool,

    #[serde(default)]
    pub zone: Option<String>,

    #[serde(default)]
    pub distance_overtaker_mean: Option<f64>,

    #[serde(default)]
    pub distance_overtaker_median: Option<f64>,

    #[serde(default)]
    pub distance_overtaker_minimum: Option<f64>,

    /// Number of overtaking events
    #[serde(default)]
    pub distance_overtaker_n: Option<u32>,

    /// Events closer than the legal limit
    #[serde(default)]
    pub distance_overtaker_n_below_limit: Option<u32>,
}

impl FeatureAttributes {
    /// Parse from a feature's JSON properties object.
    pub fn from_json(json: &str) -> StyleResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The value a metric colors by, if defined.
    pub fn measurement(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::MeanDistance => self.distance_overtaker_mean,
            Metric::MedianDistance => self.distance_overtaker_median,
            Metric::MinimumDistance => self.distance_overtaker_minimum,
            Metric::CloseOvertakerRatio => {
                let n = self.distance_overtaker_n.filter(|&n| n > 0)?;
                let below = self.distance_overtaker_n_below_limit?;
                Some(100.0 * below as f64 / n as f64)
            }
        }
    }
}

/// Final stroke attributes of one feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Color with alpha set from `opacity`
    pub color: Rgba,
    /// Width in pixels
    pub width: f64,
    /// Opacity in `[0, 1]`
    pub opacity: f64,
}

/// One visualization mode.
#[derive(Debug, Clone)]
pub struct StylePolicy {
    metric: Metric,
    palettes: ZonePalettes,
    color_invalid: Rgba,
    blend: ZoneBlend,
    stroke: StrokeConfig,
}

impl StylePolicy {
    pub fn new(metric: Metric, palettes: ZonePalettes) -> Self {
        Self {
            metric,
            palettes,
            color_invalid: Rgba::black(),
            blend: ZoneBlend::default(),
            stroke: StrokeConfig::default(),
        }
    }

    pub fn with_color_invalid(mut self, color: Rgba) -> Self {
        self.color_invalid = color;
        self
    }

    pub fn with_blend(mut self, blend: ZoneBlend) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_stroke(mut self, stroke: StrokeConfig) -> StyleResult<Self> {
        stroke
            .validate()
            .map_err(|e| StyleError::ValidationError(format!("stroke: {}", e)))?;
        self.stroke = stroke;
        Ok(self)
    }

    /// Colors by mean overtaking distance with the urban/rural palettes.
    pub fn mean_distance() -> StyleResult<Self> {
        Self::zoned_distance(Metric::MeanDistance)
    }

    /// Colors by median overtaking distance with the urban/rural palettes.
    pub fn median_distance() -> StyleResult<Self> {
        Self::zoned_distance(Metric::MedianDistance)
    }

    /// Colors by minimum overtaking distance with the urban/rural palettes.
    pub fn minimum_distance() -> StyleResult<Self> {
        Self::zoned_distance(Metric::MinimumDistance)
    }

    /// Colors by the percentage of close overtakers.
    pub fn close_overtaker_ratio() -> StyleResult<Self> {
        let palette = Arc::new(presets::close_overtaker_ratio_palette()?);
        Ok(Self::new(
            Metric::CloseOvertakerRatio,
            ZonePalettes::uniform(palette),
        ))
    }

    fn zoned_distance(metric: Metric) -> StyleResult<Self> {
        let urban = Arc::new(presets::urban_distance_palette()?);
        let rural = Arc::new(presets::rural_distance_palette()?);
        let palettes = ZonePalettes::new(Zone::Urban, urban).with(Zone::Rural, rural);
        Ok(Self::new(metric, palettes))
    }

    /// Build a named policy from configuration, taking palettes from
    /// `registry`.
    pub fn from_config(
        config: &StyleConfig,
        name: &str,
        registry: &PaletteRegistry,
    ) -> StyleResult<Self> {
        let def = config
            .policy(name)
            .ok_or_else(|| StyleError::ValidationError(format!("policy '{}' not defined", name)))?;
        def.validate()
            .map_err(|e| StyleError::ValidationError(format!("{}: {}", name, e)))?;

        let default_zone: Zone = def.default_zone.parse()?;
        let default_palette = def
            .palettes
            .get(&def.default_zone)
            .ok_or_else(|| {
                StyleError::ValidationError(format!("{}: default zone has no palette", name))
            })
            .and_then(|palette_name| registry.get(palette_name))?;
        let mut palettes = ZonePalettes::new(default_zone, default_palette);
        for (tag, palette_name) in &def.palettes {
            let zone: Zone = tag.parse()?;
            palettes = palettes.with(zone, registry.get(palette_name)?);
        }

        let color_invalid = match &def.color_invalid {
            Some(spec) => spec.normalize()?,
            None => Rgba::black(),
        };

        Self::new(def.metric, palettes)
            .with_color_invalid(color_invalid)
            .with_blend(ZoneBlend::new(&config.zone_blend)?)
            .with_stroke(config.stroke)
    }

    /// Style used for features no policy applies to.
    pub fn default_style() -> StrokeStyle {
        StrokeStyle {
            color: Rgba::black(),
            width: 2.0,
            opacity: 1.0,
        }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn palettes(&self) -> &ZonePalettes {
        &self.palettes
    }

    pub fn color_invalid(&self) -> Rgba {
        self.color_invalid
    }

    pub fn blend(&self) -> &ZoneBlend {
        &self.blend
    }

    /// Style one feature at the given map resolution. `highlighted` marks a
    /// selected or hovered feature.
    pub fn style(
        &self,
        feature: &FeatureAttributes,
        resolution: f64,
        highlighted: bool,
    ) -> StrokeStyle {
        let weights = self.blend.weights(resolution);
        self.style_weighted(feature, resolution, weights, highlighted)
    }

    /// Style a batch of features in parallel, none highlighted.
    pub fn style_all(&self, features: &[FeatureAttributes], resolution: f64) -> Vec<StrokeStyle> {
        let weights = self.blend.weights(resolution);
        features
            .par_iter()
            .map(|f| self.style_weighted(f, resolution, weights, false))
            .collect()
    }

    fn style_weighted(
        &self,
        feature: &FeatureAttributes,
        resolution: f64,
        weights: ZoneWeights,
        highlighted: bool,
    ) -> StrokeStyle {
        let base = if feature.valid {
            self.palettes
                .for_tag(feature.zone.as_deref())
                .lookup(feature.measurement(self.metric))
        } else {
            self.color_invalid
        };

        let opacity = weights
            .blend(
                self.stroke.near_opacity,
                self.stroke.mid_opacity,
                self.stroke.far_opacity,
            )
            .clamp(0.0, 1.0);

        let near_width = if highlighted {
            self.stroke.near_width_highlighted
        } else {
            self.stroke.near_width
        };
        let far_width = if weights.far > 0.0 {
            self.far_width(resolution)
        } else {
            0.0
        };
        let width = weights.blend(near_width, self.stroke.mid_width, far_width);

        StrokeStyle {
            color: base.with_opacity(opacity),
            width,
            opacity,
        }
    }

    /// Width in the far band: shrinks with resolution, kept within the
    /// configured pixel bounds.
    pub fn far_width(&self, resolution: f64) -> f64 {
        let w = self.stroke.far_reference / resolution;
        if w.is_nan() {
            return self.stroke.far_min_width;
        }
        w.clamp(self.stroke.far_min_width, self.stroke.far_max_width)
    }
}
