//! Piecewise-linear color scales backed by a precomputed lookup table.
//!
//! A [`ColorScale`] is built once from a list of control points: the points
//! are sorted, their colors normalized, and the palette is resampled into a
//! table of `n` colors spread evenly over the domain. Queries then cost a
//! single multiply and an index, which is cheap enough to run for every
//! feature on every frame.
//!
//! The table trades precision for speed: a query returns the nearest table
//! entry instead of re-interpolating, so `n` bounds the banding error.

use style_common::{
    ColorSpec, ControlPoint, PaletteDefinition, Rgba, StyleError, StyleResult, MAX_LUT_SIZE,
};

/// Default number of lookup table entries.
pub const DEFAULT_LUT_SIZE: usize = 256;

/// An immutable value-to-color mapping.
///
/// Changing the palette means building a new instance (see
/// [`ColorScale::resampled`]); nothing here mutates after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    /// Sorted control point positions
    positions: Vec<f64>,
    /// Normalized colors, parallel to `positions`
    colors: Vec<Rgba>,
    lut: Vec<Rgba>,
    domain_min: f64,
    domain_max: f64,
    color_invalid: Rgba,
    color_low: Rgba,
    color_high: Rgba,
    /// Caller-supplied sentinels, carried over on re-resampling
    low_override: Option<Rgba>,
    high_override: Option<Rgba>,
}

impl ColorScale {
    /// Build a scale with the default table size and boundary colors taken
    /// from the first and last control point.
    pub fn new(points: &[ControlPoint], color_invalid: impl Into<ColorSpec>) -> StyleResult<Self> {
        Self::with_bounds(points, DEFAULT_LUT_SIZE, color_invalid, None, None)
    }

    /// Build a scale with an explicit table size and optional below/above
    /// domain colors.
    pub fn with_bounds(
        points: &[ControlPoint],
        n: usize,
        color_invalid: impl Into<ColorSpec>,
        color_low: Option<ColorSpec>,
        color_high: Option<ColorSpec>,
    ) -> StyleResult<Self> {
        let color_invalid = color_invalid.into().normalize()?;
        let low_override = color_low.map(|c| c.normalize()).transpose()?;
        let high_override = color_high.map(|c| c.normalize()).transpose()?;
        Self::resample(points, n, color_invalid, low_override, high_override)
    }

    /// Build a scale from a configuration entry.
    ///
    /// Without an explicit invalid color, undefined values draw opaque black.
    pub fn from_definition(def: &PaletteDefinition) -> StyleResult<Self> {
        let color_invalid = def
            .color_invalid
            .clone()
            .unwrap_or_else(|| Rgba::black().into());
        Self::with_bounds(
            &def.stops,
            def.lut_size,
            color_invalid,
            def.color_low.clone(),
            def.color_high.clone(),
        )
    }

    /// A new scale for a changed palette definition, keeping this scale's
    /// invalid color and any explicitly supplied boundary colors.
    pub fn resampled(&self, points: &[ControlPoint], n: usize) -> StyleResult<Self> {
        Self::resample(
            points,
            n,
            self.color_invalid,
            self.low_override,
            self.high_override,
        )
    }

    fn resample(
        points: &[ControlPoint],
        n: usize,
        color_invalid: Rgba,
        low_override: Option<Rgba>,
        high_override: Option<Rgba>,
    ) -> StyleResult<Self> {
        if points.len() < 2 {
            return Err(StyleError::InvalidPalette(format!(
                "need at least 2 control points, got {}",
                points.len()
            )));
        }
        if !(2..=MAX_LUT_SIZE).contains(&n) {
            return Err(StyleError::InvalidLutSize(n));
        }
        if let Some(p) = points.iter().find(|p| !p.position.is_finite()) {
            return Err(StyleError::NonFinitePosition(p.position));
        }

        // Stable sort: ties keep input order, and are rejected right after.
        let mut sorted: Vec<&ControlPoint> = points.iter().collect();
        sorted.sort_by(|a, b| a.position.total_cmp(&b.position));

        if let Some(w) = sorted.windows(2).find(|w| w[0].position == w[1].position) {
            return Err(StyleError::DuplicatePosition(w[0].position));
        }

        let positions: Vec<f64> = sorted.iter().map(|p| p.position).collect();
        let colors = sorted
            .iter()
            .map(|p| p.color.normalize())
            .collect::<StyleResult<Vec<Rgba>>>()?;

        let domain_min = positions[0];
        let domain_max = positions[positions.len() - 1];

        let color_low = low_override.unwrap_or(colors[0]);
        let color_high = high_override.unwrap_or(colors[colors.len() - 1]);

        let span = domain_max - domain_min;
        let last = (n - 1) as f64;
        let lut: Vec<Rgba> = (0..n)
            .map(|i| {
                let xi = domain_min + (i as f64 / last) * span;
                sample_at(&positions, &colors, xi)
            })
            .collect();

        tracing::debug!(
            points = positions.len(),
            lut_size = n,
            domain_min,
            domain_max,
            "Resampled color scale"
        );

        Ok(Self {
            positions,
            colors,
            lut,
            domain_min,
            domain_max,
            color_invalid,
            color_low,
            color_high,
            low_override,
            high_override,
        })
    }

    /// Color for a measurement value.
    ///
    /// Accepts a plain `f64` or an `Option<f64>`; `None` and NaN map to the
    /// invalid color, values outside the domain to the low/high colors.
    #[inline]
    pub fn lookup(&self, value: impl Into<Option<f64>>) -> Rgba {
        let v = match value.into() {
            Some(v) if !v.is_nan() => v,
            _ => return self.color_invalid,
        };
        if v < self.domain_min {
            return self.color_low;
        }
        if v > self.domain_max {
            return self.color_high;
        }
        self.lut[self.bucket(v)]
    }

    /// Table index a value maps to, or `None` for invalid and out-of-domain
    /// values.
    pub fn lookup_index(&self, value: impl Into<Option<f64>>) -> Option<usize> {
        match value.into() {
            Some(v) if v >= self.domain_min && v <= self.domain_max => Some(self.bucket(v)),
            _ => None,
        }
    }

    /// Colors for a batch of values, in order.
    pub fn lookup_all(&self, values: &[f64]) -> Vec<Rgba> {
        values.iter().map(|&v| self.lookup(v)).collect()
    }

    #[inline]
    fn bucket(&self, v: f64) -> usize {
        let last = self.lut.len() - 1;
        let t = (v - self.domain_min) / (self.domain_max - self.domain_min) * last as f64;
        (t.round().max(0.0) as usize).min(last)
    }

    /// The full lookup table, e.g. for painting a gradient bar.
    pub fn lut(&self) -> &[Rgba] {
        &self.lut
    }

    /// Number of table entries.
    pub fn len(&self) -> usize {
        self.lut.len()
    }

    /// Always false: a scale has at least two entries.
    pub fn is_empty(&self) -> bool {
        self.lut.is_empty()
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    pub fn domain_min(&self) -> f64 {
        self.domain_min
    }

    pub fn domain_max(&self) -> f64 {
        self.domain_max
    }

    pub fn color_invalid(&self) -> Rgba {
        self.color_invalid
    }

    pub fn color_low(&self) -> Rgba {
        self.color_low
    }

    pub fn color_high(&self) -> Rgba {
        self.color_high
    }

    /// Sorted control points with normalized colors.
    pub fn control_points(&self) -> impl Iterator<Item = (f64, Rgba)> + '_ {
        self.positions.iter().copied().zip(self.colors.iter().copied())
    }
}

/// Interpolate the palette color at `xi`.
///
/// `positions` must be strictly increasing and `xi` must lie within
/// `[positions[0], positions[k - 1]]`. The bracketing pair is found by
/// bisection, then each channel is blended linearly and rounded.
pub fn sample_at(positions: &[f64], colors: &[Rgba], xi: f64) -> Rgba {
    debug_assert_eq!(positions.len(), colors.len());
    match colors.len() {
        0 => return Rgba::transparent(),
        1 => return colors[0],
        _ => {}
    }

    let mut ia = 0;
    let mut ib = positions.len() - 1;
    while ib - ia > 1 {
        let ic = (ia + ib + 1) / 2;
        if xi < positions[ic] {
            ib = ic;
        } else {
            ia = ic;
        }
    }

    let alpha = (xi - positions[ia]) / (positions[ib] - positions[ia]);
    lerp_rgba(colors[ia], colors[ib], alpha)
}

fn lerp_rgba(a: Rgba, b: Rgba, alpha: f64) -> Rgba {
    let lerp = |x: u8, y: u8| -> u8 {
        (x as f64 * (1.0 - alpha) + y as f64 * alpha)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Rgba::new(lerp(a.r, b.r), lerp(a.g, b.g), lerp(a.b, b.b), lerp(a.a, b.a))
}
