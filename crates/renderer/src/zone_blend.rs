//! Continuous near/mid/far weights from the map resolution.
//!
//! Instead of switching stroke parameters at fixed zoom thresholds, styles
//! blend three parameter sets with weights that ramp linearly across two
//! transition windows. With the default breakpoints:
//!
//! ```text
//! resolution:  0 .. 1 .. 2 ........ 20 .. 30 ..
//! near:        1    1 \ 0          0     0
//! mid:         0    0 / 1          1 \   0
//! far:         0    0   0          0 /   1
//! ```

use style_common::ZoneBlendConfig;
use style_common::{StyleError, StyleResult};

/// Linear ramp from 0 at `a` to 1 at `b`, clamped to `[0, 1]`.
///
/// `a > b` gives a descending ramp. A NaN input yields 0.
#[inline]
pub fn ramp(x: f64, a: f64, b: f64) -> f64 {
    let y = (x - a) / (b - a);
    if y.is_nan() {
        return 0.0;
    }
    y.clamp(0.0, 1.0)
}

/// Blend weights for one render call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoneWeights {
    pub near: f64,
    pub mid: f64,
    pub far: f64,
}

impl ZoneWeights {
    pub fn new(near: f64, mid: f64, far: f64) -> Self {
        Self { near, mid, far }
    }

    /// Weighted sum of one parameter's per-band values.
    #[inline]
    pub fn blend(&self, near: f64, mid: f64, far: f64) -> f64 {
        near * self.near + mid * self.mid + far * self.far
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.near, self.mid, self.far]
    }
}

/// Weights with the default breakpoints (1, 2, 20, 30).
pub fn resolution_to_weights(resolution: f64) -> ZoneWeights {
    ZoneBlend::default().weights(resolution)
}

/// Zoom-band breakpoints, in map units per pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneBlend {
    near_full: f64,
    near_end: f64,
    far_start: f64,
    far_full: f64,
}

impl ZoneBlend {
    /// Breakpoints must be finite and ordered
    /// `near_full < near_end <= far_start < far_full`.
    pub fn new(config: &ZoneBlendConfig) -> StyleResult<Self> {
        config
            .validate()
            .map_err(|e| StyleError::ValidationError(format!("zone_blend: {}", e)))?;
        Ok(Self {
            near_full: config.near_full,
            near_end: config.near_end,
            far_start: config.far_start,
            far_full: config.far_full,
        })
    }

    #[inline]
    pub fn weights(&self, resolution: f64) -> ZoneWeights {
        let near = ramp(resolution, self.near_end, self.near_full);
        let far = ramp(resolution, self.far_start, self.far_full);
        let mid = ramp(resolution, self.far_full, self.far_start) - near;
        ZoneWeights { near, mid, far }
    }

    pub fn config(&self) -> ZoneBlendConfig {
        ZoneBlendConfig {
            near_full: self.near_full,
            near_end: self.near_end,
            far_start: self.far_start,
            far_full: self.far_full,
        }
    }
}

impl Default for ZoneBlend {
    fn default() -> Self {
        let config = ZoneBlendConfig::default();
        Self {
            near_full: config.near_full,
            near_end: config.near_end,
            far_start: config.far_start,
            far_full: config.far_full,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_ascending_and_descending() {
        assert_eq!(ramp(0.0, 20.0, 30.0), 0.0);
        assert_eq!(ramp(25.0, 20.0, 30.0), 0.5);
        assert_eq!(ramp(40.0, 20.0, 30.0), 1.0);

        assert_eq!(ramp(0.5, 2.0, 1.0), 1.0);
        assert_eq!(ramp(1.5, 2.0, 1.0), 0.5);
        assert_eq!(ramp(3.0, 2.0, 1.0), 0.0);
    }

    #[test]
    fn test_ramp_nan() {
        assert_eq!(ramp(f64::NAN, 2.0, 1.0), 0.0);
    }

    #[test]
    fn test_blend() {
        let w = ZoneWeights::new(0.25, 0.75, 0.0);
        assert_eq!(w.blend(4.0, 8.0, 100.0), 7.0);
    }
}
