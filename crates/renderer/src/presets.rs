//! Built-in palettes.
//!
//! Each call builds a fresh, caller-owned scale; there are no shared global
//! instances.

use style_common::{PaletteDefinition, StyleResult};

use crate::colorscale::ColorScale;

/// Overtaking distance on urban roads: red below 1.5 m, yellow to green above.
pub fn urban_distance_palette() -> StyleResult<ColorScale> {
    ColorScale::from_definition(&PaletteDefinition::urban_distance())
}

/// Overtaking distance on rural roads: red below 2.0 m, yellow to green above.
pub fn rural_distance_palette() -> StyleResult<ColorScale> {
    ColorScale::from_definition(&PaletteDefinition::rural_distance())
}

/// Percentage of close overtakers, green through yellow to red.
pub fn close_overtaker_ratio_palette() -> StyleResult<ColorScale> {
    ColorScale::from_definition(&PaletteDefinition::close_overtaker_ratio())
}
