//! Value and zoom dependent styling of road features.
//!
//! Implements:
//! - Piecewise-linear color scales with a precomputed lookup table
//! - Near/mid/far zoom-band weights from the map resolution
//! - Style policies combining both into stroke color, width and opacity
//! - Legend geometry for gradient bars

pub mod colorscale;
pub mod legend;
pub mod policy;
pub mod presets;
pub mod registry;
pub mod zone_blend;

pub use colorscale::ColorScale;
pub use legend::{Legend, LegendLayout, LegendTick};
pub use policy::{FeatureAttributes, StrokeStyle, StylePolicy, Zone, ZonePalettes};
pub use registry::PaletteRegistry;
pub use zone_blend::{resolution_to_weights, ZoneBlend, ZoneWeights};
