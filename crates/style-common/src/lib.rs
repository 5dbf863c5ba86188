//! Common types shared by the road-style crates: colors, palette
//! definitions and style configuration.

pub mod color;
pub mod error;
pub mod style;

pub use color::{normalize_channels, ColorSpec, Rgba};
pub use error::{StyleError, StyleResult};
pub use style::{
    ControlPoint, Metric, MAX_LUT_SIZE, PaletteDefinition, PolicyDefinition, StrokeConfig, StyleConfig,
    ZoneBlendConfig,
};
