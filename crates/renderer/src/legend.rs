//! Legend geometry for a color scale: gradient bar pixels and tick placement.
//!
//! Drawing the result (canvas, DOM, image file) is left to the caller; this
//! module only computes what to draw and where.

use style_common::Rgba;

use crate::colorscale::ColorScale;

/// Placement of the gradient bar inside the legend image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendLayout {
    /// Left edge of the bar in pixels
    pub bar_left: f64,
    /// Bar height in pixels
    pub bar_height: usize,
    /// Width of the whole legend image
    pub width: u32,
    /// Height of the whole legend image
    pub height: u32,
}

impl Default for LegendLayout {
    fn default() -> Self {
        Self {
            bar_left: 25.0,
            bar_height: 25,
            width: 300,
            height: 50,
        }
    }
}

/// A labelled tick below the bar.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendTick {
    pub value: f64,
    /// Horizontal center of the label in pixels
    pub x: f64,
    pub label: String,
}

/// Legend for one color scale. The bar is one pixel per table entry wide.
#[derive(Debug, Clone)]
pub struct Legend<'a> {
    scale: &'a ColorScale,
    layout: LegendLayout,
}

impl<'a> Legend<'a> {
    pub fn new(scale: &'a ColorScale, layout: LegendLayout) -> Self {
        Self { scale, layout }
    }

    pub fn layout(&self) -> &LegendLayout {
        &self.layout
    }

    /// Bar width in pixels.
    pub fn bar_width(&self) -> usize {
        self.scale.len()
    }

    /// Row-major RGBA buffer of the bar, `bar_width() x bar_height` pixels.
    /// Every row repeats the lookup table.
    pub fn bar_pixels(&self) -> Vec<u8> {
        let row: Vec<u8> = self
            .scale
            .lut()
            .iter()
            .flat_map(|c| c.to_array())
            .collect();
        row.repeat(self.layout.bar_height)
    }

    /// Bar color under a pixel column, if the column is on the bar.
    pub fn color_at_column(&self, column: usize) -> Option<Rgba> {
        self.scale.lut().get(column).copied()
    }

    /// Horizontal pixel position of a value on the bar.
    pub fn tick_x(&self, value: f64) -> f64 {
        let (min, max) = self.scale.domain();
        self.layout.bar_left + (value - min) / (max - min) * (self.scale.len() - 1) as f64
    }

    /// Label text: two decimals followed by the unit postfix.
    pub fn tick_label(value: f64, postfix: &str) -> String {
        format!("{:.2}{}", value, postfix)
    }

    pub fn ticks(&self, values: &[f64], postfix: &str) -> Vec<LegendTick> {
        values
            .iter()
            .map(|&value| LegendTick {
                value,
                x: self.tick_x(value),
                label: Self::tick_label(value, postfix),
            })
            .collect()
    }
}
