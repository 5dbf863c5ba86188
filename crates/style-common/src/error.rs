//! Error types for palette construction and style configuration.

use thiserror::Error;

/// Result type alias using StyleError.
pub type StyleResult<T> = Result<T, StyleError>;

/// Primary error type for palette and style operations.
///
/// Only construction can fail. Queries against a built palette always
/// produce a drawable color.
#[derive(Debug, Error, PartialEq)]
pub enum StyleError {
    // === Palette Errors ===
    #[error("Invalid color spec: expected 1, 3 or 4 channels, got {0}")]
    InvalidColorSpec(usize),

    #[error("Invalid palette: {0}")]
    InvalidPalette(String),

    #[error("Duplicate control point position: {0}")]
    DuplicatePosition(f64),

    #[error("Control point position is not finite: {0}")]
    NonFinitePosition(f64),

    #[error("Invalid lookup table size {0}: need 2 to 65536 entries")]
    InvalidLutSize(usize),

    #[error("Invalid color string: {0}")]
    InvalidColorString(String),

    // === Configuration Errors ===
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Palette not found: {0}")]
    PaletteNotFound(String),
}

impl StyleError {
    /// Whether the error comes from a malformed palette rather than from
    /// the surrounding configuration document.
    pub fn is_palette_error(&self) -> bool {
        matches!(
            self,
            StyleError::InvalidColorSpec(_)
                | StyleError::InvalidPalette(_)
                | StyleError::DuplicatePosition(_)
                | StyleError::NonFinitePosition(_)
                | StyleError::InvalidLutSize(_)
                | StyleError::InvalidColorString(_)
        )
    }
}

impl From<serde_json::Error> for StyleError {
    fn from(err: serde_json::Error) -> Self {
        StyleError::ParseError(format!("JSON error: {}", err))
    }
}
