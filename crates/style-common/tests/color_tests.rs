//! Tests for color normalization and the hex/CSS formats.

use style_common::color::{normalize_channels, ColorSpec, Rgba};
use style_common::StyleError;

// ============================================================================
// Normalization tests
// ============================================================================

#[test]
fn test_gray_expands_to_opaque_rgba() {
    let c = ColorSpec::gray(42).normalize().unwrap();
    assert_eq!(c, Rgba::new(42, 42, 42, 255));
}

#[test]
fn test_rgb_gets_opaque_alpha() {
    let c = ColorSpec::rgb(196, 196, 0).normalize().unwrap();
    assert_eq!(c, Rgba::new(196, 196, 0, 255));
}

#[test]
fn test_rgba_passes_through() {
    let c = ColorSpec::rgba(10, 20, 30, 40).normalize().unwrap();
    assert_eq!(c, Rgba::new(10, 20, 30, 40));
}

#[test]
fn test_two_channels_is_rejected() {
    let err = ColorSpec::Channels(vec![1, 2]).normalize().unwrap_err();
    assert_eq!(err, StyleError::InvalidColorSpec(2));
    assert!(err.is_palette_error());
}

#[test]
fn test_css_spec_normalizes() {
    let c = ColorSpec::from("rgb(1, 2, 3)").normalize().unwrap();
    assert_eq!(c, Rgba::opaque(1, 2, 3));
    assert_eq!(normalize_channels(&[1, 2, 3]).unwrap(), c);
}

// ============================================================================
// Formatting tests
// ============================================================================

#[test]
fn test_to_hex_pads_single_digits() {
    assert_eq!(Rgba::opaque(0, 0, 0).to_hex(), "#000000");
    assert_eq!(Rgba::opaque(10, 11, 15).to_hex(), "#0a0b0f");
    assert_eq!(Rgba::opaque(255, 16, 1).to_hex(), "#ff1001");
}

#[test]
fn test_to_hex_drops_alpha() {
    assert_eq!(Rgba::new(64, 0, 0, 7).to_hex(), "#400000");
    assert_eq!(Rgba::new(64, 0, 0, 7).to_hex_rgba(), "#40000007");
}

#[test]
fn test_css_strings() {
    let c = Rgba::new(196, 196, 0, 255);
    assert_eq!(c.to_css_rgb(), "rgb(196,196,0)");
    assert_eq!(c.to_css_rgba(), "rgba(196,196,0,1)");
    assert_eq!(c.with_alpha(0).to_css_rgba(), "rgba(196,196,0,0)");
    assert_eq!(c.to_string(), "rgba(196,196,0,1)");
}

#[test]
fn test_opacity_helpers() {
    let c = Rgba::opaque(1, 2, 3).with_opacity(0.5);
    assert_eq!(c.a, 128);
    assert!((c.opacity() - 0.502).abs() < 0.001);
    assert_eq!(Rgba::black().with_opacity(2.0).a, 255);
    assert_eq!(Rgba::black().with_opacity(-1.0).a, 0);
    assert_eq!(Rgba::black().with_opacity(f64::NAN).a, 0);
}

// ============================================================================
// Parsing tests
// ============================================================================

#[test]
fn test_parse_hex() {
    assert_eq!(Rgba::from_css("#FF5500").unwrap(), Rgba::opaque(255, 85, 0));
    assert_eq!(
        Rgba::from_css("#ff550080").unwrap(),
        Rgba::new(255, 85, 0, 128)
    );
    assert!(Rgba::from_css("#GGGGGG").is_err());
    assert!(Rgba::from_css("#FFF").is_err());
}

#[test]
fn test_parse_css_functions() {
    assert_eq!(
        Rgba::from_css(" RGBA(1, 2, 3, 0.5) ").unwrap(),
        Rgba::new(1, 2, 3, 128)
    );
    assert_eq!(Rgba::from_css("rgb(4,5,6)").unwrap(), Rgba::opaque(4, 5, 6));
    assert!(Rgba::from_css("rgb(4,5)").is_err());
    assert!(Rgba::from_css("rgb(256,0,0)").is_err());
    assert!(Rgba::from_css("rgba(1,2,3,1.5)").is_err());
}

#[test]
fn test_parse_named() {
    assert_eq!(Rgba::from_css("transparent").unwrap(), Rgba::transparent());
    assert_eq!(Rgba::from_css("Grey").unwrap(), Rgba::opaque(128, 128, 128));
    assert!(matches!(
        Rgba::from_css("chartreuse"),
        Err(StyleError::InvalidColorString(_))
    ));
}

#[test]
fn test_css_rgba_round_trip_every_alpha() {
    for a in 0..=255u8 {
        let c = Rgba::new(12, 200, 7, a);
        assert_eq!(Rgba::from_css(&c.to_css_rgba()).unwrap(), c, "alpha {}", a);
    }
}

#[test]
fn test_hex_round_trip_through_css() {
    let colors = [
        Rgba::opaque(64, 0, 0),
        Rgba::opaque(196, 196, 0),
        Rgba::new(0, 255, 0, 31),
        Rgba::new(1, 2, 3, 4),
    ];
    for c in colors {
        let parsed = Rgba::from_css(&c.to_css_rgba()).unwrap();
        assert_eq!(parsed.to_hex(), c.to_hex());
        assert_eq!(Rgba::from_css(&c.to_hex_rgba()).unwrap(), c);
        assert_eq!(Rgba::from_css(&c.to_css_rgb()).unwrap(), c.with_alpha(255));
    }
}
