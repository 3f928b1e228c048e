//! Color to hue rotation
//!
//! The preview recolors one shared character image with a hue rotation
//! instead of asking the service for a new asset.

use crate::error::{Result, SceneError};

/// Parse `#rrggbb` (leading `#` optional) into three 8-bit channels
pub fn parse_hex_color(input: &str) -> Result<(u8, u8, u8)> {
    let invalid = || SceneError::InvalidColor {
        input: input.to_string(),
    };

    let hex = input.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
    };
    Ok((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Hue of a hex color in whole degrees, in `[0, 360)`
///
/// Achromatic colors map to 0. Halves round up, so a hue of 0.5 degrees
/// reads as 1 and -0.5 as 0.
///
/// # Example
/// ```
/// use scenecast::preview::hue_degrees;
///
/// assert_eq!(hue_degrees("#3b82f6").unwrap(), 217);
/// assert_eq!(hue_degrees("#808080").unwrap(), 0);
/// ```
pub fn hue_degrees(input: &str) -> Result<u16> {
    let (r, g, b) = parse_hex_color(input)?;
    Ok(hue_from_rgb(r, g, b))
}

/// Hue of an RGB triple in whole degrees
pub fn hue_from_rgb(r: u8, g: u8, b: u8) -> u16 {
    let (r, g, b) = (f64::from(r), f64::from(g), f64::from(b));
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    if delta == 0.0 {
        return 0;
    }

    // Sextant position; `%` keeps the sign of the dividend
    let h = if max == r {
        ((g - b) / delta) % 6.0
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    let degrees = (h * 60.0 + 0.5).floor() as i32;
    degrees.rem_euclid(360) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("#ff0000", 0 ; "red")]
    #[test_case("#00ff00", 120 ; "green")]
    #[test_case("#0000ff", 240 ; "blue")]
    #[test_case("#ffff00", 60 ; "yellow")]
    #[test_case("#00ffff", 180 ; "cyan")]
    #[test_case("#ff00ff", 300 ; "magenta")]
    #[test_case("#808080", 0 ; "gray")]
    #[test_case("#000000", 0 ; "black")]
    #[test_case("#ffffff", 0 ; "white")]
    #[test_case("#3b82f6", 217 ; "default character blue")]
    #[test_case("#ff0080", 330 ; "red max with negative sextant")]
    #[test_case("3B82F6", 217 ; "no hash upper case")]
    fn test_hue_degrees(input: &str, expected: u16) {
        assert_eq!(hue_degrees(input).unwrap(), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("#fff" ; "short form")]
    #[test_case("#gg0000" ; "not hex")]
    #[test_case("#3b82f6ff" ; "with alpha")]
    fn test_invalid_colors(input: &str) {
        let err = hue_degrees(input).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_COLOR");
    }

    #[test]
    fn test_result_always_in_range() {
        for r in (0..=255u8).step_by(17) {
            for g in (0..=255u8).step_by(17) {
                for b in (0..=255u8).step_by(17) {
                    assert!(hue_from_rgb(r, g, b) < 360);
                }
            }
        }
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#3b82f6").unwrap(), (0x3b, 0x82, 0xf6));
    }
}
