use std::str::FromStr;

use palette::{Hsl, IntoColor, Srgb};

use crate::error::{Error, Result};

/// An 8-bit sRGB colour, shared by the image and window backends.
pub type Rgb = Srgb<u8>;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.45);
            let rgb: Srgb = hsl.into_color();
            rgb.into_format::<u8>()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color parsing: style string → Rgb
// ---------------------------------------------------------------------------

/// Parse a colour as written in a style mapping.
///
/// Accepts the single-letter shorthands (`k`, `r`, `b`, ...), CSS colour
/// names (`black`, `orange`, ...) and hex triplets (`#1f77b4`).
pub fn parse_color(spec: &str) -> Result<Rgb> {
    let spec = spec.trim();

    if let Some(rgb) = shorthand(spec) {
        return Ok(rgb);
    }
    if spec.starts_with('#') {
        return Rgb::from_str(spec)
            .map_err(|e| Error::Configuration(format!("invalid hex colour '{spec}': {e}")));
    }
    let name = spec.to_ascii_lowercase();
    palette::named::from_str(&name)
        .ok_or_else(|| Error::Configuration(format!("unknown colour '{spec}'")))
}

fn shorthand(spec: &str) -> Option<Rgb> {
    let (r, g, b) = match spec {
        "b" => (0, 0, 255),
        "g" => (0, 128, 0),
        "r" => (255, 0, 0),
        "c" => (0, 191, 191),
        "m" => (191, 0, 191),
        "y" => (191, 191, 0),
        "k" => (0, 0, 0),
        "w" => (255, 255, 255),
        _ => return None,
    };
    Some(Rgb::new(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("k", Rgb::new(0, 0, 0))]
    #[case("r", Rgb::new(255, 0, 0))]
    #[case("black", Rgb::new(0, 0, 0))]
    #[case("Orange", Rgb::new(255, 165, 0))]
    #[case("#1f77b4", Rgb::new(0x1f, 0x77, 0xb4))]
    fn parses_supported_colour_notations(#[case] spec: &str, #[case] expected: Rgb) {
        assert_eq!(parse_color(spec).unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_colour() {
        assert!(matches!(
            parse_color("not-a-colour"),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn palette_has_distinct_entries() {
        let colours = generate_palette(4);
        assert_eq!(colours.len(), 4);
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }
}
