//! Conversions of palette colors into presentation formats: hex, CSS `rgb()`, and HSL.

use crate::Error;
use palette::Srgb;
use std::{fmt::Display, str::FromStr};

/// Formats a color as a lowercase `#rrggbb` hex string.
///
/// # Examples
/// ```
/// # use palette::Srgb;
/// assert_eq!(swatchify::format::to_hex(Srgb::new(255, 0, 0)), "#ff0000");
/// ```
#[must_use]
pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{color:x}")
}

/// Parses a hex color string of the form `#rrggbb`, `rrggbb`, or `#rgb`.
///
/// # Errors
/// Returns [`Error::InvalidHex`] if the string is not a valid hex color.
pub fn from_hex(hex: &str) -> Result<Srgb<u8>, Error> {
    Ok(hex.parse()?)
}

/// Formats a color as a CSS `rgb(R, G, B)` string.
#[must_use]
pub fn to_rgb_string(color: Srgb<u8>) -> String {
    format!("rgb({}, {}, {})", color.red, color.green, color.blue)
}

/// An HSL color rounded to whole degrees and percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoundedHsl {
    /// The hue in degrees, in `[0, 360)`.
    pub hue: u16,
    /// The saturation in percent, in `[0, 100]`.
    pub saturation: u8,
    /// The lightness in percent, in `[0, 100]`.
    pub lightness: u8,
}

impl Display for RoundedHsl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }
}

/// Converts a color to HSL, rounding each component to the nearest integer (halves up).
///
/// The conversion is done in exact integer arithmetic,
/// so colors whose hue or percentages fall exactly on a half always round up.
/// Achromatic colors have a hue and saturation of `0`.
///
/// # Examples
/// ```
/// # use palette::Srgb;
/// # use swatchify::format::{to_hsl, RoundedHsl};
/// let hsl = to_hsl(Srgb::new(255, 0, 0));
/// assert_eq!(hsl, RoundedHsl { hue: 0, saturation: 100, lightness: 50 });
/// ```
#[must_use]
pub fn to_hsl(color: Srgb<u8>) -> RoundedHsl {
    let [r, g, b] = [color.red, color.green, color.blue].map(u32::from);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let sum = max + min;

    let lightness = round_half_up(100 * sum, 2 * 255);

    if delta == 0 {
        return RoundedHsl {
            hue: 0,
            saturation: 0,
            lightness: narrow(lightness),
        };
    }

    // the chroma range of the lightness level, 255 * (1 - |2L - 1|)
    let range = if sum <= 255 { sum } else { 2 * 255 - sum };
    let saturation = round_half_up(100 * delta, range);

    // hue * delta / 60, offset into the positive range
    let sector = if max == r {
        6 * delta + g - b
    } else if max == g {
        2 * delta + b - r
    } else {
        4 * delta + r - g
    };
    let hue = round_half_up(60 * sector, delta) % 360;

    RoundedHsl {
        hue: narrow(hue),
        saturation: narrow(saturation),
        lightness: narrow(lightness),
    }
}

/// Returns `numerator / denominator` rounded to the nearest integer, with halves rounded up.
#[inline]
const fn round_half_up(numerator: u32, denominator: u32) -> u32 {
    (2 * numerator + denominator) / (2 * denominator)
}

/// Converts an in-range component into a smaller integer type.
#[inline]
fn narrow<T: TryFrom<u32> + Default>(value: u32) -> T {
    T::try_from(value).unwrap_or_default()
}

/// Formats a color as a CSS `hsl(H, S%, L%)` string.
#[must_use]
pub fn to_hsl_string(color: Srgb<u8>) -> String {
    to_hsl(color).to_string()
}

/// The set of supported text formats for palette colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ColorFormat {
    /// `#rrggbb`
    #[default]
    Hex,
    /// `rgb(R, G, B)`
    Rgb,
    /// `hsl(H, S%, L%)`
    Hsl,
}

impl ColorFormat {
    /// Formats `color` in this format.
    #[must_use]
    pub fn format(self, color: Srgb<u8>) -> String {
        match self {
            ColorFormat::Hex => to_hex(color),
            ColorFormat::Rgb => to_rgb_string(color),
            ColorFormat::Hsl => to_hsl_string(color),
        }
    }
}

impl Display for ColorFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ColorFormat::Hex => "hex",
                ColorFormat::Rgb => "rgb",
                ColorFormat::Hsl => "hsl",
            }
        )
    }
}

/// The error returned when parsing an unknown [`ColorFormat`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color format `{0}`, expected one of hex, rgb, hsl")]
pub struct UnknownColorFormat(pub String);

impl FromStr for ColorFormat {
    type Err = UnknownColorFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(ColorFormat::Hex),
            "rgb" => Ok(ColorFormat::Rgb),
            "hsl" => Ok(ColorFormat::Hsl),
            _ => Err(UnknownColorFormat(s.to_owned())),
        }
    }
}
