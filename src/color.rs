//! Hex colour values and brightness adjustment.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PosterError;

// ============================================================================
// HexColor
// ============================================================================

/// A validated 24-bit sRGB colour that round-trips through `#rrggbb`.
///
/// Parsing is strict: only the six-digit form with a leading `#` is
/// accepted, in either letter case. Formatting always yields lowercase.
///
/// ```
/// use emprendego_poster::HexColor;
///
/// let color: HexColor = "#2563EB".parse().unwrap();
/// assert_eq!(color.to_string(), "#2563eb");
/// assert!("2563eb".parse::<HexColor>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor(Srgb<u8>);

impl HexColor {
    pub const WHITE: Self = Self::from_rgb(0xff, 0xff, 0xff);

    /// Creates a colour from its channels.
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self(Srgb::new(red, green, blue))
    }

    /// Parses a `#RRGGBB` string.
    pub fn parse(input: &str) -> Result<Self, PosterError> {
        let invalid = || PosterError::InvalidColorFormat(input.to_string());

        let digits = input.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::from_rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn red(&self) -> u8 {
        self.0.red
    }

    pub fn green(&self) -> u8 {
        self.0.green
    }

    pub fn blue(&self) -> u8 {
        self.0.blue
    }

    /// Returns the 24-bit packed `0xRRGGBB` value.
    pub fn to_u32(&self) -> u32 {
        (u32::from(self.0.red) << 16) | (u32::from(self.0.green) << 8) | u32::from(self.0.blue)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_u32())
    }
}

impl FromStr for HexColor {
    type Err = PosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "jsonschema")]
impl schemars::JsonSchema for HexColor {
    fn schema_name() -> String {
        "HexColor".to_string()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(generator)
    }
}

// ============================================================================
// Adjustment
// ============================================================================

/// Shifts every channel of `color` by `round(2.55 * percent)`.
///
/// Positive values lighten, negative values darken. Channels saturate at
/// `0` and `255`; `percent` is clamped to `-100..=100`.
///
/// ```
/// use emprendego_poster::{adjust, HexColor};
///
/// let base = HexColor::parse("#2563eb").unwrap();
/// assert_eq!(adjust(base, 0), base);
/// assert_eq!(adjust(base, 100), HexColor::WHITE);
/// ```
pub fn adjust(color: HexColor, percent: i32) -> HexColor {
    let amount = (2.55 * f64::from(percent.clamp(-100, 100))).round() as i32;

    let shift = |channel: u8| -> u8 {
        let value = i32::from(channel) + amount;
        if value < 1 {
            0
        } else if value >= 255 {
            255
        } else {
            value as u8
        }
    };

    HexColor::from_rgb(shift(color.red()), shift(color.green()), shift(color.blue()))
}

// ============================================================================
// Tests
// ============================================================================
