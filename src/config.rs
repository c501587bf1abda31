//! Editable poster configuration.
//!
//! A [`PosterConfig`] is what the customizer panel edits. It is a plain value:
//! every edit goes through a transition that returns a new config, so anything
//! composed from an older config keeps observing that older value.
//!
//! # Example
//!
//! ```
//! use emprendego_poster::{ColorSlot, HexColor, PosterConfig, PosterElement, PosterStyle, QrSize};
//!
//! let config = PosterConfig::default()
//!     .with_style(PosterStyle::Brand)
//!     .with_qr_size(QrSize::Large)
//!     .with_color(ColorSlot::Brand, HexColor::parse("#e11d48").unwrap())
//!     .toggle(PosterElement::Socials);
//!
//! let json = config.to_json().unwrap();
//! let restored = PosterConfig::from_json(&json).unwrap();
//! assert_eq!(restored, config);
//! ```
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "style": "brand",
//!   "qrSize": 360,
//!   "qrColor": "#1f2937",
//!   "bgColor": "#ffffff",
//!   "brandColor": "#e11d48",
//!   "showLogo": true,
//!   "showUrl": true,
//!   "showSocials": false
//! }
//! ```
//!
//! Missing fields take their defaults and unrecognized fields are ignored.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::color::HexColor;
use crate::error::PosterError;
use crate::style::PosterStyle;

pub const DEFAULT_QR_COLOR: HexColor = HexColor::from_rgb(0x1f, 0x29, 0x37);
pub const DEFAULT_BG_COLOR: HexColor = HexColor::WHITE;
pub const DEFAULT_BRAND_COLOR: HexColor = HexColor::from_rgb(0x25, 0x63, 0xeb);

// ============================================================================
// QrSize
// ============================================================================

/// Requested QR rendering size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QrSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl QrSize {
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    pub fn pixels(&self) -> u32 {
        match self {
            Self::Small => 180,
            Self::Medium => 256,
            Self::Large => 360,
        }
    }

    /// Maps a pixel size to a recognized size, defaulting to `Medium`.
    pub fn from_pixels(pixels: u32) -> Self {
        match pixels {
            180 => Self::Small,
            360 => Self::Large,
            _ => Self::Medium,
        }
    }
}

impl Serialize for QrSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.pixels())
    }
}

impl<'de> Deserialize<'de> for QrSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Non-integral or negative sizes are unrecognized, not errors.
        let raw = serde_json::Value::deserialize(deserializer)?;
        let pixels = raw.as_u64().and_then(|v| u32::try_from(v).ok()).unwrap_or(0);
        Ok(Self::from_pixels(pixels))
    }
}

#[cfg(feature = "jsonschema")]
impl schemars::JsonSchema for QrSize {
    fn schema_name() -> String {
        "QrSize".to_string()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        u32::json_schema(generator)
    }
}

// ============================================================================
// Slots
// ============================================================================

/// Which colour of the config a [`PosterConfig::with_color`] call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSlot {
    Qr,
    Background,
    Brand,
}

/// An element whose visibility can be toggled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosterElement {
    Logo,
    Url,
    Socials,
}

// ============================================================================
// PosterConfig
// ============================================================================

/// Poster customization settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(default, rename_all = "camelCase")]
pub struct PosterConfig {
    pub style: PosterStyle,
    pub qr_size: QrSize,
    pub qr_color: HexColor,
    pub bg_color: HexColor,
    pub brand_color: HexColor,
    pub show_logo: bool,
    pub show_url: bool,
    pub show_socials: bool,
}

impl Default for PosterConfig {
    fn default() -> Self {
        Self {
            style: PosterStyle::default(),
            qr_size: QrSize::default(),
            qr_color: DEFAULT_QR_COLOR,
            bg_color: DEFAULT_BG_COLOR,
            brand_color: DEFAULT_BRAND_COLOR,
            show_logo: true,
            show_url: true,
            show_socials: true,
        }
    }
}

impl PosterConfig {
    /// Creates a config with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(&self, style: PosterStyle) -> Self {
        Self { style, ..*self }
    }

    pub fn with_qr_size(&self, qr_size: QrSize) -> Self {
        Self { qr_size, ..*self }
    }

    pub fn with_color(&self, slot: ColorSlot, color: HexColor) -> Self {
        match slot {
            ColorSlot::Qr => Self {
                qr_color: color,
                ..*self
            },
            ColorSlot::Background => Self {
                bg_color: color,
                ..*self
            },
            ColorSlot::Brand => Self {
                brand_color: color,
                ..*self
            },
        }
    }

    /// Parses raw colour input from the UI before applying it.
    pub fn set_color_str(&self, slot: ColorSlot, value: &str) -> Result<Self, PosterError> {
        Ok(self.with_color(slot, HexColor::parse(value)?))
    }

    pub fn color(&self, slot: ColorSlot) -> HexColor {
        match slot {
            ColorSlot::Qr => self.qr_color,
            ColorSlot::Background => self.bg_color,
            ColorSlot::Brand => self.brand_color,
        }
    }

    /// Flips the visibility of one element.
    pub fn toggle(&self, element: PosterElement) -> Self {
        self.with_visibility(element, !self.is_shown(element))
    }

    pub fn with_visibility(&self, element: PosterElement, shown: bool) -> Self {
        match element {
            PosterElement::Logo => Self {
                show_logo: shown,
                ..*self
            },
            PosterElement::Url => Self {
                show_url: shown,
                ..*self
            },
            PosterElement::Socials => Self {
                show_socials: shown,
                ..*self
            },
        }
    }

    pub fn is_shown(&self, element: PosterElement) -> bool {
        match element {
            PosterElement::Logo => self.show_logo,
            PosterElement::Url => self.show_url,
            PosterElement::Socials => self.show_socials,
        }
    }

    /// Serializes the config to a JSON string.
    pub fn to_json(&self) -> Result<String, PosterError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the config to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, PosterError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, PosterError> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
