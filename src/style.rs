//! Poster style identifiers and their resolved visual parameters.

use serde::{Deserialize, Deserializer, Serialize};

use crate::color::{HexColor, adjust};

/// Lightening applied to the brand colour for the end of the header gradient.
pub const BRAND_GRADIENT_LIGHTEN: i32 = 20;

// ============================================================================
// PosterStyle
// ============================================================================

/// The poster style selected in the customizer.
///
/// Deserialization never fails on an unknown identifier; it falls back to
/// [`PosterStyle::Minimal`] the same way [`PosterStyle::from_id`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum PosterStyle {
    /// Plain card with a light header.
    #[default]
    Minimal,
    /// Card with a brand-coloured gradient header.
    Brand,
    /// Framed print poster with a call to action.
    Poster,
}

impl PosterStyle {
    pub const ALL: [Self; 3] = [Self::Minimal, Self::Brand, Self::Poster];

    /// Maps a style identifier to a style, defaulting to `Minimal`.
    pub fn from_id(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "brand" => Self::Brand,
            "poster" => Self::Poster,
            _ => Self::Minimal,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Brand => "brand",
            Self::Poster => "poster",
        }
    }
}

impl<'de> Deserialize<'de> for PosterStyle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value.as_str().map(Self::from_id).unwrap_or_default())
    }
}

// ============================================================================
// Visual Descriptors
// ============================================================================

/// Drop shadow weight under the poster card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub enum Shadow {
    Soft,
    Medium,
    Strong,
}

impl Shadow {
    /// Blur radius in layout pixels.
    pub fn blur(&self) -> f32 {
        match self {
            Self::Soft => 6.0,
            Self::Medium => 12.0,
            Self::Strong => 24.0,
        }
    }

    /// Shadow opacity in `0.0..=1.0`.
    pub fn opacity(&self) -> f32 {
        match self {
            Self::Soft => 0.08,
            Self::Medium => 0.15,
            Self::Strong => 0.25,
        }
    }
}

/// Container shape: corner radius and shadow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub corner_radius: u32,
    pub shadow: Shadow,
}

/// How the area behind the card is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Background {
    /// The card fills the poster with the configured background colour.
    Canvas,
    /// The card sits inside a solid frame of the given colour.
    Framed { frame: HexColor },
}

/// Card border treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Border {
    None,
    Hairline { color: HexColor },
    Thick { color: HexColor },
}

impl Border {
    /// Stroke width in layout pixels.
    pub fn width(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::Hairline { .. } => 1,
            Self::Thick { .. } => 6,
        }
    }

    pub fn color(&self) -> Option<HexColor> {
        match self {
            Self::None => None,
            Self::Hairline { color } | Self::Thick { color } => Some(*color),
        }
    }
}

/// Header block fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HeaderFill {
    Solid { color: HexColor },
    Gradient { from: HexColor, to: HexColor },
}

impl HeaderFill {
    /// Start and end colours; a solid fill has equal endpoints.
    pub fn endpoints(&self) -> (HexColor, HexColor) {
        match *self {
            Self::Solid { color } => (color, color),
            Self::Gradient { from, to } => (from, to),
        }
    }
}

// ============================================================================
// ResolvedStyle
// ============================================================================

/// Concrete visual parameters derived from a [`PosterStyle`].
///
/// Always recomputed from the style and brand colour; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyle {
    pub style: PosterStyle,
    pub shape: Shape,
    pub background: Background,
    pub border: Border,
    pub header: HeaderFill,
    pub header_text: HexColor,
    pub footer_text: HexColor,
    pub has_call_to_action: bool,
}

const GRAY_50: HexColor = HexColor::from_rgb(0xf9, 0xfa, 0xfb);
const GRAY_200: HexColor = HexColor::from_rgb(0xe5, 0xe7, 0xeb);
const GRAY_500: HexColor = HexColor::from_rgb(0x6b, 0x72, 0x80);
const GRAY_900: HexColor = HexColor::from_rgb(0x11, 0x18, 0x27);

/// Resolves a style against the brand colour.
///
/// ```
/// use emprendego_poster::{adjust, resolve, HeaderFill, HexColor, PosterStyle};
///
/// let brand = HexColor::parse("#2563eb").unwrap();
/// let style = resolve(PosterStyle::Brand, brand);
/// assert_eq!(style.header, HeaderFill::Gradient { from: brand, to: adjust(brand, 20) });
/// ```
pub fn resolve(style: PosterStyle, brand: HexColor) -> ResolvedStyle {
    match style {
        PosterStyle::Minimal => ResolvedStyle {
            style,
            shape: Shape {
                corner_radius: 12,
                shadow: Shadow::Soft,
            },
            background: Background::Canvas,
            border: Border::Hairline { color: GRAY_200 },
            header: HeaderFill::Solid { color: GRAY_50 },
            header_text: GRAY_900,
            footer_text: GRAY_500,
            has_call_to_action: false,
        },
        PosterStyle::Brand => ResolvedStyle {
            style,
            shape: Shape {
                corner_radius: 24,
                shadow: Shadow::Strong,
            },
            background: Background::Canvas,
            border: Border::None,
            header: HeaderFill::Gradient {
                from: brand,
                to: adjust(brand, BRAND_GRADIENT_LIGHTEN),
            },
            header_text: HexColor::WHITE,
            footer_text: brand,
            has_call_to_action: false,
        },
        PosterStyle::Poster => ResolvedStyle {
            style,
            shape: Shape {
                corner_radius: 8,
                shadow: Shadow::Medium,
            },
            background: Background::Framed { frame: brand },
            border: Border::Thick { color: brand },
            header: HeaderFill::Solid { color: brand },
            header_text: HexColor::WHITE,
            footer_text: GRAY_900,
            has_call_to_action: true,
        },
    }
}

/// Resolves a raw style identifier; unknown identifiers resolve as `minimal`.
pub fn resolve_id(id: &str, brand: HexColor) -> ResolvedStyle {
    resolve(PosterStyle::from_id(id), brand)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn brand() -> HexColor {
        HexColor::parse("#2563eb").unwrap()
    }

    #[test]
    fn unknown_ids_resolve_as_minimal() {
        let minimal = resolve_id("minimal", brand());
        for id in ["", "fancy", "MINIMALIST", "posters", "  "] {
            assert_eq!(resolve_id(id, brand()), minimal, "{id:?}");
        }
    }

    #[test]
    fn ids_are_trimmed_and_case_insensitive() {
        assert_eq!(PosterStyle::from_id(" Brand "), PosterStyle::Brand);
        assert_eq!(PosterStyle::from_id("POSTER"), PosterStyle::Poster);
        for style in PosterStyle::ALL {
            assert_eq!(PosterStyle::from_id(style.id()), style);
        }
    }

    #[test]
    fn only_poster_has_call_to_action() {
        for style in PosterStyle::ALL {
            let resolved = resolve(style, brand());
            assert_eq!(resolved.has_call_to_action, style == PosterStyle::Poster);
            assert_eq!(resolved.style, style);
        }
    }

    #[test]
    fn brand_header_is_lightened_gradient() {
        let resolved = resolve(PosterStyle::Brand, brand());
        let (from, to) = resolved.header.endpoints();
        assert_eq!(from, brand());
        assert_eq!(to, HexColor::parse("#5896ff").unwrap());
    }

    #[test]
    fn solid_headers_have_equal_endpoints() {
        for style in [PosterStyle::Minimal, PosterStyle::Poster] {
            let (from, to) = resolve(style, brand()).header.endpoints();
            assert_eq!(from, to);
        }
        assert_eq!(resolve(PosterStyle::Poster, brand()).header.endpoints().0, brand());
    }

    #[test]
    fn minimal_ignores_brand_color() {
        let red = HexColor::parse("#ff0000").unwrap();
        assert_eq!(resolve(PosterStyle::Minimal, red), resolve(PosterStyle::Minimal, brand()));
    }

    #[test]
    fn style_deserialization_falls_back() {
        let style: PosterStyle = serde_json::from_str("\"poster\"").unwrap();
        assert_eq!(style, PosterStyle::Poster);

        let style: PosterStyle = serde_json::from_str("\"neon\"").unwrap();
        assert_eq!(style, PosterStyle::Minimal);

        assert_eq!(serde_json::to_string(&PosterStyle::Brand).unwrap(), "\"brand\"");
    }

    #[test]
    fn border_width_matches_variant() {
        assert_eq!(resolve(PosterStyle::Brand, brand()).border.width(), 0);
        assert_eq!(resolve(PosterStyle::Minimal, brand()).border.width(), 1);
        assert_eq!(resolve(PosterStyle::Poster, brand()).border.color(), Some(brand()));
    }
}
