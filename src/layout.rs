//! Presentation-agnostic poster layout.
//!
//! A [`RenderableLayout`] is the intermediate tree handed to previews and
//! export adapters. Its shape never changes: every block and optional element
//! is always present and carries a visibility flag, so two layouts for the
//! same poster differ only in values, never in structure.

use serde::Serialize;

use crate::color::HexColor;
use crate::config::QrSize;
use crate::error::PosterError;
use crate::style::ResolvedStyle;

/// An optional element of the layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Element<T> {
    pub visible: bool,
    pub value: T,
}

impl<T> Element<T> {
    pub fn new(visible: bool, value: T) -> Self {
        Self { visible, value }
    }

    /// Returns the value only when the element is visible.
    pub fn shown(&self) -> Option<&T> {
        self.visible.then_some(&self.value)
    }
}

// ============================================================================
// Header
// ============================================================================

/// What to draw in the avatar slot of the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Avatar {
    /// The store has an absolute logo URL.
    LogoAvailable { url: String },
    /// No usable logo; draw an initial badge instead.
    LogoUnavailable { initial: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct HeaderBlock {
    pub logo: Element<Avatar>,
    pub name: String,
    pub description: Element<String>,
}

// ============================================================================
// Body
// ============================================================================

/// Background of the QR code modules area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub enum QrBackground {
    Transparent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct QrBlock {
    /// Encoded verbatim into the code.
    pub payload: String,
    pub size: QrSize,
    pub foreground: HexColor,
    pub background: QrBackground,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct BodyBlock {
    pub call_to_action: Element<String>,
    pub qr: QrBlock,
    pub display_url: Element<String>,
}

// ============================================================================
// Footer
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub enum SocialChannel {
    Instagram,
    Facebook,
    TikTok,
    WhatsApp,
}

impl SocialChannel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Instagram => "Instagram",
            Self::Facebook => "Facebook",
            Self::TikTok => "TikTok",
            Self::WhatsApp => "WhatsApp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct SocialEntry {
    pub channel: SocialChannel,
    /// Text shown next to the channel icon (`@handle` or phone number).
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct FooterBlock {
    pub visible: bool,
    pub entries: Vec<SocialEntry>,
    pub powered_by: Element<String>,
}

// ============================================================================
// RenderableLayout
// ============================================================================

/// The composed poster: resolved style plus header, body and footer blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct RenderableLayout {
    pub style: ResolvedStyle,
    pub background: HexColor,
    pub header: HeaderBlock,
    pub body: BodyBlock,
    pub footer: FooterBlock,
}

impl RenderableLayout {
    /// Serializes the layout to a JSON string.
    pub fn to_json(&self) -> Result<String, PosterError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the layout to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, PosterError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
