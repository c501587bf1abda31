//! Store data consumed by the composer.

use serde::{Deserialize, Deserializer, Serialize};

use crate::color::HexColor;
use crate::config::DEFAULT_BRAND_COLOR;
use crate::error::PosterError;

/// Social network handles attached to a store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<String>,
}

/// The store record as returned by the data layer.
///
/// Read-only from the composer's point of view. `logo_url` is either an
/// absolute URL or absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreProfile {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(deserialize_with = "null_as_brand_color")]
    pub primary_color: HexColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub social_links: SocialLinks,
}

impl Default for StoreProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            slug: String::new(),
            description: None,
            logo_url: None,
            primary_color: DEFAULT_BRAND_COLOR,
            whatsapp: None,
            social_links: SocialLinks::default(),
        }
    }
}

impl StoreProfile {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_logo_url(mut self, url: impl Into<String>) -> Self {
        self.logo_url = Some(url.into());
        self
    }

    pub fn with_whatsapp(mut self, number: impl Into<String>) -> Self {
        self.whatsapp = Some(number.into());
        self
    }

    pub fn with_social_links(mut self, links: SocialLinks) -> Self {
        self.social_links = links;
        self
    }

    /// Deserializes a store record from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, PosterError> {
        Ok(serde_json::from_str(json)?)
    }
}

// Rows from the data layer carry `null` for unset columns.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_brand_color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HexColor, D::Error> {
    Ok(Option::<HexColor>::deserialize(deserializer)?.unwrap_or(DEFAULT_BRAND_COLOR))
}
