//! emprendego-poster: QR poster composition for EmprendeGo stores
//!
//! This crate turns a store record, the URL of its public page and a poster
//! configuration into a presentation-agnostic layout, and exports that layout
//! as an image.
//!
//! # Example
//!
//! ```
//! use emprendego_poster::{compose, PosterConfig, PosterElement, PosterStyle, StoreProfile};
//!
//! let store = StoreProfile::new("Café Luna", "cafe-luna").with_whatsapp("+56 9 1234 5678");
//!
//! let config = PosterConfig::default()
//!     .with_style(PosterStyle::Brand)
//!     .toggle(PosterElement::Socials);
//!
//! let layout = compose(&store, "https://emprendego.shop/cafe-luna", &config);
//! assert_eq!(layout.body.display_url.value, "emprendego.shop/cafe-luna");
//! assert!(!layout.footer.visible);
//! ```
//!
//! # Editing Sessions
//!
//! [`PosterCustomizer`] wraps a store and config with undo/redo and exports
//! snapshots through any [`ExportAdapter`]:
//!
//! ```no_run
//! use emprendego_poster::{PosterCustomizer, PosterStyle, StoreProfile, SvgExporter};
//!
//! let mut customizer = PosterCustomizer::new(
//!     StoreProfile::new("Café Luna", "cafe-luna"),
//!     "https://emprendego.shop/cafe-luna",
//! );
//! customizer.update(|c| c.with_style(PosterStyle::Poster));
//!
//! let png = customizer.spawn_export(SvgExporter::new(2.0)).wait().unwrap();
//! std::fs::write("poster.png", png.bytes).unwrap();
//! ```

mod color;
mod composer;
mod config;
mod customizer;
mod error;
mod export;
mod layout;
mod store;
mod style;

pub use color::{HexColor, adjust};
pub use composer::{
    CALL_TO_ACTION, DESCRIPTION_LIMIT, ELLIPSIS, PLACEHOLDER_NAME, POWERED_BY, compose, display_name,
    display_url, initial, truncate_description,
};
pub use config::{
    ColorSlot, DEFAULT_BG_COLOR, DEFAULT_BRAND_COLOR, DEFAULT_QR_COLOR, PosterConfig, PosterElement, QrSize,
};
pub use customizer::{Configurable, HISTORY_LIMIT, PosterCustomizer};
pub use error::PosterError;
pub use export::{
    ExportAdapter, ExportHandle, ExportedImage, ImageFormat, QrMatrix, SvgExporter, spawn_export,
};
pub use layout::{
    Avatar, BodyBlock, Element, FooterBlock, HeaderBlock, QrBackground, QrBlock, RenderableLayout,
    SocialChannel, SocialEntry,
};
pub use store::{SocialLinks, StoreProfile};
pub use style::{
    BRAND_GRADIENT_LIGHTEN, Background, Border, HeaderFill, PosterStyle, ResolvedStyle, Shadow, Shape,
    resolve, resolve_id,
};
