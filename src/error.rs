//! Error type shared by the poster pipeline.

use thiserror::Error;

/// Errors raised while configuring or exporting a poster.
///
/// Composition itself never fails: unknown styles and missing store fields
/// have documented fallbacks. Errors only come from validating raw input
/// and from the export adapter.
#[derive(Debug, Error)]
pub enum PosterError {
    /// A colour was not a `#RRGGBB` string.
    #[error("invalid color format: {0:?} (expected #RRGGBB)")]
    InvalidColorFormat(String),

    /// A config or store document could not be (de)serialized.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The target URL could not be encoded as a QR code.
    #[error("failed to encode QR payload: {0}")]
    QrEncoding(String),

    /// The generated SVG markup was rejected by the parser.
    #[error("failed to parse poster svg: {0}")]
    SvgParse(String),

    /// Rasterization produced no pixmap (zero or oversized dimensions).
    #[error("failed to rasterize poster: {0}")]
    Raster(String),

    /// The raster could not be encoded to the output format.
    #[error("failed to encode poster image: {0}")]
    Encode(String),

    /// A background export thread panicked before returning.
    #[error("export worker panicked")]
    ExportPanicked,
}
