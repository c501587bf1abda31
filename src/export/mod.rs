//! Export boundary: turning a composed layout into image bytes.
//!
//! Adapters receive a [`RenderableLayout`] by reference and must not hold on
//! to anything but their own output. [`spawn_export`] moves an owned snapshot
//! onto a worker thread, so edits made after the call cannot tear the image.

pub mod qr;
pub mod svg;

pub use qr::QrMatrix;
pub use svg::SvgExporter;

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::error::PosterError;
use crate::layout::RenderableLayout;

/// Encoding of an exported image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
        }
    }
}

/// Encoded image returned by an adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

/// Something that can rasterize or otherwise encode a poster layout.
pub trait ExportAdapter {
    fn export(&self, layout: &RenderableLayout) -> Result<ExportedImage, PosterError>;
}

impl<A: ExportAdapter + ?Sized> ExportAdapter for Arc<A> {
    fn export(&self, layout: &RenderableLayout) -> Result<ExportedImage, PosterError> {
        (**self).export(layout)
    }
}

impl<A: ExportAdapter + ?Sized> ExportAdapter for &A {
    fn export(&self, layout: &RenderableLayout) -> Result<ExportedImage, PosterError> {
        (**self).export(layout)
    }
}

// ============================================================================
// Background Export
// ============================================================================

/// An export running on a worker thread.
pub struct ExportHandle {
    worker: JoinHandle<Result<ExportedImage, PosterError>>,
}

impl ExportHandle {
    /// Returns true once the worker has produced a result.
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Blocks until the export completes.
    pub fn wait(self) -> Result<ExportedImage, PosterError> {
        self.worker.join().map_err(|_| PosterError::ExportPanicked)?
    }
}

/// Exports `snapshot` on a new thread.
///
/// The layout is moved into the worker, so the result always reflects the
/// poster as it was when this was called.
pub fn spawn_export<A>(adapter: A, snapshot: RenderableLayout) -> ExportHandle
where
    A: ExportAdapter + Send + 'static,
{
    debug!(store = %snapshot.header.name, "spawning poster export");
    let worker = thread::spawn(move || adapter.export(&snapshot));
    ExportHandle { worker }
}

// ============================================================================
// Tests
// ============================================================================
