//! Source document abstraction layer.
//!
//! Provides trait-based interfaces isolating the concrete container
//! parsing library and the interactive host application from the
//! classification and layout logic.

use md5::{Digest, Md5};

use crate::error::Result;
use crate::model::{Bounds, EmbeddedPayload, Metadata, Shape};
use crate::raster::RasterExportOptions;

/// Stable identity of a document payload, used for cycle detection in
/// embedded-object expansion and for the cascade's per-payload cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PayloadDigest([u8; 16]);

impl PayloadDigest {
    /// Digest of a byte payload.
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = Md5::new();
        hasher.update(bytes);
        Self(hasher.finalize().into())
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

/// The shape tree of one slide as supplied by the source.
#[derive(Debug, Clone)]
pub struct SlideShapes {
    /// Slide number (1-based)
    pub index: u32,

    /// Slide width in points
    pub width: f32,

    /// Slide height in points
    pub height: f32,

    /// Shapes in source order
    pub shapes: Vec<Shape>,

    /// Speaker notes attached to the slide
    pub notes: Vec<String>,
}

impl SlideShapes {
    /// Create an empty slide of the given size.
    pub fn new(index: u32, width: f32, height: f32) -> Self {
        Self {
            index,
            width,
            height,
            shapes: Vec::new(),
            notes: Vec::new(),
        }
    }
}

/// Structural features a source can honor.
///
/// The legacy binary route cannot seek to individual slides or expose
/// notes; options targeting a missing capability are warned about and
/// ignored rather than failing the job.
#[derive(Debug, Clone, Copy)]
pub struct SourceCapabilities {
    /// Slide filtering is honored
    pub slide_filter: bool,

    /// Speaker notes are available
    pub notes: bool,
}

impl Default for SourceCapabilities {
    fn default() -> Self {
        Self {
            slide_filter: true,
            notes: true,
        }
    }
}

/// Abstract interface for slide-deck document access.
///
/// Implementations wrap the container parsing library (or the host
/// application for the legacy route) and supply shape trees per slide
/// without exposing any concrete parser types.
pub trait DeckSource {
    /// Source document metadata.
    fn metadata(&self) -> Metadata;

    /// Total number of slides.
    fn slide_count(&self) -> u32;

    /// Return the shape tree of one slide (1-based).
    fn slide(&self, index: u32) -> Result<SlideShapes>;

    /// Structural capabilities of this source.
    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::default()
    }

    /// Stable identity of the underlying payload.
    fn digest(&self) -> PayloadDigest;

    /// Open a nested presentation from an embedded payload without any
    /// interactive fallback.
    fn open_embedded(&self, payload: &EmbeddedPayload) -> Result<Box<dyn DeckSource>>;
}

/// Capability interface over an out-of-process host application.
///
/// Used for the legacy-format route, for embedded payloads that refuse
/// to open in a low-interaction mode, and as the final strategy of the
/// image conversion cascade. The core never depends on a specific
/// automation transport.
pub trait HostAutomation {
    /// Open a document payload in the host application.
    fn open_document(&self, payload: &[u8]) -> Result<Box<dyn DeckSource>>;

    /// Export the area of one shape on a slide to raster bytes.
    fn export_shape_raster(
        &self,
        slide_index: u32,
        bounds: Bounds,
        options: &RasterExportOptions,
    ) -> Result<Vec<u8>>;

    /// Release host resources.
    fn close(&self);
}
