//! # undeck
//!
//! Slide-deck content extraction library for Rust.
//!
//! This library reconstructs a linear, human-reading-order document
//! from the unordered tree of positioned shapes a slide deck really
//! is, then serializes it to Markdown, TiddlyWiki, Madoko, or Quarto.
//!
//! ## Quick Start
//!
//! ```no_run
//! use undeck::{convert, ConvertOptions, DeckSource};
//!
//! fn run(source: &dyn DeckSource) -> undeck::Result<()> {
//!     let result = convert(source, &ConvertOptions::default())?;
//!     println!("{}", result.content);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Reading order reconstruction**: title detection, visual row
//!   banding, two-column layout detection with a numeric fallback
//! - **Embedded presentations**: recursive expansion with stable
//!   `S<n>/E<n>` path identifiers and cycle detection
//! - **Legacy image cascade**: WMF/EMF conversion through an ordered
//!   strategy chain that degrades to placeholders, never aborts
//! - **Four output syntaxes**: Markdown, TiddlyWiki, Madoko, Quarto
//!
//! The container parsing library and any interactive host application
//! stay behind the [`DeckSource`] and [`HostAutomation`] traits; the
//! pipeline itself is synchronous, deterministic, and single-threaded
//! per conversion job.

pub mod convert;
pub mod error;
pub mod model;
pub mod parser;
pub mod raster;
pub mod render;

// Re-export commonly used types
pub use convert::{
    convert, convert_with_host, ConvertOptions, ConvertResult, ExtractionStats, OutputFormat,
};
pub use error::{Error, Result};
pub use model::{
    Block, Bounds, BulletKind, ColumnSpan, EmbeddedPayload, EmbeddedReference, ListKind, Metadata,
    PathId, PictureData, PictureFormat, Resource, Shape, ShapeContent, ShapeKind, Slide,
    SlideDeck, SourceParagraph, TableGrid, TextRun, TextStyle,
};
pub use parser::{
    DeckParser, DeckSource, HostAutomation, ParseOptions, PayloadDigest, SlideSelection,
    SlideShapes, SourceCapabilities,
};
pub use raster::{
    CascadeOptions, CascadeOutcome, ImageCascade, RasterExportOptions, RasterFormat, RasterRequest,
    RasterStrategy,
};
pub use render::{
    to_json, to_madoko, to_markdown, to_quarto, to_wiki, RenderOptions, TableHeaderMode,
};

use std::sync::Arc;

/// Builder for configuring and running conversions.
///
/// # Example
///
/// ```no_run
/// use undeck::{Undeck, OutputFormat, TableHeaderMode};
///
/// fn run(source: &dyn undeck::DeckSource) -> undeck::Result<String> {
///     let result = Undeck::new()
///         .with_columns(true)
///         .with_slide_separators(true)
///         .with_table_header_mode(TableHeaderMode::Empty)
///         .with_format(OutputFormat::Quarto)
///         .convert(source)?;
///     Ok(result.content)
/// }
/// ```
pub struct Undeck {
    options: ConvertOptions,
    host: Option<Arc<dyn HostAutomation>>,
}

impl Undeck {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: ConvertOptions::default(),
            host: None,
        }
    }

    /// Enable or disable image extraction.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.options.parse = self.options.parse.with_images(extract);
        self
    }

    /// Enable or disable legacy-image conversion.
    pub fn with_wmf_conversion(mut self, convert: bool) -> Self {
        self.options.parse = self.options.parse.with_wmf_conversion(convert);
        self
    }

    /// Enable or disable speaker-notes extraction.
    pub fn with_notes(mut self, extract: bool) -> Self {
        self.options.parse = self.options.parse.with_notes(extract);
        self
    }

    /// Enable or disable multi-column detection.
    pub fn with_columns(mut self, detect: bool) -> Self {
        self.options.parse = self.options.parse.with_columns(detect);
        self
    }

    /// Set the minimum standalone text block size.
    pub fn with_min_block_size(mut self, chars: usize) -> Self {
        self.options.parse = self.options.parse.with_min_block_size(chars);
        self
    }

    /// Set the slide selection.
    pub fn with_slides(mut self, slides: SlideSelection) -> Self {
        self.options.parse = self.options.parse.with_slides(slides);
        self
    }

    /// Set the maximum image width in the output.
    pub fn with_image_width(mut self, width: u32) -> Self {
        self.options.render = self.options.render.with_image_width(width);
        self
    }

    /// Enable or disable slide separators.
    pub fn with_slide_separators(mut self, enable: bool) -> Self {
        self.options.render = self.options.render.with_slide_separators(enable);
        self
    }

    /// Keep near-duplicate titles with a "(cont.)" suffix.
    pub fn with_similar_titles(mut self, keep: bool) -> Self {
        self.options.render = self.options.render.with_similar_titles(keep);
        self
    }

    /// Set the table header policy.
    pub fn with_table_header_mode(mut self, mode: TableHeaderMode) -> Self {
        self.options.render = self.options.render.with_table_header_mode(mode);
        self
    }

    /// Set cascade options.
    pub fn with_cascade_options(mut self, cascade: CascadeOptions) -> Self {
        self.options.cascade = cascade;
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.options.format = format;
        self
    }

    /// Attach a host application for the legacy route and the final
    /// cascade strategy.
    pub fn with_host(mut self, host: Arc<dyn HostAutomation>) -> Self {
        self.host = Some(host);
        self
    }

    /// Parse only, returning the deck model.
    pub fn parse(&self, source: &dyn DeckSource) -> Result<SlideDeck> {
        let parser = match &self.host {
            Some(host) => DeckParser::with_host(
                self.options.parse.clone(),
                self.options.cascade.clone(),
                host.clone(),
            ),
            None => DeckParser::new(self.options.parse.clone(), self.options.cascade.clone()),
        };
        parser.parse(source)
    }

    /// Parse and render in one call.
    pub fn convert(&self, source: &dyn DeckSource) -> Result<ConvertResult> {
        match &self.host {
            Some(host) => convert_with_host(source, host.clone(), &self.options),
            None => convert(source, &self.options),
        }
    }
}

impl Default for Undeck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chains() {
        let builder = Undeck::new()
            .with_columns(true)
            .with_min_block_size(4)
            .with_slide_separators(true)
            .with_format(OutputFormat::Wiki);

        assert!(builder.options.parse.detect_columns);
        assert_eq!(builder.options.parse.min_block_size, 4);
        assert!(builder.options.render.slide_separators);
        assert_eq!(builder.options.format, OutputFormat::Wiki);
    }

    #[test]
    fn test_builder_defaults() {
        let builder = Undeck::default();
        assert!(!builder.options.parse.detect_columns);
        assert_eq!(builder.options.format, OutputFormat::Markdown);
        assert!(builder.host.is_none());
    }
}
