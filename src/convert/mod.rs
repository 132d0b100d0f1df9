//! Whole-job conversion: parse a source, render it to the selected
//! output format, and optionally write the text file plus its image
//! directory to disk.

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::model::{Block, Metadata, Resource, SlideDeck};
use crate::parser::{DeckParser, DeckSource, HostAutomation, ParseOptions};
use crate::raster::CascadeOptions;
use crate::render::{self, RenderOptions};

/// Output format for conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Markdown (default)
    #[default]
    Markdown,
    /// TiddlyWiki wikitext
    Wiki,
    /// Madoko Markdown
    Madoko,
    /// Quarto revealjs presentation
    Quarto,
}

impl OutputFormat {
    /// Conventional file extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Wiki => "tid",
            OutputFormat::Madoko => "mdk",
            OutputFormat::Quarto => "qmd",
        }
    }
}

/// Options for a whole conversion job.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Parsing options
    pub parse: ParseOptions,

    /// Rendering options
    pub render: RenderOptions,

    /// Image cascade options
    pub cascade: CascadeOptions,

    /// Target output format
    pub format: OutputFormat,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set parsing options.
    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// Set cascade options.
    pub fn with_cascade_options(mut self, cascade: CascadeOptions) -> Self {
        self.cascade = cascade;
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}

/// Result of a conversion job.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Rendered text content
    pub content: String,

    /// Source document metadata
    pub metadata: Metadata,

    /// Extracted image resources
    pub resources: Vec<Resource>,

    /// Extraction statistics
    pub stats: ExtractionStats,
}

impl ConvertResult {
    /// Content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }

    /// Write the text file and its image directory.
    ///
    /// Images land in `image_dir` when given, else in `img/` next to
    /// the output file, written in extraction order.
    pub fn write_to_disk(&self, output_path: &Path, image_dir: Option<&Path>) -> Result<()> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(output_path, &self.content)?;

        if self.resources.is_empty() {
            return Ok(());
        }

        let dir = match image_dir {
            Some(dir) => dir.to_path_buf(),
            None => output_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("img"),
        };
        std::fs::create_dir_all(&dir)?;
        for resource in &self.resources {
            std::fs::write(dir.join(&resource.file_name), &resource.bytes)?;
        }
        Ok(())
    }
}

/// Counts of what the conversion extracted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub slide_count: usize,
    pub heading_count: usize,
    pub paragraph_count: usize,
    pub list_item_count: usize,
    pub table_count: usize,
    pub image_count: usize,
    pub embedded_count: usize,
}

impl ExtractionStats {
    /// Walk a deck and tally its blocks, nested content included.
    pub fn collect(deck: &SlideDeck) -> Self {
        let mut stats = Self {
            slide_count: deck.slides.len(),
            ..Default::default()
        };
        for slide in &deck.slides {
            stats.tally(&slide.blocks);
        }
        stats
    }

    fn tally(&mut self, blocks: &[Block]) {
        for block in blocks {
            match block {
                Block::Heading { .. } => self.heading_count += 1,
                Block::Paragraph { .. } => self.paragraph_count += 1,
                Block::ListItem { .. } => self.list_item_count += 1,
                Block::Table { .. } => self.table_count += 1,
                Block::Image { .. } => self.image_count += 1,
                Block::Embedded(reference) => {
                    self.embedded_count += 1;
                    for slide in &reference.slides {
                        self.tally(&slide.blocks);
                    }
                }
            }
        }
    }
}

/// Convert a source document in one call.
pub fn convert(source: &dyn DeckSource, options: &ConvertOptions) -> Result<ConvertResult> {
    let parser = DeckParser::new(options.parse.clone(), options.cascade.clone());
    render_deck(parser.parse(source)?, options)
}

/// Convert with an attached host application for the legacy route,
/// interactive embedded extraction, and the final cascade strategy.
pub fn convert_with_host(
    source: &dyn DeckSource,
    host: Arc<dyn HostAutomation>,
    options: &ConvertOptions,
) -> Result<ConvertResult> {
    let parser = DeckParser::with_host(options.parse.clone(), options.cascade.clone(), host);
    render_deck(parser.parse(source)?, options)
}

fn render_deck(deck: SlideDeck, options: &ConvertOptions) -> Result<ConvertResult> {
    let content = match options.format {
        OutputFormat::Markdown => render::to_markdown(&deck, &options.render)?,
        OutputFormat::Wiki => render::to_wiki(&deck, &options.render)?,
        OutputFormat::Madoko => render::to_madoko(&deck, &options.render)?,
        OutputFormat::Quarto => render::to_quarto(&deck, &options.render)?,
    };
    let stats = ExtractionStats::collect(&deck);
    Ok(ConvertResult {
        content,
        metadata: deck.metadata,
        resources: deck.resources,
        stats,
    })
}
