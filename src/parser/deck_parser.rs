//! Per-slide pipeline orchestration.
//!
//! `DeckParser` drives classification, column detection, and reading
//! order over each slide of a source, routing pictures through the
//! raster cascade and embedded objects through recursive expansion.
//! The pipeline never fails a slide: degraded blocks and warnings are
//! preferred over aborting.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::{
    Block, ColumnSpan, PathId, PictureData, Resource, Shape, Slide, SlideDeck,
};
use crate::raster::{CascadeOptions, CascadeOutcome, ImageCascade, RasterRequest};

use super::classify::{
    classify, detect_title, flatten_groups, text_blocks_from_paragraphs, text_blocks_from_shape,
    ShapeRole, SlideContext,
};
use super::columns::{ColumnAssignment, ColumnDetector};
use super::options::{ParseOptions, SlideSelection};
use super::order::{mark_continuation_titles, merge_small_blocks, order_shapes};
use super::source::{DeckSource, HostAutomation, PayloadDigest, SlideShapes};

/// Converts a [`DeckSource`] into a [`SlideDeck`].
pub struct DeckParser {
    pub(crate) options: ParseOptions,
    pub(crate) cascade: ImageCascade,
    pub(crate) host: Option<Arc<dyn HostAutomation>>,
    /// Digests of every payload currently open, for cycle detection.
    pub(crate) stack: Vec<PayloadDigest>,
    pub(crate) resources: Vec<Resource>,
    picture_seq: u32,
    deck_stem: String,
}

impl DeckParser {
    /// Create a parser without host automation.
    pub fn new(options: ParseOptions, cascade_options: CascadeOptions) -> Self {
        Self::build(options, cascade_options, None)
    }

    /// Create a parser with an attached host application.
    pub fn with_host(
        options: ParseOptions,
        cascade_options: CascadeOptions,
        host: Arc<dyn HostAutomation>,
    ) -> Self {
        Self::build(options, cascade_options, Some(host))
    }

    fn build(
        options: ParseOptions,
        cascade_options: CascadeOptions,
        host: Option<Arc<dyn HostAutomation>>,
    ) -> Self {
        Self {
            options,
            cascade: ImageCascade::new(cascade_options, host.clone()),
            host,
            stack: Vec::new(),
            resources: Vec::new(),
            picture_seq: 0,
            deck_stem: String::from("deck"),
        }
    }

    /// Convert the whole source document.
    pub fn parse(mut self, source: &dyn DeckSource) -> Result<SlideDeck> {
        let mut metadata = source.metadata();
        metadata.slide_count = source.slide_count();
        self.deck_stem = sanitize_stem(metadata.title.as_deref().unwrap_or("deck"));

        let caps = source.capabilities();
        let mut selection = self.options.slides.clone();
        if selection.is_filtering() && !caps.slide_filter {
            log::warn!("slide filter is not supported by this source, converting all slides");
            selection = SlideSelection::All;
        }

        self.stack.push(source.digest());

        let mut deck = SlideDeck::new();
        deck.metadata = metadata;

        for index in 1..=source.slide_count() {
            self.check_cancelled()?;
            if !selection.includes(index) {
                continue;
            }

            match source.slide(index) {
                Ok(shapes) => {
                    let slide = self.process_slide(source, shapes, PathId::slide(index));
                    deck.slides.push(slide);
                }
                Err(e) => {
                    log::warn!("failed to read slide {}, emitting empty slide: {}", index, e);
                    deck.slides.push(Slide::new(index));
                }
            }
        }

        self.stack.pop();
        deck.resources = std::mem::take(&mut self.resources);
        Ok(deck)
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.options
            .cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }
        Ok(())
    }

    /// Run the full per-slide pipeline: classify, detect columns,
    /// order, convert shapes to blocks, post-process.
    pub(crate) fn process_slide(
        &mut self,
        source: &dyn DeckSource,
        shapes: SlideShapes,
        slide_path: PathId,
    ) -> Slide {
        let mut slide = Slide::new(shapes.index);

        if self.options.extract_notes && source.capabilities().notes {
            slide.notes = shapes
                .notes
                .iter()
                .filter(|n| !n.trim().is_empty())
                .cloned()
                .collect();
        }

        let flat = flatten_groups(&shapes.shapes);
        if flat.is_empty() {
            return slide;
        }
        let ctx = SlideContext::from_shapes(&flat, shapes.width, shapes.height);

        // Title first, remaining paragraphs of the title shape become
        // leading body content.
        let title_idx = detect_title(&flat, &ctx);
        let mut preface: Vec<Block> = Vec::new();
        if let Some((idx, _)) = title_idx {
            if let crate::model::ShapeContent::Text(paragraphs) = &flat[idx].content {
                if let Some(pos) = paragraphs.iter().position(|p| !p.is_empty()) {
                    let text = paragraphs[pos].plain_text().trim().to_string();
                    preface.push(Block::heading(1, text));
                    preface.extend(text_blocks_from_paragraphs(&paragraphs[pos + 1..]));
                }
            }
        }

        let others: Vec<&Shape> = flat
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != title_idx.map(|(idx, _)| idx))
            .map(|(_, s)| *s)
            .collect();

        let assignment = if self.options.detect_columns {
            ColumnDetector::new(self.options.numeric_column_fallback)
                .detect(&others, shapes.width)
        } else {
            ColumnAssignment::SingleColumn
        };

        let (ordered, left_shapes) = order_shapes(others, assignment);

        let mut left_blocks: Vec<Block> = Vec::new();
        let mut right_blocks: Vec<Block> = Vec::new();
        let mut embed_seq = 0u32;

        for (i, shape) in ordered.iter().enumerate() {
            let blocks = self.shape_blocks(source, shape, &ctx, &slide_path, shapes.index, &mut embed_seq);
            match left_shapes {
                Some(left_len) if i >= left_len => right_blocks.extend(blocks),
                _ => left_blocks.extend(blocks),
            }
        }

        // Post passes run per column segment so merges never cross the
        // column boundary; the heading context flows through in order.
        let min = self.options.min_block_size;
        let mut last_heading = None;
        let preface = merge_small_blocks(
            mark_continuation_titles(preface, &mut last_heading),
            min,
        );
        let left_blocks = merge_small_blocks(
            mark_continuation_titles(left_blocks, &mut last_heading),
            min,
        );
        let right_blocks = merge_small_blocks(
            mark_continuation_titles(right_blocks, &mut last_heading),
            min,
        );

        if left_shapes.is_some() && !left_blocks.is_empty() && !right_blocks.is_empty() {
            slide.columns = Some(ColumnSpan {
                preface: preface.len(),
                left: left_blocks.len(),
            });
        }

        slide.blocks = preface;
        slide.blocks.extend(left_blocks);
        slide.blocks.extend(right_blocks);
        slide
    }

    fn shape_blocks(
        &mut self,
        source: &dyn DeckSource,
        shape: &Shape,
        ctx: &SlideContext,
        slide_path: &PathId,
        slide_index: u32,
        embed_seq: &mut u32,
    ) -> Vec<Block> {
        match classify(shape, ctx) {
            // A runner-up title candidate is just body text.
            ShapeRole::Body | ShapeRole::Title { .. } => text_blocks_from_shape(shape),
            ShapeRole::Table => match &shape.content {
                crate::model::ShapeContent::Table(grid) => vec![Block::Table {
                    rows: grid.rows.clone(),
                }],
                _ => Vec::new(),
            },
            ShapeRole::Picture => match &shape.content {
                crate::model::ShapeContent::Picture(data) => {
                    vec![self.picture_block(shape, data, slide_index)]
                }
                _ => Vec::new(),
            },
            ShapeRole::Embedded => match &shape.content {
                crate::model::ShapeContent::Embedded(payload) => {
                    *embed_seq += 1;
                    let path = slide_path.child_embed(*embed_seq);
                    vec![self.expand_embedded(source, payload, path)]
                }
                _ => Vec::new(),
            },
            ShapeRole::Skip => Vec::new(),
        }
    }

    /// Extract one picture, routing legacy vector payloads through the
    /// cascade. Failures degrade to a placeholder that keeps the alt
    /// text and the block's position.
    fn picture_block(&mut self, shape: &Shape, data: &PictureData, slide_index: u32) -> Block {
        if !self.options.extract_images {
            return Block::Image {
                resource: None,
                alt_text: data.alt_text.clone(),
            };
        }

        self.picture_seq += 1;
        let seq = self.picture_seq;
        let id = format!("img-{:04}", seq);

        if data.format.is_legacy_vector() && self.options.wmf_conversion {
            let request = RasterRequest {
                payload: &data.bytes,
                digest: PayloadDigest::of(&data.bytes),
                slide_index,
                bounds: shape.bounds,
            };
            match self.cascade.convert(&request) {
                CascadeOutcome::Converted { format, bytes, .. } => {
                    let file_name = format!("{}_{}.{}", self.deck_stem, seq, format.ext());
                    self.resources.push(
                        Resource::new(&id, file_name, bytes).with_alt_text(&data.alt_text),
                    );
                    Block::Image {
                        resource: Some(id),
                        alt_text: data.alt_text.clone(),
                    }
                }
                CascadeOutcome::Exhausted => Block::Image {
                    resource: None,
                    alt_text: data.alt_text.clone(),
                },
            }
        } else {
            let file_name = format!("{}_{}.{}", self.deck_stem, seq, data.format.ext());
            self.resources.push(
                Resource::new(&id, file_name, data.bytes.clone()).with_alt_text(&data.alt_text),
            );
            Block::Image {
                resource: Some(id),
                alt_text: data.alt_text.clone(),
            }
        }
    }
}

/// Reduce a title to a safe file-name stem for extracted images.
fn sanitize_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .take(48)
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let stem = stem.trim_matches('_').to_string();
    if stem.is_empty() {
        String::from("deck")
    } else {
        stem
    }
}
