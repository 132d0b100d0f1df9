//! Shape classification: semantic role tagging and title detection.
//!
//! Classification is a pure function of a shape and its slide context.
//! Title detection prefers the designated title placeholder; without
//! one, every text shape is scored by vertical position, font size
//! relative to the slide median, and text length, and the best
//! candidate wins only above a minimum score.

use crate::model::{
    Block, BulletKind, ListKind, Shape, ShapeContent, ShapeKind, SourceParagraph,
};

// Title scoring weights. These are calibration values tuned against the
// regression corpus, not guarantees; adjust them there, not inline.
pub const TITLE_SIZE_WEIGHT: f32 = 10.0;
pub const TITLE_TOP_PENALTY: f32 = 0.2;
pub const TITLE_LENGTH_PENALTY: f32 = 0.5;
pub const TITLE_TOP_BAND_POINTS: f32 = 120.0;
pub const TITLE_TOP_BONUS: f32 = 15.0;
pub const TITLE_MIN_SCORE: f32 = 40.0;

/// Candidates longer than this are never titles.
pub const TITLE_MAX_CHARS: usize = 120;

/// Fallback font size when the source reports none.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Semantic role assigned to a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeRole {
    /// Title candidate with its confidence score
    Title { score: f32 },
    /// Text-bearing body shape (paragraphs and lists)
    Body,
    /// Table shape
    Table,
    /// Picture shape
    Picture,
    /// Embedded OLE object
    Embedded,
    /// Nothing extractable
    Skip,
}

/// Per-slide context consumed by the classifier.
#[derive(Debug, Clone, Copy)]
pub struct SlideContext {
    /// Total shape count after group flattening
    pub shape_count: usize,
    /// Slide width in points
    pub width: f32,
    /// Slide height in points
    pub height: f32,
    /// Median paragraph font size across the slide
    pub median_font_size: f32,
}

impl SlideContext {
    /// Build the context from the flattened shapes of one slide.
    pub fn from_shapes(shapes: &[&Shape], width: f32, height: f32) -> Self {
        let mut sizes: Vec<f32> = shapes
            .iter()
            .filter_map(|s| match &s.content {
                ShapeContent::Text(paragraphs) => Some(paragraphs),
                _ => None,
            })
            .flatten()
            .filter_map(|p| p.font_size)
            .collect();

        let median_font_size = if sizes.is_empty() {
            DEFAULT_FONT_SIZE
        } else {
            sizes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            sizes[sizes.len() / 2]
        };

        Self {
            shape_count: shapes.len(),
            width,
            height,
            median_font_size,
        }
    }
}

/// Recursively flatten group shapes into a flat list.
pub fn flatten_groups(shapes: &[Shape]) -> Vec<&Shape> {
    let mut result = Vec::new();
    for shape in shapes {
        match &shape.content {
            ShapeContent::Group(children) => result.extend(flatten_groups(children)),
            _ => result.push(shape),
        }
    }
    result
}

/// Classify one shape against its slide context.
pub fn classify(shape: &Shape, ctx: &SlideContext) -> ShapeRole {
    match &shape.content {
        ShapeContent::Table(grid) if grid.row_count() > 0 => ShapeRole::Table,
        ShapeContent::Table(_) => ShapeRole::Skip,
        ShapeContent::Picture(_) => ShapeRole::Picture,
        ShapeContent::Embedded(_) => ShapeRole::Embedded,
        ShapeContent::Text(paragraphs) => {
            if paragraphs.iter().all(|p| p.is_empty()) {
                ShapeRole::Skip
            } else if let Some(score) = title_score(shape, ctx) {
                ShapeRole::Title { score }
            } else {
                ShapeRole::Body
            }
        }
        ShapeContent::Group(_) | ShapeContent::Empty => ShapeRole::Skip,
    }
}

/// Score a shape as a title candidate, `None` when it cannot be one.
///
/// The designated title placeholder always qualifies with maximum
/// confidence. Other text shapes qualify when their first paragraph is
/// short, unbulleted prose; the score combines "near the top",
/// "larger than the slide median font", and "brief".
pub fn title_score(shape: &Shape, ctx: &SlideContext) -> Option<f32> {
    let paragraphs = match &shape.content {
        ShapeContent::Text(paragraphs) => paragraphs,
        _ => return None,
    };

    if shape.kind == ShapeKind::TitlePlaceholder {
        return Some(f32::MAX);
    }

    let first = paragraphs.iter().find(|p| !p.is_empty())?;
    if first.bullet != BulletKind::None {
        return None;
    }

    let text = first.plain_text();
    let text = text.trim();
    let chars = text.chars().count();
    if chars == 0 || chars > TITLE_MAX_CHARS {
        return None;
    }
    // Bare page numbers are not titles.
    if text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let size = first.font_size.unwrap_or(ctx.median_font_size);
    let mut score = TITLE_SIZE_WEIGHT * (size - ctx.median_font_size)
        - TITLE_TOP_PENALTY * shape.bounds.y
        - TITLE_LENGTH_PENALTY * chars as f32;
    if shape.bounds.y <= TITLE_TOP_BAND_POINTS {
        score += TITLE_TOP_BONUS;
    }
    Some(score)
}

/// Pick the slide's title shape from the flattened list.
///
/// Returns the shape index and its confidence, or `None` for a
/// titleless slide.
pub fn detect_title(shapes: &[&Shape], ctx: &SlideContext) -> Option<(usize, f32)> {
    // Designated placeholder wins outright.
    if let Some(idx) = shapes.iter().position(|s| {
        s.kind == ShapeKind::TitlePlaceholder && !s.plain_text().trim().is_empty()
    }) {
        return Some((idx, f32::MAX));
    }

    let mut best: Option<(usize, f32)> = None;
    for (idx, shape) in shapes.iter().enumerate() {
        if let Some(score) = title_score(shape, ctx) {
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((idx, score));
            }
        }
    }

    best.filter(|(_, score)| *score >= TITLE_MIN_SCORE)
}

/// Convert a body shape's paragraphs into paragraph and list blocks.
pub fn text_blocks_from_shape(shape: &Shape) -> Vec<Block> {
    match &shape.content {
        ShapeContent::Text(paragraphs) => text_blocks_from_paragraphs(paragraphs),
        _ => Vec::new(),
    }
}

/// Convert a paragraph slice into paragraph and list blocks.
pub fn text_blocks_from_paragraphs(paragraphs: &[SourceParagraph]) -> Vec<Block> {
    let mut blocks = Vec::new();
    for para in paragraphs {
        if para.is_empty() {
            continue;
        }
        blocks.push(paragraph_block(para));
    }

    indent_lists_after_paragraph(blocks)
}

fn paragraph_block(para: &SourceParagraph) -> Block {
    match para.bullet {
        BulletKind::Char => Block::ListItem {
            level: para.level,
            kind: ListKind::Unordered,
            runs: para.runs.clone(),
            start_at: None,
        },
        BulletKind::AutoNumber { start_at } => Block::ListItem {
            level: para.level,
            kind: ListKind::Ordered,
            runs: para.runs.clone(),
            start_at,
        },
        BulletKind::None => Block::Paragraph {
            runs: para.runs.clone(),
        },
    }
}

/// Within one shape, indent level-0 list runs that directly follow a
/// paragraph one step, so they read as the paragraph's sub-items.
/// Groups whose minimum level is already > 0 are left alone.
fn indent_lists_after_paragraph(blocks: Vec<Block>) -> Vec<Block> {
    if blocks.len() < 2 {
        return blocks;
    }

    let mut result = blocks;
    let mut i = 0;
    while i < result.len() {
        if !matches!(result[i], Block::Paragraph { .. }) {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        while j < result.len() && result[j].is_list_item() {
            j += 1;
        }

        let run = &result[i + 1..j];
        let min_level = run
            .iter()
            .filter_map(|b| match b {
                Block::ListItem { level, .. } => Some(*level),
                _ => None,
            })
            .min();

        if min_level == Some(0) {
            for block in &mut result[i + 1..j] {
                if let Block::ListItem { level, .. } = block {
                    *level += 1;
                }
            }
        }
        i = j;
    }
    result
}
