//! Reading-order reconstruction.
//!
//! Shapes are banded into visual rows with an adaptive threshold
//! derived from the median shape height, rows run top to bottom and
//! left to right within a row. Two-column slides emit the whole left
//! group before the right group. Post passes mark continuation titles
//! and merge sub-threshold text fragments into the preceding block.

use strsim::normalized_levenshtein;
use unicode_normalization::UnicodeNormalization;

use crate::model::{Block, Shape};

use super::columns::ColumnAssignment;

/// Row threshold = median shape height × this factor.
pub const ROW_BAND_FACTOR: f32 = 1.3;
/// Lower clamp on the row threshold, in points.
pub const ROW_BAND_MIN_POINTS: f32 = 10.0;
/// Upper clamp on the row threshold, in points.
pub const ROW_BAND_MAX_POINTS: f32 = 100.0;
/// Fallback threshold when no shape reports a height.
pub const ROW_BAND_FALLBACK_POINTS: f32 = 22.0;
/// Normalized similarity above which two titles count as duplicates.
/// Calibration value carried over from the regression corpus.
pub const SIMILAR_TITLE_THRESHOLD: f64 = 0.92;

/// Order a slide's non-title shapes into one reading sequence.
///
/// Returns the ordered shapes and, for two-column layouts, the number
/// of shapes in the left group.
pub fn order_shapes<'a>(
    shapes: Vec<&'a Shape>,
    assignment: ColumnAssignment<'a>,
) -> (Vec<&'a Shape>, Option<usize>) {
    match assignment {
        ColumnAssignment::SingleColumn => (sort_by_visual_position(shapes), None),
        ColumnAssignment::TwoColumn { left, right, .. } => {
            let left = sort_by_visual_position(left);
            let left_len = left.len();
            let mut ordered = left;
            ordered.extend(sort_by_visual_position(right));
            (ordered, Some(left_len))
        }
    }
}

/// Sort shapes top-to-bottom with same-row ties broken left-to-right.
///
/// The top edge is the primary key. Shapes whose top edges fall within
/// the adaptive band are treated as one visual row; the row's anchor is
/// the running mean so chains of slightly offset shapes do not split
/// spuriously.
pub fn sort_by_visual_position(shapes: Vec<&Shape>) -> Vec<&Shape> {
    let threshold = adaptive_row_threshold(&shapes);

    let mut items: Vec<(f32, f32, &Shape)> = shapes
        .into_iter()
        .map(|s| (s.bounds.center_x(), s.bounds.y, s))
        .collect();
    items.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut rows: Vec<Vec<(f32, f32, &Shape)>> = Vec::new();
    let mut current: Vec<(f32, f32, &Shape)> = Vec::new();
    let mut current_y = 0.0f32;

    for item in items {
        if current.is_empty() {
            current_y = item.1;
            current.push(item);
            continue;
        }
        if (item.1 - current_y).abs() <= threshold {
            current.push(item);
            let n = current.len() as f32;
            current_y = (current_y * (n - 1.0) + item.1) / n;
        } else {
            current.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
            rows.push(std::mem::take(&mut current));
            current_y = item.1;
            current.push(item);
        }
    }
    if !current.is_empty() {
        current.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        rows.push(current);
    }

    rows.into_iter()
        .flatten()
        .map(|(_, _, shape)| shape)
        .collect()
}

/// Median shape height × `ROW_BAND_FACTOR`, clamped. Adapts the row
/// band to the deck's font scale instead of a fixed point value.
fn adaptive_row_threshold(shapes: &[&Shape]) -> f32 {
    let mut heights: Vec<f32> = shapes
        .iter()
        .map(|s| s.bounds.height)
        .filter(|h| *h > 0.0)
        .collect();
    if heights.is_empty() {
        return ROW_BAND_FALLBACK_POINTS;
    }
    heights.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = heights[heights.len() / 2];
    (median * ROW_BAND_FACTOR).clamp(ROW_BAND_MIN_POINTS, ROW_BAND_MAX_POINTS)
}

/// Fuzzy title equality: NFKC-normalized, case-insensitive
/// Levenshtein similarity against [`SIMILAR_TITLE_THRESHOLD`].
pub fn titles_similar(a: &str, b: &str) -> bool {
    let na: String = a.trim().nfkc().collect::<String>().to_lowercase();
    let nb: String = b.trim().nfkc().collect::<String>().to_lowercase();
    if na.is_empty() || nb.is_empty() {
        return false;
    }
    normalized_levenshtein(&na, &nb) >= SIMILAR_TITLE_THRESHOLD
}

/// Convert paragraphs that echo the preceding heading into
/// continuation headings. The emitter later drops them or renders a
/// "(cont.)" suffix depending on the caller's choice.
pub fn mark_continuation_titles(blocks: Vec<Block>, last_heading: &mut Option<String>) -> Vec<Block> {
    let mut result = Vec::with_capacity(blocks.len());
    for block in blocks {
        match block {
            Block::Heading { ref text, .. } => {
                *last_heading = Some(text.clone());
                result.push(block);
            }
            Block::Paragraph { ref runs } => {
                let text: String = runs.iter().map(|r| r.text.as_str()).collect();
                if let Some(prev) = last_heading.as_deref() {
                    if titles_similar(prev, &text) {
                        result.push(Block::Heading {
                            level: 1,
                            text: text.trim().to_string(),
                            continuation: true,
                        });
                        continue;
                    }
                }
                result.push(block);
            }
            other => result.push(other),
        }
    }
    result
}

/// Merge text blocks below `min_chars` into the preceding paragraph or
/// list item. Stray fragments with nothing suitable before them are
/// dropped as layout noise.
pub fn merge_small_blocks(blocks: Vec<Block>, min_chars: usize) -> Vec<Block> {
    if min_chars == 0 {
        return blocks;
    }

    let mut result: Vec<Block> = Vec::with_capacity(blocks.len());
    for block in blocks {
        let is_small = match &block {
            Block::Paragraph { runs } => {
                let chars: usize = runs.iter().map(|r| r.text.chars().count()).sum();
                chars > 0 && chars < min_chars
            }
            _ => false,
        };

        if !is_small {
            result.push(block);
            continue;
        }

        let runs = match block {
            Block::Paragraph { runs } => runs,
            _ => unreachable!(),
        };

        match result.last_mut() {
            Some(Block::Paragraph { runs: prev }) | Some(Block::ListItem { runs: prev, .. }) => {
                prev.push(crate::model::TextRun::new(" "));
                prev.extend(runs);
            }
            _ => {
                // Decorative fragment with no block to join.
                log::debug!(
                    "dropping {}-char text fragment below minimum block size",
                    runs.iter().map(|r| r.text.chars().count()).sum::<usize>()
                );
            }
        }
    }
    result
}
