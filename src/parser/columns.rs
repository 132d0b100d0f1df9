//! Column layout detection.
//!
//! Two tiers. The geometric tier scans for one clean vertical gap
//! between merged horizontal intervals, ignoring near-full-width
//! shapes. When geometry is ambiguous (no clean gap, several candidate
//! gaps, or a shape straddling the widest one), an optional numeric
//! tier estimates the boundary by minimizing the left/right assignment
//! cost over horizontal shape centers. Geometry alone fails on nudged
//! or overlapping placeholders; the numeric fit alone falsely splits
//! sparse single-column slides, so each tier gates the other.

use crate::model::Shape;

/// Vertical gap threshold as a fraction of slide width.
pub const VERTICAL_GAP_RATIO: f32 = 0.08;
/// Lower bound on the vertical gap threshold, in points.
pub const MIN_GAP_POINTS: f32 = 40.0;
/// Shapes at least this fraction of the slide width bridge columns and
/// are ignored by the gap scan.
pub const WIDE_SPAN_RATIO: f32 = 0.8;
/// Minimum shapes per column.
pub const MIN_SHAPES_PER_SIDE: usize = 2;
/// Minimum total text characters per column.
pub const MIN_SIDE_TEXT_CHARS: usize = 12;
/// Float tolerance in points.
pub const GAP_EPS: f32 = 0.5;
/// The numeric tier accepts a boundary only when the gap between the
/// two center clusters is at least this multiple of the larger
/// within-cluster spread.
pub const NUMERIC_SEPARATION_RATIO: f32 = 2.0;

/// Per-slide column assignment. Derived data, recomputed per slide and
/// discarded after reading-order construction.
#[derive(Debug)]
pub enum ColumnAssignment<'a> {
    /// Everything flows in one column.
    SingleColumn,
    /// A left and a right column split at `split_x`.
    TwoColumn {
        /// Midpoint of the separating gap
        split_x: f32,
        /// Shapes left of the split
        left: Vec<&'a Shape>,
        /// Shapes right of the split
        right: Vec<&'a Shape>,
    },
}

/// Decides 1-column vs 2-column layout for one slide.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDetector {
    numeric_fallback: bool,
}

/// Outcome of the geometric gap scan.
enum GapScan {
    /// One clean, validated cut.
    Cut(f32),
    /// No usable gap, or several candidates, or a straddler.
    Ambiguous,
    /// Too few shapes to ever split.
    Trivial,
}

impl ColumnDetector {
    /// Create a detector; `numeric_fallback` enables the slower tier.
    pub fn new(numeric_fallback: bool) -> Self {
        Self { numeric_fallback }
    }

    /// Return the column assignment for the non-title shapes of a slide.
    pub fn detect<'a>(&self, shapes: &[&'a Shape], slide_width: f32) -> ColumnAssignment<'a> {
        if shapes.len() < MIN_SHAPES_PER_SIDE * 2 {
            return ColumnAssignment::SingleColumn;
        }

        match self.geometric_cut(shapes, slide_width) {
            GapScan::Cut(split_x) => split_at(shapes, split_x),
            GapScan::Trivial => ColumnAssignment::SingleColumn,
            GapScan::Ambiguous => {
                if self.numeric_fallback {
                    match self.numeric_cut(shapes) {
                        Some(split_x) => split_at(shapes, split_x),
                        None => ColumnAssignment::SingleColumn,
                    }
                } else {
                    ColumnAssignment::SingleColumn
                }
            }
        }
    }

    /// Geometric tier: find one clean vertical gap.
    fn geometric_cut(&self, shapes: &[&Shape], slide_width: f32) -> GapScan {
        let narrow: Vec<&&Shape> = shapes
            .iter()
            .filter(|s| s.bounds.width / slide_width < WIDE_SPAN_RATIO)
            .collect();
        if narrow.len() < MIN_SHAPES_PER_SIDE * 2 {
            return GapScan::Trivial;
        }

        let threshold = (slide_width * VERTICAL_GAP_RATIO).max(MIN_GAP_POINTS);

        let mut sorted: Vec<&&Shape> = narrow.clone();
        sorted.sort_by(|a, b| {
            a.bounds
                .x
                .partial_cmp(&b.bounds.x)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // Merged-interval sweep collecting every qualifying gap.
        let mut candidates: Vec<(f32, f32)> = Vec::new(); // (gap width, midpoint)
        let mut right_edge = sorted[0].bounds.right();
        for shape in &sorted[1..] {
            let gap = shape.bounds.x - right_edge;
            if gap >= threshold {
                candidates.push((gap, (right_edge + shape.bounds.x) / 2.0));
            }
            right_edge = right_edge.max(shape.bounds.right());
        }

        if candidates.is_empty() {
            return GapScan::Ambiguous;
        }
        if candidates.len() > 1 {
            // Several plausible gutters: geometry alone cannot decide.
            return GapScan::Ambiguous;
        }

        let cut = candidates[0].1;

        // A shape crossing the cut invalidates it.
        for shape in &narrow {
            if shape.bounds.x < cut - GAP_EPS && cut + GAP_EPS < shape.bounds.right() {
                return GapScan::Ambiguous;
            }
        }

        if !sides_are_substantial(&narrow, cut) {
            return GapScan::Ambiguous;
        }

        GapScan::Cut(cut)
    }

    /// Numeric tier: exact two-cluster least-squares over the sorted
    /// horizontal centers, accepted only when the clusters separate
    /// clearly and both sides stay substantial.
    fn numeric_cut(&self, shapes: &[&Shape]) -> Option<f32> {
        let mut centers: Vec<f32> = shapes.iter().map(|s| s.bounds.center_x()).collect();
        centers.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let n = centers.len();
        if n < MIN_SHAPES_PER_SIDE * 2 {
            return None;
        }

        let prefix: Vec<f64> = std::iter::once(0.0)
            .chain(centers.iter().scan(0.0f64, |acc, &c| {
                *acc += c as f64;
                Some(*acc)
            }))
            .collect();
        let prefix_sq: Vec<f64> = std::iter::once(0.0)
            .chain(centers.iter().scan(0.0f64, |acc, &c| {
                *acc += (c as f64) * (c as f64);
                Some(*acc)
            }))
            .collect();

        let sse = |from: usize, to: usize| -> f64 {
            // Sum of squared deviations of centers[from..to] from their mean.
            let count = (to - from) as f64;
            let sum = prefix[to] - prefix[from];
            let sum_sq = prefix_sq[to] - prefix_sq[from];
            sum_sq - sum * sum / count
        };

        let mut best: Option<(usize, f64)> = None;
        for k in MIN_SHAPES_PER_SIDE..=(n - MIN_SHAPES_PER_SIDE) {
            let cost = sse(0, k) + sse(k, n);
            if best.map_or(true, |(_, b)| cost < b) {
                best = Some((k, cost));
            }
        }
        let (k, _) = best?;

        let left = &centers[..k];
        let right = &centers[k..];
        let between = right[0] - left[left.len() - 1];
        let spread = (left[left.len() - 1] - left[0]).max(right[right.len() - 1] - right[0]);

        let separated = if spread <= GAP_EPS {
            between >= MIN_GAP_POINTS
        } else {
            between >= NUMERIC_SEPARATION_RATIO * spread
        };
        if !separated {
            return None;
        }

        let cut = (left[left.len() - 1] + right[0]) / 2.0;
        let all: Vec<&&Shape> = shapes.iter().collect();
        if !sides_are_substantial(&all, cut) {
            return None;
        }
        Some(cut)
    }
}

/// Both sides must hold enough shapes and enough text to be real columns.
fn sides_are_substantial(shapes: &[&&Shape], cut: f32) -> bool {
    let mut left_count = 0;
    let mut right_count = 0;
    let mut left_chars = 0;
    let mut right_chars = 0;
    for shape in shapes {
        if shape.bounds.center_x() < cut {
            left_count += 1;
            left_chars += shape.text_len();
        } else {
            right_count += 1;
            right_chars += shape.text_len();
        }
    }
    left_count >= MIN_SHAPES_PER_SIDE
        && right_count >= MIN_SHAPES_PER_SIDE
        && left_chars >= MIN_SIDE_TEXT_CHARS
        && right_chars >= MIN_SIDE_TEXT_CHARS
}

/// Assign every shape to a side of the cut by its horizontal center.
fn split_at<'a>(shapes: &[&'a Shape], split_x: f32) -> ColumnAssignment<'a> {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for shape in shapes {
        if shape.bounds.center_x() < split_x {
            left.push(*shape);
        } else {
            right.push(*shape);
        }
    }
    ColumnAssignment::TwoColumn {
        split_x,
        left,
        right,
    }
}
