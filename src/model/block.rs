//! Output block model: the normalized content units produced by the pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Slide;

/// A run of text with consistent styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Text styling
    pub style: TextStyle,
}

impl TextRun {
    /// Create a new text run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Create a strongly emphasized (bold) run.
    pub fn strong(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle {
                strong: true,
                ..Default::default()
            },
        }
    }

    /// Create an accented (italic/secondary emphasis) run.
    pub fn accent(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle {
                accent: true,
                ..Default::default()
            },
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Text styling properties carried by a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Strong emphasis (bold or a dark theme color)
    pub strong: bool,

    /// Accent emphasis (italic, underline, or an accent theme color)
    pub accent: bool,

    /// The run text is LaTeX math rather than literal text
    pub math: bool,

    /// Explicit RGB color
    pub color_rgb: Option<[u8; 3]>,

    /// Hyperlink target
    pub hyperlink: Option<String>,
}

/// Ordered or unordered list membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    /// Bulleted list
    Unordered,
    /// Numbered list
    Ordered,
}

/// A normalized unit of output content derived from one or more shapes.
///
/// A slide's output is an ordered sequence of blocks; the order equals
/// human visual reading order and the emitters match exhaustively over
/// this closed set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A slide or section heading.
    Heading {
        /// Heading level (1-based, before emitter demotion)
        level: u8,
        /// Heading text
        text: String,
        /// Marks a near-duplicate of the preceding heading
        continuation: bool,
    },

    /// A paragraph of styled runs.
    Paragraph {
        /// Text runs
        runs: Vec<TextRun>,
    },

    /// One list item.
    ListItem {
        /// Nesting level (0 = top level)
        level: u8,
        /// Ordered or unordered
        kind: ListKind,
        /// Item content
        runs: Vec<TextRun>,
        /// Explicit ordinal from the source, when it specified one
        start_at: Option<u32>,
    },

    /// A table as rows of rich-text cells.
    Table {
        /// Rows, each a list of cells, each a list of runs
        rows: Vec<Vec<Vec<TextRun>>>,
    },

    /// An image reference.
    ///
    /// `resource` names an entry in the deck's resource list; `None`
    /// means the image degraded to a placeholder (alt text preserved).
    Image {
        /// Resource id, or `None` for a placeholder
        resource: Option<String>,
        /// Alternative text
        alt_text: String,
    },

    /// An expanded embedded presentation.
    Embedded(EmbeddedReference),
}

impl Block {
    /// Create a paragraph from plain text.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph {
            runs: vec![TextRun::new(text)],
        }
    }

    /// Create a heading.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Block::Heading {
            level,
            text: text.into(),
            continuation: false,
        }
    }

    /// Plain text content of the block, without markup.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Heading { text, .. } => text.clone(),
            Block::Paragraph { runs } | Block::ListItem { runs, .. } => join_runs(runs),
            Block::Table { rows } => rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| join_runs(cell))
                        .collect::<Vec<_>>()
                        .join("\t")
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Image { alt_text, .. } => alt_text.clone(),
            Block::Embedded(reference) => reference
                .slides
                .iter()
                .map(|s| s.plain_text())
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }

    /// Check if this is a list item.
    pub fn is_list_item(&self) -> bool {
        matches!(self, Block::ListItem { .. })
    }
}

fn join_runs(runs: &[TextRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

/// An embedded presentation spliced into its parent's block sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedReference {
    /// Hierarchical locator of this recursion point
    pub path: PathId,

    /// Slides of the nested presentation, empty when expansion failed
    pub slides: Vec<Slide>,

    /// Why expansion produced no content, when it did not
    pub failure: Option<String>,
}

impl EmbeddedReference {
    /// Create a reference holding expanded slides.
    pub fn expanded(path: PathId, slides: Vec<Slide>) -> Self {
        Self {
            path,
            slides,
            failure: None,
        }
    }

    /// Create a placeholder reference for a failed expansion.
    pub fn placeholder(path: PathId, failure: impl Into<String>) -> Self {
        Self {
            path,
            slides: Vec::new(),
            failure: Some(failure.into()),
        }
    }
}

/// One segment of a [`PathId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathSegment {
    /// Slide n (1-based)
    Slide(u32),
    /// Embedded object n within its slide (1-based)
    Embed(u32),
}

/// Hierarchical locator identifying a slide and, recursively, its
/// embedded objects: `S<n>` optionally followed by `/E<n>` per nesting
/// level (e.g. `S2/E1`).
///
/// Assigned once at expansion time and used purely for traceability in
/// output, never for ownership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PathId {
    segments: Vec<PathSegment>,
}

impl PathId {
    /// The path of a top-level slide (1-based).
    pub fn slide(index: u32) -> Self {
        Self {
            segments: vec![PathSegment::Slide(index)],
        }
    }

    /// Extend with an embedded-object segment.
    pub fn child_embed(&self, index: u32) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Embed(index));
        Self { segments }
    }

    /// Extend with a nested slide segment.
    pub fn child_slide(&self, index: u32) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Slide(index));
        Self { segments }
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            match seg {
                PathSegment::Slide(n) => write!(f, "S{}", n)?,
                PathSegment::Embed(n) => write!(f, "E{}", n)?,
            }
        }
        Ok(())
    }
}
