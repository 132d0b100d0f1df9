//! Slide and deck-level types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Block, Resource};

/// One slide's ordered output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    /// Slide number (1-based)
    pub index: u32,

    /// Blocks in reading order: title first, then left column before
    /// right column for two-column layouts
    pub blocks: Vec<Block>,

    /// Column structure for emitters that can render it, `None` for
    /// single-column slides
    pub columns: Option<ColumnSpan>,

    /// Speaker notes
    pub notes: Vec<String>,
}

impl Slide {
    /// Create an empty slide.
    pub fn new(index: u32) -> Self {
        Self {
            index,
            blocks: Vec::new(),
            columns: None,
            notes: Vec::new(),
        }
    }

    /// Append a block.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Check if the slide carries a two-column layout.
    pub fn has_columns(&self) -> bool {
        self.columns.is_some()
    }

    /// Plain text of all blocks.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.plain_text())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Ranges into [`Slide::blocks`] describing a two-column layout.
///
/// The block order itself is already the reading order; the span only
/// lets column-aware emitters (Quarto) reconstruct the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpan {
    /// Number of leading blocks preceding the columns (the title)
    pub preface: usize,

    /// Number of blocks in the left column; the remainder is the right
    pub left: usize,
}

/// The converted document: slides plus extracted resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideDeck {
    /// Source document metadata
    pub metadata: Metadata,

    /// Slides in document order
    pub slides: Vec<Slide>,

    /// Extracted image resources, in extraction order
    pub resources: Vec<Resource>,
}

impl SlideDeck {
    /// Create an empty deck.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::default(),
            slides: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// Number of slides.
    pub fn slide_count(&self) -> u32 {
        self.slides.len() as u32
    }

    /// Look up a resource by id.
    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }

    /// Plain text of the whole deck.
    pub fn plain_text(&self) -> String {
        self.slides
            .iter()
            .map(|s| s.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for SlideDeck {
    fn default() -> Self {
        Self::new()
    }
}

/// Source document metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Creation date from the source container
    pub created: Option<DateTime<Utc>>,

    /// Last modification date from the source container
    pub modified: Option<DateTime<Utc>>,

    /// Total number of slides in the source
    pub slide_count: u32,
}

impl Metadata {
    /// Create metadata with a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }
}
