//! Input shape model: the raw units supplied by the document source.
//!
//! Shapes are read-only views over the source document. The parsing
//! collaborator behind [`crate::parser::DeckSource`] builds them; the
//! pipeline only classifies and orders them.

use serde::{Deserialize, Serialize};

use super::TextRun;

/// Bounding box of a shape in slide coordinate points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Bounds {
    /// Create a new bounding box.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Horizontal center.
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Vertical center.
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// Kind tag assigned to a shape by the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// Free-standing text box
    TextBox,
    /// Designated title placeholder
    TitlePlaceholder,
    /// Designated body placeholder
    BodyPlaceholder,
    /// Table shape
    Table,
    /// Picture shape
    Picture,
    /// Embedded OLE object
    EmbeddedObject,
    /// Group of child shapes
    Group,
}

/// A positioned visual element on a slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    /// Kind tag from the source
    pub kind: ShapeKind,

    /// Bounding box in slide points
    pub bounds: Bounds,

    /// Z-order index from the source
    pub z_order: u32,

    /// Kind-specific content
    pub content: ShapeContent,
}

impl Shape {
    /// Create a text shape.
    pub fn text(kind: ShapeKind, bounds: Bounds, paragraphs: Vec<SourceParagraph>) -> Self {
        Self {
            kind,
            bounds,
            z_order: 0,
            content: ShapeContent::Text(paragraphs),
        }
    }

    /// Create a text box holding a single plain paragraph.
    pub fn text_box(bounds: Bounds, text: impl Into<String>) -> Self {
        Self::text(
            ShapeKind::TextBox,
            bounds,
            vec![SourceParagraph::plain(text)],
        )
    }

    /// Create a table shape.
    pub fn table(bounds: Bounds, grid: TableGrid) -> Self {
        Self {
            kind: ShapeKind::Table,
            bounds,
            z_order: 0,
            content: ShapeContent::Table(grid),
        }
    }

    /// Create a picture shape.
    pub fn picture(bounds: Bounds, data: PictureData) -> Self {
        Self {
            kind: ShapeKind::Picture,
            bounds,
            z_order: 0,
            content: ShapeContent::Picture(data),
        }
    }

    /// Create an embedded-object shape.
    pub fn embedded(bounds: Bounds, payload: EmbeddedPayload) -> Self {
        Self {
            kind: ShapeKind::EmbeddedObject,
            bounds,
            z_order: 0,
            content: ShapeContent::Embedded(payload),
        }
    }

    /// Create a group shape.
    pub fn group(bounds: Bounds, children: Vec<Shape>) -> Self {
        Self {
            kind: ShapeKind::Group,
            bounds,
            z_order: 0,
            content: ShapeContent::Group(children),
        }
    }

    /// Plain text of all paragraphs, empty for non-text shapes.
    pub fn plain_text(&self) -> String {
        match &self.content {
            ShapeContent::Text(paragraphs) => paragraphs
                .iter()
                .map(|p| p.plain_text())
                .collect::<Vec<_>>()
                .join("\n"),
            _ => String::new(),
        }
    }

    /// Total character count of the shape's text.
    pub fn text_len(&self) -> usize {
        match &self.content {
            ShapeContent::Text(paragraphs) => {
                paragraphs.iter().map(|p| p.plain_text().chars().count()).sum()
            }
            _ => 0,
        }
    }

    /// Largest paragraph font size, if any paragraph reports one.
    pub fn max_font_size(&self) -> Option<f32> {
        match &self.content {
            ShapeContent::Text(paragraphs) => paragraphs
                .iter()
                .filter_map(|p| p.font_size)
                .fold(None, |acc, s| Some(acc.map_or(s, |a: f32| a.max(s)))),
            _ => None,
        }
    }
}

/// Kind-specific shape content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ShapeContent {
    /// Text paragraphs with style and list properties
    Text(Vec<SourceParagraph>),
    /// Table cell grid
    Table(TableGrid),
    /// Image binary payload
    Picture(PictureData),
    /// Embedded OLE binary payload
    Embedded(EmbeddedPayload),
    /// Child shapes of a group
    Group(Vec<Shape>),
    /// Shape without extractable content
    Empty,
}

/// One paragraph as read from the source, before classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceParagraph {
    /// Styled runs
    pub runs: Vec<TextRun>,

    /// Indent level (0 = top level)
    pub level: u8,

    /// Bullet property resolved through the source's style inheritance
    pub bullet: BulletKind,

    /// Dominant font size in points, when the source reports one
    pub font_size: Option<f32>,
}

impl SourceParagraph {
    /// Create a plain paragraph with no bullet.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            runs: vec![TextRun::new(text)],
            level: 0,
            bullet: BulletKind::None,
            font_size: None,
        }
    }

    /// Create a bulleted paragraph.
    pub fn bulleted(text: impl Into<String>, level: u8) -> Self {
        Self {
            runs: vec![TextRun::new(text)],
            level,
            bullet: BulletKind::Char,
            font_size: None,
        }
    }

    /// Create an auto-numbered paragraph.
    pub fn numbered(text: impl Into<String>, level: u8, start_at: Option<u32>) -> Self {
        Self {
            runs: vec![TextRun::new(text)],
            level,
            bullet: BulletKind::AutoNumber { start_at },
            font_size: None,
        }
    }

    /// Set the dominant font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Plain text of the paragraph.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Check if the paragraph has no visible text.
    pub fn is_empty(&self) -> bool {
        self.plain_text().trim().is_empty()
    }
}

/// Bullet property of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BulletKind {
    /// No bullet
    None,
    /// Character bullet (unordered list)
    Char,
    /// Automatic numbering (ordered list)
    AutoNumber {
        /// Explicit start ordinal when the source specifies one other than 1
        start_at: Option<u32>,
    },
}

/// Table content as rows of rich-text cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableGrid {
    /// Rows, each a list of cells, each a list of runs
    pub rows: Vec<Vec<Vec<TextRun>>>,
}

impl TableGrid {
    /// Build a grid from plain-text cells.
    pub fn from_text(rows: Vec<Vec<&str>>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|c| vec![TextRun::new(c)]).collect())
                .collect(),
        }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Raster or vector image payload carried by a picture shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PictureData {
    /// Raw image bytes
    pub bytes: Vec<u8>,

    /// Format tag from the source part name or sniffing
    pub format: PictureFormat,

    /// Alternative text for accessibility
    pub alt_text: String,
}

/// Image payload format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PictureFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
    /// Legacy Windows Metafile vector format
    Wmf,
    /// Enhanced Metafile vector format
    Emf,
    Other,
}

impl PictureFormat {
    /// File extension without the dot.
    pub fn ext(&self) -> &'static str {
        match self {
            PictureFormat::Png => "png",
            PictureFormat::Jpeg => "jpg",
            PictureFormat::Gif => "gif",
            PictureFormat::Bmp => "bmp",
            PictureFormat::Tiff => "tiff",
            PictureFormat::Wmf => "wmf",
            PictureFormat::Emf => "emf",
            PictureFormat::Other => "bin",
        }
    }

    /// Legacy vector formats need the raster conversion cascade.
    pub fn is_legacy_vector(&self) -> bool {
        matches!(self, PictureFormat::Wmf | PictureFormat::Emf)
    }
}

/// Embedded OLE object payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedPayload {
    /// Raw payload bytes
    pub bytes: Vec<u8>,

    /// OLE program id (e.g. "PowerPoint.Show.12")
    pub prog_id: String,
}

impl EmbeddedPayload {
    /// Check if the payload claims to be a nested presentation.
    pub fn is_presentation(&self) -> bool {
        self.prog_id.contains("PowerPoint")
    }
}
