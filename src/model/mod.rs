//! Data model for slide-deck content extraction.

mod block;
mod resource;
mod shape;
mod slide;

pub use block::{Block, EmbeddedReference, ListKind, PathId, PathSegment, TextRun, TextStyle};
pub use resource::Resource;
pub use shape::{
    Bounds, BulletKind, EmbeddedPayload, PictureData, PictureFormat, Shape, ShapeContent,
    ShapeKind, SourceParagraph, TableGrid,
};
pub use slide::{ColumnSpan, Metadata, Slide, SlideDeck};
