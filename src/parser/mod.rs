//! Slide parsing pipeline: classification, column detection, reading
//! order, and embedded-object expansion over an abstract document
//! source.

mod classify;
mod columns;
mod deck_parser;
mod expand;
mod options;
mod order;
mod source;

pub use classify::{
    classify, detect_title, flatten_groups, text_blocks_from_paragraphs, text_blocks_from_shape,
    ShapeRole, SlideContext,
};
pub use columns::{ColumnAssignment, ColumnDetector};
pub use deck_parser::DeckParser;
pub use options::{ParseOptions, SlideSelection};
pub use order::{sort_by_visual_position, titles_similar};
pub use source::{
    DeckSource, HostAutomation, PayloadDigest, SlideShapes, SourceCapabilities,
};
