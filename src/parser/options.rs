//! Parsing options and configuration.

use std::ops::RangeInclusive;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::error::Error;

/// Options for parsing slide decks.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Extract images (placeholders are emitted when disabled)
    pub extract_images: bool,

    /// Convert legacy vector images through the raster cascade
    pub wmf_conversion: bool,

    /// Extract speaker notes
    pub extract_notes: bool,

    /// Attempt multi-column layout detection per slide
    pub detect_columns: bool,

    /// Enable the numeric boundary-estimation fallback of the column
    /// detector (the slower path)
    pub numeric_column_fallback: bool,

    /// Minimum character count for a standalone text block; shorter
    /// blocks merge into the preceding block
    pub min_block_size: usize,

    /// Slide selection (which slides to convert)
    pub slides: SlideSelection,

    /// Cooperative cancellation flag, checked between slides
    pub cancel: Option<Arc<AtomicBool>>,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable image extraction.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.extract_images = extract;
        self
    }

    /// Enable or disable legacy-image raster conversion.
    pub fn with_wmf_conversion(mut self, convert: bool) -> Self {
        self.wmf_conversion = convert;
        self
    }

    /// Enable or disable notes extraction.
    pub fn with_notes(mut self, extract: bool) -> Self {
        self.extract_notes = extract;
        self
    }

    /// Enable or disable multi-column detection.
    pub fn with_columns(mut self, detect: bool) -> Self {
        self.detect_columns = detect;
        self
    }

    /// Enable or disable the numeric column fallback.
    pub fn with_numeric_fallback(mut self, enable: bool) -> Self {
        self.numeric_column_fallback = enable;
        self
    }

    /// Set the minimum standalone block size in characters.
    pub fn with_min_block_size(mut self, chars: usize) -> Self {
        self.min_block_size = chars;
        self
    }

    /// Set the slide selection.
    pub fn with_slides(mut self, slides: SlideSelection) -> Self {
        self.slides = slides;
        self
    }

    /// Attach a cancellation flag.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            extract_images: true,
            wmf_conversion: true,
            extract_notes: true,
            detect_columns: false,
            numeric_column_fallback: true,
            min_block_size: 15,
            slides: SlideSelection::All,
            cancel: None,
        }
    }
}

/// Slide selection for conversion.
#[derive(Debug, Clone, Default)]
pub enum SlideSelection {
    /// Convert all slides
    #[default]
    All,
    /// Convert a range of slides (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Convert specific slides (1-indexed)
    Slides(Vec<u32>),
}

impl SlideSelection {
    /// Check if a slide number should be included.
    pub fn includes(&self, slide: u32) -> bool {
        match self {
            SlideSelection::All => true,
            SlideSelection::Range(range) => range.contains(&slide),
            SlideSelection::Slides(slides) => slides.contains(&slide),
        }
    }

    /// Check if this selection filters anything at all.
    pub fn is_filtering(&self) -> bool {
        !matches!(self, SlideSelection::All)
    }

    /// Parse a selection string (e.g. "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self, Error> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(SlideSelection::All);
        }

        // Simple range (e.g. "1-10")
        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start: u32 = start
                    .trim()
                    .parse()
                    .map_err(|_| Error::InvalidSlideRange(s.to_string()))?;
                let end: u32 = end
                    .trim()
                    .parse()
                    .map_err(|_| Error::InvalidSlideRange(s.to_string()))?;
                return Ok(SlideSelection::Range(start..=end));
            }
        }

        // Comma-separated list with possible ranges
        let mut slides = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let start: u32 = start
                    .trim()
                    .parse()
                    .map_err(|_| Error::InvalidSlideRange(s.to_string()))?;
                let end: u32 = end
                    .trim()
                    .parse()
                    .map_err(|_| Error::InvalidSlideRange(s.to_string()))?;
                for n in start..=end {
                    if !slides.contains(&n) {
                        slides.push(n);
                    }
                }
            } else {
                let n: u32 = part
                    .parse()
                    .map_err(|_| Error::InvalidSlideRange(s.to_string()))?;
                if !slides.contains(&n) {
                    slides.push(n);
                }
            }
        }

        slides.sort();
        Ok(SlideSelection::Slides(slides))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new()
            .with_columns(true)
            .with_numeric_fallback(false)
            .with_min_block_size(4)
            .with_notes(false);

        assert!(options.detect_columns);
        assert!(!options.numeric_column_fallback);
        assert_eq!(options.min_block_size, 4);
        assert!(!options.extract_notes);
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert!(options.extract_images);
        assert!(options.wmf_conversion);
        assert!(!options.detect_columns);
        assert_eq!(options.min_block_size, 15);
    }

    #[test]
    fn test_slide_selection_includes() {
        assert!(SlideSelection::All.includes(7));

        let range = SlideSelection::Range(5..=10);
        assert!(!range.includes(4));
        assert!(range.includes(5));
        assert!(range.includes(10));
        assert!(!range.includes(11));

        let slides = SlideSelection::Slides(vec![1, 3, 5]);
        assert!(slides.includes(3));
        assert!(!slides.includes(2));
    }

    #[test]
    fn test_slide_selection_parse() {
        assert!(matches!(
            SlideSelection::parse("all").unwrap(),
            SlideSelection::All
        ));
        assert!(matches!(
            SlideSelection::parse("1-10").unwrap(),
            SlideSelection::Range(_)
        ));

        if let SlideSelection::Slides(slides) = SlideSelection::parse("1,3,5-7,10").unwrap() {
            assert_eq!(slides, vec![1, 3, 5, 6, 7, 10]);
        } else {
            panic!("Expected Slides variant");
        }

        assert!(SlideSelection::parse("x-y").is_err());
    }
}
