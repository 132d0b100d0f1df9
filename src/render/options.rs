//! Rendering options and configuration.

/// Options for rendering a parsed deck to a target syntax.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Maximum image width in pixels; switches image syntax to an
    /// HTML tag with a width constraint
    pub image_width: Option<u32>,

    /// Prefix for image paths in output (e.g. "img/")
    pub image_path_prefix: String,

    /// Emit color span tags for explicitly colored runs
    pub color_tags: bool,

    /// Escape characters that would read as markup
    pub escape_special_chars: bool,

    /// Separate slides with a horizontal rule
    pub slide_separators: bool,

    /// Annotate each slide with a slide-number comment
    pub slide_numbers: bool,

    /// Keep near-duplicate titles with a "(cont.)" suffix instead of
    /// dropping them
    pub keep_similar_titles: bool,

    /// Collapse runs of blank lines in the final output
    pub compress_blank_lines: bool,

    /// Table header policy
    pub table_header_mode: TableHeaderMode,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum image width.
    pub fn with_image_width(mut self, width: u32) -> Self {
        self.image_width = Some(width);
        self
    }

    /// Set the image path prefix.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.image_path_prefix = prefix.into();
        self
    }

    /// Enable or disable color tags.
    pub fn with_color_tags(mut self, enable: bool) -> Self {
        self.color_tags = enable;
        self
    }

    /// Enable or disable markup escaping.
    pub fn with_escaping(mut self, enable: bool) -> Self {
        self.escape_special_chars = enable;
        self
    }

    /// Enable or disable slide separators.
    pub fn with_slide_separators(mut self, enable: bool) -> Self {
        self.slide_separators = enable;
        self
    }

    /// Enable or disable slide-number annotations.
    pub fn with_slide_numbers(mut self, enable: bool) -> Self {
        self.slide_numbers = enable;
        self
    }

    /// Keep near-duplicate titles with a "(cont.)" suffix.
    pub fn with_similar_titles(mut self, keep: bool) -> Self {
        self.keep_similar_titles = keep;
        self
    }

    /// Enable or disable blank-line compression.
    pub fn with_blank_line_compression(mut self, enable: bool) -> Self {
        self.compress_blank_lines = enable;
        self
    }

    /// Set the table header policy.
    pub fn with_table_header_mode(mut self, mode: TableHeaderMode) -> Self {
        self.table_header_mode = mode;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            image_width: None,
            image_path_prefix: String::from("img/"),
            color_tags: true,
            escape_special_chars: true,
            slide_separators: false,
            slide_numbers: true,
            keep_similar_titles: false,
            compress_blank_lines: true,
            table_header_mode: TableHeaderMode::FirstRow,
        }
    }
}

/// How the first table row is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableHeaderMode {
    /// The first source row is the header row
    #[default]
    FirstRow,
    /// An empty header row is synthesized and every source row is data
    Empty,
}

impl TableHeaderMode {
    /// Parse the external value ("first-row" | "empty").
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "first-row" => Some(TableHeaderMode::FirstRow),
            "empty" => Some(TableHeaderMode::Empty),
            _ => None,
        }
    }
}
