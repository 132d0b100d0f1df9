//! Extracted image resources referenced by image blocks.

use serde::{Deserialize, Serialize};

/// One extracted (and possibly converted) image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Stable id referenced by [`crate::model::Block::Image`]
    pub id: String,

    /// File name used when writing the image directory
    pub file_name: String,

    /// Image bytes
    #[serde(skip_serializing, default)]
    pub bytes: Vec<u8>,

    /// Alternative text carried over from the source shape
    pub alt_text: String,
}

impl Resource {
    /// Create a resource.
    pub fn new(id: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            bytes,
            alt_text: String::new(),
        }
    }

    /// Set the alternative text.
    pub fn with_alt_text(mut self, alt: impl Into<String>) -> Self {
        self.alt_text = alt.into();
        self
    }

    /// Size of the payload in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_basics() {
        let r = Resource::new("img-0001", "deck_1.png", vec![1, 2, 3]).with_alt_text("chart");
        assert_eq!(r.len(), 3);
        assert!(!r.is_empty());
        assert_eq!(r.alt_text, "chart");
    }
}
