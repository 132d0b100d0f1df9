//! Serialization of the block model to the target text syntaxes.

mod emitter;
mod json;
mod madoko;
mod markdown;
mod options;
mod quarto;
mod wiki;

pub use json::to_json;
pub use options::{RenderOptions, TableHeaderMode};

use emitter::Emitter;

use crate::error::Result;
use crate::model::SlideDeck;

/// Render a deck to Markdown.
pub fn to_markdown(deck: &SlideDeck, options: &RenderOptions) -> Result<String> {
    Ok(Emitter::new(markdown::MarkdownSyntax, deck, options).render())
}

/// Render a deck to TiddlyWiki wikitext.
pub fn to_wiki(deck: &SlideDeck, options: &RenderOptions) -> Result<String> {
    Ok(Emitter::new(wiki::WikiSyntax, deck, options).render())
}

/// Render a deck to Madoko Markdown.
pub fn to_madoko(deck: &SlideDeck, options: &RenderOptions) -> Result<String> {
    Ok(Emitter::new(madoko::MadokoSyntax, deck, options).render())
}

/// Render a deck to a Quarto revealjs presentation.
pub fn to_quarto(deck: &SlideDeck, options: &RenderOptions) -> Result<String> {
    Ok(Emitter::new(quarto::QuartoSyntax, deck, options).render())
}

/// Collapse runs of blank lines into a single blank line, keeping the
/// trailing-newline state of the input.
pub(crate) fn compress_blank_lines(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");

    let mut lines: Vec<&str> = Vec::new();
    let mut last_was_blank = false;
    for line in normalized.split('\n') {
        if line.trim().is_empty() {
            if last_was_blank {
                continue;
            }
            lines.push("");
            last_was_blank = true;
        } else {
            lines.push(line);
            last_was_blank = false;
        }
    }

    let mut compressed = lines.join("\n");
    if normalized.ends_with('\n') && !compressed.ends_with('\n') {
        compressed.push('\n');
    }
    compressed
}

/// Percent-encode each path segment for a link target, keeping the
/// separators readable.
pub(crate) fn quote_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// "#RRGGBB" rendering of an RGB triple.
pub(crate) fn rgb_to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_blank_lines() {
        assert_eq!(compress_blank_lines("a\n\n\n\nb\n"), "a\n\nb\n");
        assert_eq!(compress_blank_lines("a\nb"), "a\nb");
        assert_eq!(compress_blank_lines("a\r\n\r\n\r\nb"), "a\n\nb");
    }

    #[test]
    fn test_quote_path() {
        assert_eq!(quote_path("img/my deck_1.png"), "img/my%20deck_1.png");
        assert_eq!(quote_path("img/plain.png"), "img/plain.png");
    }

    #[test]
    fn test_rgb_to_hex() {
        assert_eq!(rgb_to_hex([255, 0, 128]), "#FF0080");
    }
}
