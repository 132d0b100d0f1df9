//! Madoko Markdown syntax rules.

use super::emitter::Syntax;
use super::markdown::{escape_markdown, markdown_table};
use super::options::TableHeaderMode;
use super::rgb_to_hex;
use crate::model::SlideDeck;

/// Width below which plain image tags are used instead of a captioned
/// figure block.
const FIGURE_WIDTH_PX: u32 = 500;

pub(crate) struct MadokoSyntax;

impl Syntax for MadokoSyntax {
    fn header(&self, out: &mut String, _deck: &SlideDeck) {
        out.push_str("[TOC]\n\n");
    }

    fn heading(&self, out: &mut String, level: u8, text: &str) {
        out.push_str(&"#".repeat(level as usize));
        out.push(' ');
        out.push_str(text);
        out.push_str("\n\n");
    }

    fn list_item(&self, out: &mut String, level: u8, text: &str, number: Option<u32>) {
        let indent = "  ".repeat(level as usize);
        match number {
            Some(n) => out.push_str(&format!("{}{}. {}\n", indent, n, text.trim())),
            None => out.push_str(&format!("{}* {}\n", indent, text.trim())),
        }
    }

    fn paragraph(&self, out: &mut String, text: &str) {
        out.push_str(text);
        out.push_str("\n\n");
    }

    fn image(&self, out: &mut String, path: &str, max_width: Option<u32>) {
        match max_width {
            None => out.push_str(&format!("<img src=\"{}\" />\n\n", path)),
            Some(w) if w < FIGURE_WIDTH_PX => {
                out.push_str(&format!("<img src=\"{}\" width={}px />\n\n", path, w))
            }
            Some(w) => {
                out.push_str("~ Figure {caption: image caption}\n");
                out.push_str(&format!("![]({}){{width:{}px;}}\n", path, w));
                out.push_str("~\n\n");
            }
        }
    }

    fn table(&self, out: &mut String, rows: &[Vec<String>], header_mode: TableHeaderMode) {
        markdown_table(out, rows, header_mode);
    }

    fn escape(&self, text: &str) -> String {
        escape_markdown(text)
    }

    fn accent(&self, text: &str) -> String {
        format!(" _{}_ ", text)
    }

    fn strong(&self, text: &str) -> String {
        format!(" __{}__ ", text)
    }

    fn colored(&self, text: &str, rgb: [u8; 3]) -> String {
        format!(" <span style=\"color:{}\">{}</span> ", rgb_to_hex(rgb), text)
    }

    fn hyperlink(&self, text: &str, url: &str) -> String {
        format!("[{}]({})", text, url)
    }
}
