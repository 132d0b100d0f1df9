//! Quarto revealjs syntax rules.

use super::emitter::Syntax;
use super::markdown::{escape_markdown, markdown_table};
use super::options::TableHeaderMode;
use super::{quote_path, rgb_to_hex};
use crate::model::SlideDeck;

const QUARTO_HEADER: &str = r#"---
title: "Presentation Title"
author: "Author"
format:
  revealjs:
    slide-number: c/t
    width: 1600
    height: 900
    incremental: true
    theme: [simple]
---
"#;

pub(crate) struct QuartoSyntax;

impl Syntax for QuartoSyntax {
    fn header(&self, out: &mut String, _deck: &SlideDeck) {
        out.push_str(QUARTO_HEADER);
        out.push('\n');
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
            None => out.push_str(&format!("![]({})\n\n", quote_path(path))),
            Some(w) => out.push_str(&format!(
                "<img src=\"{}\" style=\"max-width:{}px;\" />\n\n",
                path, w
            )),
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

    fn supports_columns(&self) -> bool {
        true
    }

    fn columns_open(&self, out: &mut String) {
        out.push_str(":::: {.columns}\n\n");
    }

    fn column_open(&self, out: &mut String, width_pct: u32) {
        out.push_str(&format!("::: {{.column width=\"{}%\"}}\n\n", width_pct));
    }

    fn column_close(&self, out: &mut String) {
        out.push_str(":::\n\n");
    }

    fn columns_close(&self, out: &mut String) {
        out.push_str("::::\n\n");
    }

    fn notes_open(&self, out: &mut String) {
        out.push_str("::: {.notes}\n\n");
    }

    fn notes_close(&self, out: &mut String) {
        out.push_str(":::\n\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SlideDeck;

    #[test]
    fn test_quarto_header_is_revealjs() {
        let mut out = String::new();
        QuartoSyntax.header(&mut out, &SlideDeck::new());
        assert!(out.contains("revealjs"));
        assert!(out.starts_with("---\n"));
    }

    #[test]
    fn test_quarto_column_fences() {
        let mut out = String::new();
        QuartoSyntax.columns_open(&mut out);
        QuartoSyntax.column_open(&mut out, 50);
        QuartoSyntax.column_close(&mut out);
        QuartoSyntax.columns_close(&mut out);
        assert_eq!(
            out,
            ":::: {.columns}\n\n::: {.column width=\"50%\"}\n\n:::\n\n::::\n\n"
        );
    }
}
