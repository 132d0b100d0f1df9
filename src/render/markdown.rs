//! Markdown syntax rules.

use once_cell::sync::Lazy;
use regex::Regex;

use super::emitter::Syntax;
use super::options::TableHeaderMode;
use super::{quote_path, rgb_to_hex};

static ESC_MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"([\\*`!_{}\[\]()#+.-])").unwrap());
static ESC_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Escape characters that would read as Markdown or HTML markup.
pub(crate) fn escape_markdown(text: &str) -> String {
    let text = ESC_MARKUP.replace_all(text, r"\$1");
    ESC_TAG.replace_all(&text, r"\$0").into_owned()
}

/// Pipe-table rendering shared by the Markdown-family syntaxes.
pub(crate) fn markdown_table(out: &mut String, rows: &[Vec<String>], header_mode: TableHeaderMode) {
    let col_count = rows[0].len();
    if col_count == 0 {
        return;
    }
    let row_line = |row: &[String]| format!("| {} |", row.join(" | "));
    let rule: Vec<String> = vec![":-:".to_string(); col_count];

    match header_mode {
        TableHeaderMode::FirstRow => {
            out.push_str(&row_line(&rows[0]));
            out.push('\n');
            out.push_str(&row_line(&rule));
            out.push('\n');
            for row in &rows[1..] {
                out.push_str(&row_line(row));
                out.push('\n');
            }
        }
        TableHeaderMode::Empty => {
            let empty: Vec<String> = vec![String::new(); col_count];
            out.push_str(&row_line(&empty));
            out.push('\n');
            out.push_str(&row_line(&rule));
            out.push('\n');
            for row in rows {
                out.push_str(&row_line(row));
                out.push('\n');
            }
        }
    }
    out.push('\n');
}

/// Markdown (default output format).
pub(crate) struct MarkdownSyntax;

impl Syntax for MarkdownSyntax {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("a * b"), "a \\* b");
        assert_eq!(escape_markdown("[link]"), "\\[link\\]");
        assert_eq!(escape_markdown("<b>x</b>"), "\\<b>x\\</b>");
    }

    #[test]
    fn test_heading_syntax() {
        let mut out = String::new();
        MarkdownSyntax.heading(&mut out, 2, "Section");
        assert_eq!(out, "## Section\n\n");
    }

    #[test]
    fn test_list_item_syntax() {
        let mut out = String::new();
        MarkdownSyntax.list_item(&mut out, 1, "item", None);
        MarkdownSyntax.list_item(&mut out, 0, "third", Some(3));
        assert_eq!(out, "  * item\n3. third\n");
    }

    #[test]
    fn test_table_first_row_header() {
        let rows = vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["1".to_string(), "2".to_string()],
        ];
        let mut out = String::new();
        MarkdownSyntax.table(&mut out, &rows, TableHeaderMode::FirstRow);
        assert_eq!(out, "| a | b |\n| :-: | :-: |\n| 1 | 2 |\n\n");
    }

    #[test]
    fn test_table_empty_header() {
        let rows = vec![vec!["1".to_string(), "2".to_string()]];
        let mut out = String::new();
        MarkdownSyntax.table(&mut out, &rows, TableHeaderMode::Empty);
        assert_eq!(out, "|  |  |\n| :-: | :-: |\n| 1 | 2 |\n\n");
    }
}
