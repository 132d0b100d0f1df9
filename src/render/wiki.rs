//! TiddlyWiki wikitext syntax rules.

use once_cell::sync::Lazy;
use regex::Regex;

use super::emitter::Syntax;
use super::options::TableHeaderMode;
use super::rgb_to_hex;

static ESC_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

pub(crate) struct WikiSyntax;

impl Syntax for WikiSyntax {
    fn heading(&self, out: &mut String, level: u8, text: &str) {
        out.push_str(&"!".repeat(level as usize));
        out.push(' ');
        out.push_str(text);
        out.push_str("\n\n");
    }

    fn list_item(&self, out: &mut String, level: u8, text: &str, number: Option<u32>) {
        // Wikitext numbering is positional, the ordinal itself is implied.
        let marker = if number.is_some() { "#" } else { "*" };
        out.push_str(&marker.repeat(level as usize + 1));
        out.push(' ');
        out.push_str(text.trim());
        out.push('\n');
    }

    fn paragraph(&self, out: &mut String, text: &str) {
        out.push_str(text);
        out.push_str("\n\n");
    }

    fn image(&self, out: &mut String, path: &str, max_width: Option<u32>) {
        match max_width {
            None => out.push_str(&format!("<img src=\"{}\" />\n\n", path)),
            Some(w) => out.push_str(&format!("<img src=\"{}\" width={}px />\n\n", path, w)),
        }
    }

    fn table(&self, out: &mut String, rows: &[Vec<String>], header_mode: TableHeaderMode) {
        let row_line = |row: &[String]| format!("|{}|", row.join("|"));
        match header_mode {
            TableHeaderMode::FirstRow => {
                out.push_str(&row_line(&rows[0]));
                out.push_str("h\n");
                for row in &rows[1..] {
                    out.push_str(&row_line(row));
                    out.push('\n');
                }
            }
            TableHeaderMode::Empty => {
                let empty: Vec<String> = vec![String::new(); rows[0].len()];
                out.push_str(&row_line(&empty));
                out.push_str("h\n");
                for row in rows {
                    out.push_str(&row_line(row));
                    out.push('\n');
                }
            }
        }
        out.push('\n');
    }

    fn escape(&self, text: &str) -> String {
        ESC_TAG.replace_all(text, "''''$0").into_owned()
    }

    fn accent(&self, text: &str) -> String {
        format!(" __{}__ ", text)
    }

    fn strong(&self, text: &str) -> String {
        format!(" ''{}'' ", text)
    }

    fn colored(&self, text: &str, rgb: [u8; 3]) -> String {
        format!(" @@color:{}; {} @@ ", rgb_to_hex(rgb), text)
    }

    fn hyperlink(&self, text: &str, url: &str) -> String {
        format!("[[{}|{}]]", text, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wiki_heading() {
        let mut out = String::new();
        WikiSyntax.heading(&mut out, 2, "Section");
        assert_eq!(out, "!! Section\n\n");
    }

    #[test]
    fn test_wiki_lists() {
        let mut out = String::new();
        WikiSyntax.list_item(&mut out, 0, "bullet", None);
        WikiSyntax.list_item(&mut out, 1, "numbered", Some(1));
        assert_eq!(out, "* bullet\n## numbered\n");
    }

    #[test]
    fn test_wiki_styles() {
        assert_eq!(WikiSyntax.strong("x"), " ''x'' ");
        assert_eq!(WikiSyntax.accent("x"), " __x__ ");
        assert_eq!(WikiSyntax.hyperlink("t", "u"), "[[t|u]]");
    }

    #[test]
    fn test_wiki_escape() {
        assert_eq!(WikiSyntax.escape("a <b> c"), "a ''''<b> c");
    }
}
