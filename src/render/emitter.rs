//! Shared emitter walk over the block model.
//!
//! One walk serializes a deck for every target syntax; the per-format
//! differences live behind the [`Syntax`] trait. The walk owns the
//! cross-slide state: title dedup, ordered-list counters, and the
//! blank-line discipline around lists.

use std::collections::HashMap;

use crate::model::{Block, EmbeddedReference, Slide, SlideDeck, TextRun};
use crate::parser::titles_similar;

use super::options::{RenderOptions, TableHeaderMode};

/// Per-format serialization rules.
pub(crate) trait Syntax {
    /// Document preamble.
    fn header(&self, _out: &mut String, _deck: &SlideDeck) {}

    fn heading(&self, out: &mut String, level: u8, text: &str);

    fn list_item(&self, out: &mut String, level: u8, text: &str, number: Option<u32>);

    fn paragraph(&self, out: &mut String, text: &str);

    fn image(&self, out: &mut String, path: &str, max_width: Option<u32>);

    /// Image that degraded to a placeholder: alt text, no payload.
    fn image_placeholder(&self, out: &mut String, alt: &str) {
        if alt.is_empty() {
            out.push_str("![image]\n\n");
        } else {
            out.push_str(&format!("![image: {}]\n\n", alt.replace(']', "\\]")));
        }
    }

    fn table(&self, out: &mut String, rows: &[Vec<String>], header_mode: TableHeaderMode);

    fn escape(&self, text: &str) -> String;

    fn accent(&self, text: &str) -> String;

    fn strong(&self, text: &str) -> String;

    fn colored(&self, text: &str, rgb: [u8; 3]) -> String;

    fn hyperlink(&self, text: &str, url: &str) -> String;

    fn math(&self, text: &str) -> String {
        format!(" ${}$ ", text)
    }

    fn comment(&self, out: &mut String, text: &str) {
        out.push_str(&format!("<!-- {} -->\n", text));
    }

    /// Quoted path-id reference preceding embedded content.
    fn reference_quote(&self, out: &mut String, path: &str) {
        out.push_str(&format!("> `{}`\n\n", path));
    }

    fn supports_columns(&self) -> bool {
        false
    }

    fn columns_open(&self, _out: &mut String) {}
    fn column_open(&self, _out: &mut String, _width_pct: u32) {}
    fn column_close(&self, _out: &mut String) {}
    fn columns_close(&self, _out: &mut String) {}

    fn notes_open(&self, out: &mut String) {
        out.push_str("---\n\n");
    }
    fn notes_close(&self, _out: &mut String) {}
}

/// The walk itself.
pub(crate) struct Emitter<'a, S: Syntax> {
    syntax: S,
    options: &'a RenderOptions,
    deck: &'a SlideDeck,
    out: String,
    last_title: Option<String>,
    first_title_seen: bool,
    ordered_counters: HashMap<u8, u32>,
    last_was_list: bool,
    last_was_paragraph: bool,
}

impl<'a, S: Syntax> Emitter<'a, S> {
    pub fn new(syntax: S, deck: &'a SlideDeck, options: &'a RenderOptions) -> Self {
        Self {
            syntax,
            options,
            deck,
            out: String::new(),
            last_title: None,
            first_title_seen: false,
            ordered_counters: HashMap::new(),
            last_was_list: false,
            last_was_paragraph: false,
        }
    }

    pub fn render(mut self) -> String {
        self.syntax.header(&mut self.out, self.deck);

        let count = self.deck.slides.len();
        for (i, slide) in self.deck.slides.iter().enumerate() {
            if self.options.slide_numbers {
                self.syntax
                    .comment(&mut self.out, &format!("slide: {}", slide.index));
            }
            self.emit_slide(slide, 0);
            self.emit_notes(slide);

            if self.options.slide_separators && i + 1 < count {
                self.close_list();
                self.out.push_str("---\n\n");
                // A separator already provides the spacing a list
                // header would add.
                self.last_was_paragraph = true;
            }
        }

        let mut result = self.out.trim_end().to_string();
        if self.options.compress_blank_lines {
            result = super::compress_blank_lines(&result);
        }
        result.push('\n');
        result
    }

    fn emit_slide(&mut self, slide: &Slide, demote: u8) {
        match slide.columns {
            Some(span) if self.syntax.supports_columns() => {
                let preface = &slide.blocks[..span.preface];
                let left = &slide.blocks[span.preface..span.preface + span.left];
                let right = &slide.blocks[span.preface + span.left..];

                self.emit_blocks(preface, demote);
                self.close_list();
                self.syntax.columns_open(&mut self.out);
                for column in [left, right] {
                    self.syntax.column_open(&mut self.out, 50);
                    self.emit_blocks(column, demote);
                    self.close_list();
                    self.syntax.column_close(&mut self.out);
                }
                self.syntax.columns_close(&mut self.out);
            }
            _ => self.emit_blocks(&slide.blocks, demote),
        }
        self.close_list();
    }

    fn emit_blocks(&mut self, blocks: &[Block], demote: u8) {
        for (i, block) in blocks.iter().enumerate() {
            let next_is_list = blocks.get(i + 1).map_or(false, |b| b.is_list_item());
            if self.last_was_list && !block.is_list_item() {
                self.close_list();
            }

            match block {
                Block::Heading {
                    level,
                    text,
                    continuation,
                } => {
                    self.emit_heading(*level, text, *continuation, demote);
                    self.last_was_paragraph = false;
                }
                Block::Paragraph { runs } => {
                    let text = self.format_runs(runs);
                    if text.is_empty() {
                        continue;
                    }
                    if next_is_list {
                        // Compact spacing between a lead-in line and
                        // its list.
                        self.out.push_str(&text);
                        self.out.push('\n');
                    } else {
                        self.syntax.paragraph(&mut self.out, &text);
                    }
                    self.last_was_paragraph = true;
                }
                Block::ListItem {
                    level,
                    kind,
                    runs,
                    start_at,
                } => {
                    if !self.last_was_list {
                        if !self.last_was_paragraph {
                            self.out.push('\n');
                        }
                        self.ordered_counters.clear();
                    }
                    let text = self.format_runs(runs);
                    let number = match kind {
                        crate::model::ListKind::Ordered => {
                            Some(self.resolve_ordered_number(*level, *start_at))
                        }
                        crate::model::ListKind::Unordered => None,
                    };
                    self.syntax.list_item(&mut self.out, *level, &text, number);
                    self.last_was_list = true;
                    self.last_was_paragraph = false;
                }
                Block::Table { rows } => {
                    let formatted: Vec<Vec<String>> = rows
                        .iter()
                        .map(|row| {
                            row.iter()
                                .map(|cell| self.format_runs(cell).replace('\n', "<br />"))
                                .collect()
                        })
                        .collect();
                    if !formatted.is_empty() {
                        self.syntax.table(
                            &mut self.out,
                            &formatted,
                            self.options.table_header_mode,
                        );
                    }
                    self.last_was_paragraph = false;
                }
                Block::Image { resource, alt_text } => {
                    match resource
                        .as_deref()
                        .and_then(|id| self.deck.resource(id))
                    {
                        Some(res) => {
                            let path =
                                format!("{}{}", self.options.image_path_prefix, res.file_name);
                            self.syntax
                                .image(&mut self.out, &path, self.options.image_width);
                        }
                        None => self.syntax.image_placeholder(&mut self.out, alt_text),
                    }
                    self.last_was_paragraph = false;
                }
                Block::Embedded(reference) => {
                    self.emit_embedded(reference, demote);
                    self.last_was_paragraph = false;
                }
            }
        }
    }

    fn emit_heading(&mut self, level: u8, text: &str, continuation: bool, demote: u8) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let mut effective = level.saturating_add(demote);
        if self.first_title_seen {
            effective = effective.saturating_add(1);
        }
        let effective = effective.min(6);

        let duplicate = continuation
            || self
                .last_title
                .as_deref()
                .map_or(false, |prev| titles_similar(prev, text));

        if duplicate {
            if self.options.keep_similar_titles {
                self.syntax
                    .heading(&mut self.out, effective, &format!("{} (cont.)", text));
            }
        } else {
            self.syntax.heading(&mut self.out, effective, text);
        }

        self.last_title = Some(text.to_string());
        self.first_title_seen = true;
    }

    fn emit_embedded(&mut self, reference: &EmbeddedReference, demote: u8) {
        self.close_list();
        self.syntax
            .reference_quote(&mut self.out, &reference.path.to_string());

        if let Some(failure) = &reference.failure {
            self.syntax
                .comment(&mut self.out, &format!("{}: {}", reference.path, failure));
            self.out.push('\n');
            return;
        }

        let count = reference.slides.len();
        for (i, slide) in reference.slides.iter().enumerate() {
            let child = reference.path.child_slide(slide.index);
            if self.options.slide_numbers {
                self.syntax.comment(&mut self.out, &child.to_string());
            }
            self.emit_slide(slide, demote + 1);
            self.emit_notes(slide);
            if i + 1 < count {
                self.out.push_str("---\n\n");
            }
        }
    }

    fn emit_notes(&mut self, slide: &Slide) {
        if slide.notes.is_empty() {
            return;
        }
        self.close_list();
        self.syntax.notes_open(&mut self.out);
        for note in &slide.notes {
            // Notes arrive preformatted from the source.
            self.syntax.paragraph(&mut self.out, note);
        }
        self.syntax.notes_close(&mut self.out);
    }

    /// Continue or seed the ordered counter for one list level.
    ///
    /// An explicit ordinal seeds the counter; an explicit ordinal the
    /// source repeats for every item advances sequentially instead of
    /// stuttering; a forward jump is respected. Deeper counters reset.
    fn resolve_ordered_number(&mut self, level: u8, explicit: Option<u32>) -> u32 {
        let current = self.ordered_counters.get(&level).copied();
        let value = match (explicit, current) {
            (None, current) => current.unwrap_or(0) + 1,
            (Some(n), None) => n,
            (Some(n), Some(current)) if n <= current => current + 1,
            (Some(n), Some(_)) => n,
        };
        self.ordered_counters.insert(level, value);
        self.ordered_counters.retain(|k, _| *k <= level);
        value
    }

    fn close_list(&mut self) {
        if self.last_was_list {
            self.out.push('\n');
            self.ordered_counters.clear();
            self.last_was_list = false;
        }
    }

    fn format_runs(&self, runs: &[TextRun]) -> String {
        let mut result = String::new();
        for run in runs {
            if run.text.is_empty() {
                continue;
            }
            if run.style.math {
                result.push_str(&self.syntax.math(&run.text));
                continue;
            }

            let mut text = if self.options.escape_special_chars {
                self.syntax.escape(&run.text)
            } else {
                run.text.clone()
            };

            if let Some(url) = &run.style.hyperlink {
                text = self.syntax.hyperlink(&text, url);
            }
            if run.style.accent {
                text = self.syntax.accent(&text);
            } else if run.style.strong {
                text = self.syntax.strong(&text);
            }
            if let Some(rgb) = run.style.color_rgb {
                if self.options.color_tags {
                    text = self.syntax.colored(&text, rgb);
                }
            }

            result.push_str(&text);
        }
        result.trim().to_string()
    }
}
