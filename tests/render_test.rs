//! Integration tests for the output formats: syntax exactness, table
//! header policies, list numbering, and embedded-reference rendering.

use undeck::model::{
    Block, ColumnSpan, EmbeddedReference, ListKind, PathId, Resource, Slide, SlideDeck, TextRun,
    TextStyle,
};
use undeck::render::{to_json, to_markdown, RenderOptions, TableHeaderMode};
use undeck::{to_madoko, to_quarto, to_wiki};

fn deck_with(blocks: Vec<Block>) -> SlideDeck {
    let mut deck = SlideDeck::new();
    let mut slide = Slide::new(1);
    slide.blocks = blocks;
    deck.slides.push(slide);
    deck
}

fn quiet() -> RenderOptions {
    RenderOptions::new().with_slide_numbers(false)
}

fn list_item(text: &str, start_at: Option<u32>) -> Block {
    Block::ListItem {
        level: 0,
        kind: ListKind::Ordered,
        runs: vec![TextRun::new(text)],
        start_at,
    }
}

#[test]
fn test_table_first_row_header_mode() {
    let deck = deck_with(vec![Block::Table {
        rows: vec![
            vec![vec![TextRun::new("a")], vec![TextRun::new("b")], vec![TextRun::new("c")]],
            vec![vec![TextRun::new("d")], vec![TextRun::new("e")], vec![TextRun::new("f")]],
            vec![vec![TextRun::new("g")], vec![TextRun::new("h")], vec![TextRun::new("i")]],
        ],
    }]);

    let output = to_markdown(&deck, &quiet()).unwrap();
    assert!(output.contains(
        "| a | b | c |\n| :-: | :-: | :-: |\n| d | e | f |\n| g | h | i |"
    ));
}

#[test]
fn test_table_empty_header_mode() {
    let deck = deck_with(vec![Block::Table {
        rows: vec![
            vec![vec![TextRun::new("a")], vec![TextRun::new("b")], vec![TextRun::new("c")]],
            vec![vec![TextRun::new("d")], vec![TextRun::new("e")], vec![TextRun::new("f")]],
            vec![vec![TextRun::new("g")], vec![TextRun::new("h")], vec![TextRun::new("i")]],
        ],
    }]);

    let options = quiet().with_table_header_mode(TableHeaderMode::Empty);
    let output = to_markdown(&deck, &options).unwrap();
    assert!(output.contains(
        "|  |  |  |\n| :-: | :-: | :-: |\n| a | b | c |\n| d | e | f |\n| g | h | i |"
    ));
}

#[test]
fn test_ordered_list_continues_from_explicit_start() {
    let deck = deck_with(vec![
        list_item("first entry", Some(5)),
        list_item("second entry", None),
        list_item("third entry", None),
    ]);

    let output = to_markdown(&deck, &quiet()).unwrap();
    assert!(output.contains("5. first entry\n6. second entry\n7. third entry"));
}

#[test]
fn test_repeated_explicit_start_advances_instead_of_stuttering() {
    // Some sources stamp the same startAt on every item of the list.
    let deck = deck_with(vec![
        list_item("first entry", Some(1)),
        list_item("second entry", Some(1)),
        list_item("third entry", Some(1)),
    ]);

    let output = to_markdown(&deck, &quiet()).unwrap();
    assert!(output.contains("1. first entry\n2. second entry\n3. third entry"));
}

#[test]
fn test_embedded_reference_renders_quoted_path() {
    let mut nested = Slide::new(1);
    nested.blocks = vec![Block::paragraph("Nested slide body content.")];
    let reference = EmbeddedReference::expanded(PathId::slide(2).child_embed(1), vec![nested]);

    let mut deck = SlideDeck::new();
    let mut slide = Slide::new(2);
    slide.blocks = vec![
        Block::paragraph("Content before the nested deck."),
        Block::Embedded(reference),
    ];
    deck.slides.push(slide);

    let output = to_markdown(&deck, &quiet()).unwrap();
    let quote = output.find("> `S2/E1`").expect("quoted path id");
    let nested = output.find("Nested slide body content").unwrap();
    assert!(quote < nested);
}

#[test]
fn test_failed_embed_renders_placeholder_comment() {
    let reference =
        EmbeddedReference::placeholder(PathId::slide(1).child_embed(1), "recursion cycle detected");
    let deck = deck_with(vec![Block::Embedded(reference)]);

    let output = to_markdown(&deck, &quiet()).unwrap();
    assert!(output.contains("> `S1/E1`"));
    assert!(output.contains("<!-- S1/E1: recursion cycle detected -->"));
}

#[test]
fn test_duplicate_title_dropped_by_default() {
    let mut deck = SlideDeck::new();
    let mut first = Slide::new(1);
    first.blocks = vec![
        Block::heading(1, "Architecture Overview"),
        Block::paragraph("The first slide about the architecture."),
    ];
    let mut second = Slide::new(2);
    second.blocks = vec![
        Block::heading(1, "Architecture Overview"),
        Block::paragraph("The second slide continues the topic."),
    ];
    deck.slides.push(first);
    deck.slides.push(second);

    let output = to_markdown(&deck, &quiet()).unwrap();
    assert_eq!(output.matches("Architecture Overview").count(), 1);
}

#[test]
fn test_duplicate_title_kept_with_cont_suffix() {
    let mut deck = SlideDeck::new();
    let mut first = Slide::new(1);
    first.blocks = vec![Block::heading(1, "Architecture Overview")];
    let mut second = Slide::new(2);
    second.blocks = vec![Block::heading(1, "Architecture Overview")];
    deck.slides.push(first);
    deck.slides.push(second);

    let options = quiet().with_similar_titles(true);
    let output = to_markdown(&deck, &options).unwrap();
    assert!(output.contains("# Architecture Overview"));
    assert!(output.contains("## Architecture Overview (cont.)"));
}

#[test]
fn test_later_titles_demote_one_level() {
    let mut deck = SlideDeck::new();
    let mut first = Slide::new(1);
    first.blocks = vec![Block::heading(1, "Deck Title")];
    let mut second = Slide::new(2);
    second.blocks = vec![Block::heading(1, "Second Slide")];
    deck.slides.push(first);
    deck.slides.push(second);

    let output = to_markdown(&deck, &quiet()).unwrap();
    assert!(output.contains("# Deck Title"));
    assert!(output.contains("## Second Slide"));
}

#[test]
fn test_slide_separators_and_numbers() {
    let mut deck = SlideDeck::new();
    for i in 1..=2 {
        let mut slide = Slide::new(i);
        slide.blocks = vec![Block::paragraph(format!("Body of slide number {}.", i))];
        deck.slides.push(slide);
    }

    let options = RenderOptions::new().with_slide_separators(true);
    let output = to_markdown(&deck, &options).unwrap();
    assert!(output.contains("<!-- slide: 1 -->"));
    assert!(output.contains("<!-- slide: 2 -->"));
    assert!(output.contains("\n---\n"));
}

#[test]
fn test_escaping_toggle() {
    let deck = deck_with(vec![Block::paragraph("2 * 3 = 6 [approx]")]);

    let escaped = to_markdown(&deck, &quiet()).unwrap();
    assert!(escaped.contains(r"2 \* 3 = 6 \[approx\]"));

    let raw = to_markdown(&deck, &quiet().with_escaping(false)).unwrap();
    assert!(raw.contains("2 * 3 = 6 [approx]"));
}

#[test]
fn test_styled_runs_and_color_tags() {
    let deck = deck_with(vec![Block::Paragraph {
        runs: vec![
            TextRun::new("plain "),
            TextRun::strong("bold"),
            TextRun {
                text: "red".into(),
                style: TextStyle {
                    color_rgb: Some([255, 0, 0]),
                    ..Default::default()
                },
            },
        ],
    }]);

    let output = to_markdown(&deck, &quiet()).unwrap();
    assert!(output.contains("__bold__"));
    assert!(output.contains("<span style=\"color:#FF0000\">red</span>"));

    let no_color = to_markdown(&deck, &quiet().with_color_tags(false)).unwrap();
    assert!(!no_color.contains("span"));
}

#[test]
fn test_hyperlink_and_math_runs() {
    let deck = deck_with(vec![Block::Paragraph {
        runs: vec![
            TextRun {
                text: "docs".into(),
                style: TextStyle {
                    hyperlink: Some("https://example.com".into()),
                    ..Default::default()
                },
            },
            TextRun {
                text: r"x^2".into(),
                style: TextStyle {
                    math: true,
                    ..Default::default()
                },
            },
        ],
    }]);

    let output = to_markdown(&deck, &quiet()).unwrap();
    assert!(output.contains("[docs](https://example.com)"));
    assert!(output.contains("$x^2$"));
}

#[test]
fn test_image_resource_and_placeholder() {
    let mut deck = deck_with(vec![
        Block::Image {
            resource: Some("img-0001".into()),
            alt_text: String::new(),
        },
        Block::Image {
            resource: None,
            alt_text: "lost diagram".into(),
        },
    ]);
    deck.resources
        .push(Resource::new("img-0001", "deck_1.png", vec![1]));

    let output = to_markdown(&deck, &quiet()).unwrap();
    assert!(output.contains("![](img/deck_1.png)"));
    assert!(output.contains("![image: lost diagram]"));

    let sized = to_markdown(&deck, &quiet().with_image_width(640)).unwrap();
    assert!(sized.contains("<img src=\"img/deck_1.png\" style=\"max-width:640px;\" />"));
}

#[test]
fn test_notes_render_after_slide_content() {
    let mut deck = SlideDeck::new();
    let mut slide = Slide::new(1);
    slide.blocks = vec![Block::paragraph("Visible slide body content.")];
    slide.notes = vec!["Remember to mention the deadline.".to_string()];
    deck.slides.push(slide);

    let output = to_markdown(&deck, &quiet()).unwrap();
    let body = output.find("Visible slide body content").unwrap();
    let note = output.find("Remember to mention the deadline.").unwrap();
    assert!(body < note);
}

#[test]
fn test_wiki_syntax() {
    let deck = deck_with(vec![
        Block::heading(1, "Title Slide"),
        Block::ListItem {
            level: 0,
            kind: ListKind::Unordered,
            runs: vec![TextRun::new("a bullet point")],
            start_at: None,
        },
        Block::Paragraph {
            runs: vec![TextRun::strong("important")],
        },
    ]);

    let output = to_wiki(&deck, &quiet()).unwrap();
    assert!(output.contains("! Title Slide"));
    assert!(output.contains("* a bullet point"));
    assert!(output.contains("''important''"));
}

#[test]
fn test_madoko_toc_header() {
    let deck = deck_with(vec![Block::heading(1, "Title Slide")]);
    let output = to_madoko(&deck, &quiet()).unwrap();
    assert!(output.starts_with("[TOC]"));
    assert!(output.contains("# Title Slide"));
}

#[test]
fn test_quarto_renders_column_fences() {
    let mut deck = SlideDeck::new();
    let mut slide = Slide::new(1);
    slide.blocks = vec![
        Block::heading(1, "Split Slide"),
        Block::paragraph("Left column first paragraph."),
        Block::paragraph("Left column second paragraph."),
        Block::paragraph("Right column only paragraph."),
    ];
    slide.columns = Some(ColumnSpan { preface: 1, left: 2 });
    deck.slides.push(slide);

    let output = to_quarto(&deck, &quiet()).unwrap();
    assert!(output.starts_with("---\n"));
    assert!(output.contains(":::: {.columns}"));
    assert_eq!(output.matches("::: {.column width=\"50%\"}").count(), 2);

    let left = output.find("Left column second paragraph").unwrap();
    let right = output.find("Right column only paragraph").unwrap();
    assert!(left < right);
}

#[test]
fn test_quarto_notes_block() {
    let mut deck = SlideDeck::new();
    let mut slide = Slide::new(1);
    slide.blocks = vec![Block::paragraph("Quarto slide body content.")];
    slide.notes = vec!["Presenter-only remark.".to_string()];
    deck.slides.push(slide);

    let output = to_quarto(&deck, &quiet()).unwrap();
    assert!(output.contains("::: {.notes}"));
    assert!(output.contains("Presenter-only remark."));
}

#[test]
fn test_blank_line_compression() {
    let deck = deck_with(vec![
        Block::paragraph("First paragraph of the slide."),
        Block::paragraph("Second paragraph of the slide."),
    ]);

    let output = to_markdown(&deck, &quiet()).unwrap();
    assert!(!output.contains("\n\n\n"));
}

#[test]
fn test_json_dump_contains_blocks() {
    let deck = deck_with(vec![Block::heading(1, "Inspect Me")]);
    let json = to_json(&deck, true).unwrap();
    assert!(json.contains("\"heading\""));
    assert!(json.contains("\"Inspect Me\""));
}
