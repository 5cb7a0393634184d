//! Block parsing: line classification, chunking, paragraph segmentation
//! and list grouping.
//!
//! Lines are classified one at a time (first match wins), then handled in
//! chunks separated by blank lines. Within a chunk, pipe-line runs become
//! tables, prose lines become paragraphs (or bare text when the chunk opens
//! with a structural element), and adjacent same-kind list items are
//! grouped last.

use regex::Regex;
use std::sync::OnceLock;

use super::inline::InlineParser;
use super::protect::{Protected, ProtectedText};
use super::table::{build_table, is_table_line};
use crate::model::{Block, CodeBlock, Inline, ListKind, MathSpan};

fn heading_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(#{1,4})[ \t]+(.*)$").expect("valid heading regex"))
}

fn unordered_item_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[ \t]*[-*][ \t]+(.*)$").expect("valid list regex"))
}

fn ordered_item_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[ \t]*(\d+)\.[ \t]+(.*)$").expect("valid list regex"))
}

/// Classification of a single tokenized line.
#[derive(Debug, Clone, PartialEq)]
enum Line<'a> {
    Blank,
    Raw(String),
    Heading { level: u8, text: &'a str },
    Quote(&'a str),
    Math(MathSpan),
    Code(CodeBlock),
    /// Starts with display math or a fence, followed by more text
    Bare(&'a str),
    Pipe(&'a str),
    Item {
        kind: ListKind,
        number: Option<u64>,
        text: &'a str,
    },
    Prose(&'a str),
}

impl Line<'_> {
    fn is_pipe(&self) -> bool {
        matches!(self, Line::Pipe(_))
    }
}

fn classify<'a>(line: &'a str, protected: &ProtectedText) -> Line<'a> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }

    if let Some(Protected::Raw(source)) = protected.sole_token(line) {
        return Line::Raw(source.clone());
    }

    if let Some(text) = bold_line(trimmed) {
        return Line::Heading { level: 3, text };
    }

    if let Some(caps) = heading_regex().captures(line) {
        let level = caps[1].len() as u8;
        let text = caps.get(2).map_or("", |m| m.as_str());
        return Line::Heading { level, text };
    }

    if let Some(rest) = line.strip_prefix('>') {
        let rest = rest
            .strip_prefix(' ')
            .or_else(|| rest.strip_prefix('\t'))
            .unwrap_or(rest);
        return Line::Quote(rest);
    }

    match protected.sole_token(line) {
        Some(Protected::Math(span)) if span.mode.is_display() => {
            return Line::Math(span.clone())
        }
        Some(Protected::Fence(block)) => return Line::Code(block.clone()),
        _ => {}
    }

    match protected.leading_token(line) {
        Some(Protected::Math(span)) if span.mode.is_display() => return Line::Bare(line),
        Some(Protected::Fence(_)) => return Line::Bare(line),
        _ => {}
    }

    if is_table_line(line) {
        return Line::Pipe(line.trim_end());
    }

    if let Some(caps) = unordered_item_regex().captures(line) {
        return Line::Item {
            kind: ListKind::Unordered,
            number: None,
            text: caps.get(1).map_or("", |m| m.as_str()),
        };
    }

    if let Some(caps) = ordered_item_regex().captures(line) {
        return Line::Item {
            kind: ListKind::Ordered,
            number: caps[1].parse().ok(),
            text: caps.get(2).map_or("", |m| m.as_str()),
        };
    }

    Line::Prose(line)
}

/// Inner text of a line that is nothing but one `**bold**` span.
fn bold_line(trimmed: &str) -> Option<&str> {
    let inner = trimmed.strip_prefix("**")?.strip_suffix("**")?;
    let inner = inner.trim();
    (!inner.is_empty() && !inner.contains("**")).then_some(inner)
}

/// A chunk element after table detection and inline parsing.
enum Element {
    Block(Block),
    Item {
        kind: ListKind,
        number: Option<u64>,
        content: Vec<Inline>,
    },
    Prose(Vec<Inline>),
}

/// A chunk element after paragraph segmentation.
enum Segment {
    Block(Block),
    Item {
        kind: ListKind,
        number: Option<u64>,
        content: Vec<Inline>,
    },
}

/// Builds blocks from tokenized text.
pub(crate) struct BlockParser<'a> {
    protected: &'a ProtectedText,
    inline: InlineParser<'a>,
}

impl<'a> BlockParser<'a> {
    /// Create a block parser over a protected text.
    pub fn new(protected: &'a ProtectedText) -> Self {
        Self {
            protected,
            inline: InlineParser::new(protected),
        }
    }

    /// Parse the protected text into blocks.
    pub fn parse(&self) -> Vec<Block> {
        let lines: Vec<Line<'_>> = self
            .protected
            .text
            .split('\n')
            .map(|line| classify(line, self.protected))
            .collect();

        let mut blocks = Vec::new();
        let mut chunks = 0usize;
        for chunk in lines.split(|line| matches!(line, Line::Blank)) {
            if chunk.is_empty() {
                continue;
            }
            chunks += 1;
            let elements = self.elements(chunk);
            let segments = wrap_paragraphs(elements);
            blocks.extend(group_lists(segments));
        }

        log::debug!(
            "classified {} lines into {} chunks, {} blocks",
            lines.len(),
            chunks,
            blocks.len()
        );
        blocks
    }

    fn elements(&self, chunk: &[Line<'_>]) -> Vec<Element> {
        let mut elements = Vec::with_capacity(chunk.len());
        let passthrough = matches!(chunk.first(), Some(Line::Raw(_)));
        let mut i = 0;

        while i < chunk.len() {
            if chunk[i].is_pipe() {
                let run_len = chunk[i..].iter().take_while(|l| l.is_pipe()).count();
                let run: Vec<&str> = chunk[i..i + run_len]
                    .iter()
                    .filter_map(|line| match line {
                        Line::Pipe(text) => Some(*text),
                        _ => None,
                    })
                    .collect();
                self.push_table_run(&run, passthrough, &mut elements);
                i += run_len;
                continue;
            }

            let element = match &chunk[i] {
                Line::Raw(source) => Element::Block(Block::Raw {
                    content: source.clone(),
                }),
                Line::Heading { level, text } => Element::Block(Block::Heading {
                    level: *level,
                    content: self.inline.parse(text.trim()),
                }),
                Line::Quote(text) => Element::Block(Block::Blockquote {
                    content: self.inline.parse(text.trim()),
                }),
                Line::Math(span) => Element::Block(Block::Math(span.clone())),
                Line::Code(code) => Element::Block(Block::Code(code.clone())),
                Line::Bare(text) => Element::Block(Block::Text {
                    content: self.inline.parse(text.trim()),
                }),
                Line::Item { kind, number, text } => Element::Item {
                    kind: *kind,
                    number: *number,
                    content: self.inline.parse(text.trim()),
                },
                Line::Prose(text) | Line::Pipe(text) => self.prose(text, passthrough),
                Line::Blank => {
                    i += 1;
                    continue;
                }
            };
            elements.push(element);
            i += 1;
        }
        elements
    }

    /// A prose line. Text following previously produced markup in the same
    /// chunk is that markup's own bare continuation and is kept verbatim.
    fn prose(&self, text: &str, passthrough: bool) -> Element {
        if passthrough {
            Element::Block(Block::Raw {
                content: self.protected.restore(text),
            })
        } else {
            Element::Prose(self.inline.parse(text.trim()))
        }
    }

    fn push_table_run(&self, run: &[&str], passthrough: bool, elements: &mut Vec<Element>) {
        match build_table(run, self.protected) {
            Some(table) => elements.push(Element::Block(Block::Table(table))),
            None => {
                log::debug!("pipe run of {} lines is not a table", run.len());
                elements.extend(run.iter().map(|line| self.prose(line, passthrough)));
            }
        }
    }
}

/// Turn prose into paragraphs, or into bare text when the chunk opens with
/// a structural element.
fn wrap_paragraphs(elements: Vec<Element>) -> Vec<Segment> {
    let opens_structural = !matches!(elements.first(), Some(Element::Prose(_)));
    let mut segments = Vec::with_capacity(elements.len());
    let mut pending: Vec<Vec<Inline>> = Vec::new();

    let flush = |pending: &mut Vec<Vec<Inline>>, segments: &mut Vec<Segment>| {
        if !pending.is_empty() {
            segments.push(Segment::Block(Block::Paragraph {
                lines: std::mem::take(pending),
            }));
        }
    };

    for element in elements {
        match element {
            Element::Prose(content) if opens_structural => {
                segments.push(Segment::Block(Block::Text { content }));
            }
            Element::Prose(content) => pending.push(content),
            Element::Block(block) => {
                flush(&mut pending, &mut segments);
                segments.push(Segment::Block(block));
            }
            Element::Item {
                kind,
                number,
                content,
            } => {
                flush(&mut pending, &mut segments);
                segments.push(Segment::Item {
                    kind,
                    number,
                    content,
                });
            }
        }
    }
    flush(&mut pending, &mut segments);
    segments
}

/// Group adjacent list items of the same kind into list blocks.
fn group_lists(segments: Vec<Segment>) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::with_capacity(segments.len());
    let mut open_list = false;

    for segment in segments {
        match segment {
            Segment::Block(block) => {
                blocks.push(block);
                open_list = false;
            }
            Segment::Item {
                kind,
                number,
                content,
            } => {
                if open_list {
                    if let Some(Block::List {
                        kind: current,
                        items,
                        ..
                    }) = blocks.last_mut()
                    {
                        if *current == kind {
                            items.push(content);
                            continue;
                        }
                    }
                }
                blocks.push(Block::List {
                    kind,
                    start: number,
                    items: vec![content],
                });
                open_list = true;
            }
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<Block> {
        let protected = ProtectedText::protect(text, true);
        BlockParser::new(&protected).parse()
    }

    fn t(s: &str) -> Inline {
        Inline::text(s)
    }

    fn heading(level: u8, text: &str) -> Block {
        Block::Heading {
            level,
            content: vec![t(text)],
        }
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(
            parse("# One\n## Two\n### Three\n#### Four\n##### Five"),
            vec![
                heading(1, "One"),
                heading(2, "Two"),
                heading(3, "Three"),
                heading(4, "Four"),
                Block::Text {
                    content: vec![t("##### Five")]
                },
            ]
        );
    }

    #[test]
    fn test_heading_requires_whitespace() {
        assert_eq!(
            parse("#tag"),
            vec![Block::Paragraph {
                lines: vec![vec![t("#tag")]]
            }]
        );
    }

    #[test]
    fn test_bold_line_promoted() {
        assert_eq!(parse("**Only This**"), parse("### Only This"));
        assert_eq!(parse("  **Only This**  "), vec![heading(3, "Only This")]);
    }

    #[test]
    fn test_partial_bold_not_promoted() {
        assert_eq!(
            parse("**a** and **b**"),
            vec![Block::Paragraph {
                lines: vec![vec![
                    Inline::Strong(vec![t("a")]),
                    t(" and "),
                    Inline::Strong(vec![t("b")]),
                ]]
            }]
        );
    }

    #[test]
    fn test_paragraph_keeps_single_newlines() {
        assert_eq!(
            parse("first line\n  second line\n\nnext"),
            vec![
                Block::Paragraph {
                    lines: vec![vec![t("first line")], vec![t("second line")]]
                },
                Block::Paragraph {
                    lines: vec![vec![t("next")]]
                },
            ]
        );
    }

    #[test]
    fn test_structural_chunk_leaves_prose_unwrapped() {
        assert_eq!(
            parse("## Title\nbody text"),
            vec![
                heading(2, "Title"),
                Block::Text {
                    content: vec![t("body text")]
                },
            ]
        );
    }

    #[test]
    fn test_blockquote_per_line() {
        assert_eq!(
            parse("> one\n>two"),
            vec![
                Block::Blockquote {
                    content: vec![t("one")]
                },
                Block::Blockquote {
                    content: vec![t("two")]
                },
            ]
        );
    }

    #[test]
    fn test_list_grouping_boundary() {
        let blocks = parse("- one\n- two\n\n- three");
        assert_eq!(
            blocks,
            vec![
                Block::List {
                    kind: ListKind::Unordered,
                    start: None,
                    items: vec![vec![t("one")], vec![t("two")]],
                },
                Block::List {
                    kind: ListKind::Unordered,
                    start: None,
                    items: vec![vec![t("three")]],
                },
            ]
        );
    }

    #[test]
    fn test_list_kind_change_splits_lists() {
        let blocks = parse("- a\n* b\n3. c\n4. d");
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[1],
            Block::List {
                kind: ListKind::Ordered,
                start: Some(3),
                items: vec![vec![t("c")], vec![t("d")]],
            }
        );
    }

    #[test]
    fn test_emphasis_line_is_not_list_item() {
        assert_eq!(
            parse("*note*"),
            vec![Block::Paragraph {
                lines: vec![vec![Inline::Emphasis(vec![t("note")])]]
            }]
        );
    }

    #[test]
    fn test_display_math_line() {
        assert_eq!(parse("$$x=y$$"), vec![Block::Math(MathSpan::display("x=y"))]);
    }

    #[test]
    fn test_fence_line() {
        assert_eq!(
            parse("```\nlet x = 1;\n```"),
            vec![Block::Code(CodeBlock {
                language: None,
                code: "let x = 1;".to_string(),
            })]
        );
    }

    #[test]
    fn test_table_before_list() {
        let blocks = parse("| - | * |\n|---|---|\n| 1 | 2 |");
        assert_eq!(blocks.len(), 1);
        assert!(matches!(blocks[0], Block::Table(_)));
    }

    #[test]
    fn test_rejected_table_becomes_prose() {
        assert_eq!(
            parse("| A | B |\n| 1 | 2 |"),
            vec![Block::Paragraph {
                lines: vec![vec![t("| A | B |")], vec![t("| 1 | 2 |")]]
            }]
        );
    }

    #[test]
    fn test_raw_markup_passes_through() {
        let raw = format!("<h2 class=\"{}\">Done</h2>", crate::render::markup::H2);
        assert_eq!(
            parse(&raw),
            vec![Block::Raw {
                content: raw.clone()
            }]
        );
    }

    #[test]
    fn test_text_after_raw_markup_is_kept_verbatim() {
        let heading = format!("<h2 class=\"{}\">T</h2>", crate::render::markup::H2);
        let body = "see <strong class=\"font-bold\">x</strong> &amp; y";
        assert_eq!(
            parse(&format!("{}\n{}\n- item", heading, body)),
            vec![
                Block::Raw { content: heading },
                Block::Raw {
                    content: body.to_string()
                },
                Block::List {
                    kind: ListKind::Unordered,
                    start: None,
                    items: vec![vec![t("item")]],
                },
            ]
        );
    }

    #[test]
    fn test_foreign_markup_is_prose() {
        assert_eq!(
            parse("<p>hi</p>"),
            vec![Block::Paragraph {
                lines: vec![vec![t("<p>hi</p>")]]
            }]
        );
    }

    #[test]
    fn test_whitespace_only_lines_separate_chunks() {
        assert_eq!(parse("a\n   \nb").len(), 2);
        assert!(parse("\n  \n\t\n").is_empty());
    }
}
