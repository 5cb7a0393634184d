//! Protection pre-pass: opaque spans replaced by sentinel tokens.
//!
//! Spans that later passes must not touch (previously produced markup,
//! math, fenced and inline code) are cut out of the text and replaced by a
//! token `U+E000 <index> U+E001`. Later passes see each span as a single
//! opaque word; the inline builder resolves tokens back into nodes.
//!
//! Extraction order matters and is fixed: raw markup regions, display
//! math, inline math, fenced code, inline code.

use regex::{Captures, Regex};
use std::sync::OnceLock;

use crate::model::{CodeBlock, MathSpan};
use crate::render::markup;

pub(crate) const TOKEN_OPEN: char = '\u{E000}';
pub(crate) const TOKEN_CLOSE: char = '\u{E001}';

/// Check if a character is reserved for parser tokens.
pub fn is_sentinel(c: char) -> bool {
    ('\u{E000}'..='\u{E003}').contains(&c)
}

/// Element openers the transformer itself emits: tag name and the leading
/// classes of its `class` attribute. A line starting with one of these is
/// treated as already-structural markup and passed through; any other
/// markup is ordinary text and gets escaped.
const RAW_SIGNATURES: &[(&str, &str)] = &[
    ("h1", markup::H1),
    ("h2", markup::H2),
    ("h3", markup::H3),
    ("h4", markup::H4),
    ("p", markup::PARAGRAPH),
    ("pre", markup::PRE),
    ("blockquote", markup::BLOCKQUOTE),
    ("ul", markup::LIST),
    ("ol", markup::LIST),
    ("div", markup::MATH_BLOCK),
    ("div", markup::TABLE_WRAPPER),
    ("div", markup::COVER_PAGE),
    ("div", markup::BIBLIOGRAPHY),
    ("div", markup::CONTAINER),
];

/// A protected span.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Protected {
    /// Previously produced markup
    Raw(String),
    /// `$$..$$` or `$..$`
    Math(MathSpan),
    /// Triple-backtick fence
    Fence(CodeBlock),
    /// Single-backtick span
    Code(String),
}

#[derive(Debug, Clone)]
struct Span {
    kind: Protected,
    source: String,
}

/// A piece of tokenized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Piece<'a> {
    Text(&'a str),
    Token(usize),
}

/// Split text on `open <digits> close` markers.
pub(crate) fn split_markers(text: &str, open: char, close: char) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut rest = text;

    while let Some(pos) = rest.find(open) {
        let after = &rest[pos + open.len_utf8()..];
        let Some(end) = after.find(close) else {
            break;
        };
        let Ok(index) = after[..end].parse::<usize>() else {
            break;
        };
        if pos > 0 {
            pieces.push(Piece::Text(&rest[..pos]));
        }
        pieces.push(Piece::Token(index));
        rest = &after[end + close.len_utf8()..];
    }

    if !rest.is_empty() {
        pieces.push(Piece::Text(rest));
    }
    pieces
}

pub(crate) fn marker(open: char, index: usize, close: char) -> String {
    format!("{}{}{}", open, index, close)
}

/// Text with its protected spans cut out.
#[derive(Debug, Clone, Default)]
pub(crate) struct ProtectedText {
    /// Tokenized text
    pub text: String,
    spans: Vec<Span>,
}

impl ProtectedText {
    /// Run the full protection pre-pass.
    pub fn protect(input: &str, strict_inline_math: bool) -> Self {
        let mut protected = Self::default();

        let text = protected.extract_raw_regions(input);
        let text = protected.extract_display_math(&text);
        let text = if strict_inline_math {
            protected.extract_inline_math_strict(&text)
        } else {
            protected.extract_inline_math_compat(&text)
        };
        let text = protected.extract_fences(&text);
        let text = protected.extract_inline_code(&text);

        log::debug!(
            "protected {} spans ({} bytes of tokenized text)",
            protected.spans.len(),
            text.len()
        );
        protected.text = text;
        protected
    }

    /// Protect a standalone fragment such as a single table cell.
    pub fn protect_fragment(input: &str, strict_inline_math: bool) -> Self {
        let mut protected = Self::default();
        let text = protected.extract_display_math(input);
        let text = if strict_inline_math {
            protected.extract_inline_math_strict(&text)
        } else {
            protected.extract_inline_math_compat(&text)
        };
        let text = protected.extract_fences(&text);
        protected.text = protected.extract_inline_code(&text);
        protected
    }

    /// Look up a protected span.
    pub fn get(&self, index: usize) -> Option<&Protected> {
        self.spans.get(index).map(|span| &span.kind)
    }

    /// Number of protected spans.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// If `text` is exactly one token (ignoring surrounding whitespace),
    /// return its span.
    pub fn sole_token<'a>(&'a self, text: &str) -> Option<&'a Protected> {
        match split_markers(text.trim(), TOKEN_OPEN, TOKEN_CLOSE).as_slice() {
            [Piece::Token(index)] => self.get(*index),
            _ => None,
        }
    }

    /// If `text` starts with a token (ignoring leading whitespace), return its span.
    pub fn leading_token<'a>(&'a self, text: &str) -> Option<&'a Protected> {
        match split_markers(text.trim_start(), TOKEN_OPEN, TOKEN_CLOSE).first() {
            Some(Piece::Token(index)) => self.get(*index),
            _ => None,
        }
    }

    /// Replace every token in `text` with its original source.
    pub fn restore(&self, text: &str) -> String {
        if !text.contains(TOKEN_OPEN) {
            return text.to_string();
        }
        split_markers(text, TOKEN_OPEN, TOKEN_CLOSE)
            .into_iter()
            .map(|piece| match piece {
                Piece::Text(s) => s.to_string(),
                Piece::Token(index) => self
                    .spans
                    .get(index)
                    .map(|span| span.source.clone())
                    .unwrap_or_default(),
            })
            .collect()
    }

    fn push(&mut self, kind: Protected, source: String) -> String {
        let index = self.spans.len();
        self.spans.push(Span { kind, source });
        marker(TOKEN_OPEN, index, TOKEN_CLOSE)
    }

    fn extract_raw_regions(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut pos = 0;

        while pos < text.len() {
            let line_end = text[pos..].find('\n').map_or(text.len(), |i| pos + i);
            let line = &text[pos..line_end];
            let indent = line.len() - line.trim_start().len();

            match raw_tag(&line[indent..]) {
                Some(tag) => {
                    let start = pos + indent;
                    let end = raw_region_end(text, start, tag).unwrap_or(line_end);
                    out.push_str(&line[..indent]);
                    let source = text[start..end].to_string();
                    let token = self.push(Protected::Raw(source.clone()), source);
                    out.push_str(&token);
                    pos = end;
                }
                None => {
                    out.push_str(line);
                    pos = line_end;
                }
            }

            if pos < text.len() {
                // the newline that ended the line or region
                out.push('\n');
                pos += 1;
            }
        }
        out
    }

    fn extract_display_math(&mut self, text: &str) -> String {
        let re = display_math_regex();
        re.replace_all(text, |caps: &Captures| {
            let source = self.restore(&caps[0]);
            let tex = self.restore(&caps[1]);
            self.push(Protected::Math(MathSpan::display(tex)), source)
        })
        .into_owned()
    }

    /// Bug-compatible single-line `$..$` matching.
    fn extract_inline_math_compat(&mut self, text: &str) -> String {
        let re = inline_math_regex();
        re.replace_all(text, |caps: &Captures| {
            let source = self.restore(&caps[0]);
            let tex = self.restore(&caps[1]);
            self.push(Protected::Math(MathSpan::inline(tex)), source)
        })
        .into_owned()
    }

    /// Single-line `$..$` matching that rejects currency-like spans.
    fn extract_inline_math_strict(&mut self, text: &str) -> String {
        let spans = find_strict_inline_math(text);
        if spans.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for (start, end) in spans {
            out.push_str(&text[last..start]);
            let source = self.restore(&text[start..end]);
            let tex = self.restore(&text[start + 1..end - 1]);
            let token = self.push(Protected::Math(MathSpan::inline(tex)), source);
            out.push_str(&token);
            last = end;
        }
        out.push_str(&text[last..]);
        out
    }

    fn extract_fences(&mut self, text: &str) -> String {
        let re = fence_regex();
        re.replace_all(text, |caps: &Captures| {
            let source = self.restore(&caps[0]);
            let block = split_fence(&self.restore(&caps[1]));
            self.push(Protected::Fence(block), source)
        })
        .into_owned()
    }

    fn extract_inline_code(&mut self, text: &str) -> String {
        let re = inline_code_regex();
        re.replace_all(text, |caps: &Captures| {
            let source = self.restore(&caps[0]);
            let code = self.restore(&caps[1]);
            self.push(Protected::Code(code), source)
        })
        .into_owned()
    }
}

fn display_math_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\$\$(.*?)\$\$").expect("valid display math regex"))
}

fn inline_math_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$([^$\n]*)\$").expect("valid inline math regex"))
}

fn fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```(.*?)```").expect("valid fence regex"))
}

fn fence_language_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9_+#.-]+)[ \t]*\n").expect("valid fence language regex")
    })
}

fn inline_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"`([^`\n]+)`").expect("valid inline code regex"))
}

/// Split a fence interior into an optional language tag and the code.
fn split_fence(interior: &str) -> CodeBlock {
    let (language, code) = match fence_language_regex().captures(interior) {
        Some(caps) => (
            Some(caps[1].to_string()),
            &interior[caps.get(0).map_or(0, |m| m.end())..],
        ),
        None => (None, interior.strip_prefix('\n').unwrap_or(interior)),
    };
    let code = code.strip_suffix('\n').unwrap_or(code);
    CodeBlock {
        language,
        code: code.to_string(),
    }
}

/// Find inline math spans, rejecting candidates that look like currency.
///
/// A candidate `$..$` on one line is accepted when its interior is
/// non-empty, neither starts nor ends with whitespace, and the closing `$`
/// is not directly followed by a digit. A `$` preceded by a backslash is
/// never a delimiter.
fn find_strict_inline_math(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let bytes = text.as_bytes();
    let is_delimiter = |i: usize| bytes[i] == b'$' && (i == 0 || bytes[i - 1] != b'\\');

    let mut i = 0;
    while i < bytes.len() {
        if !is_delimiter(i) {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        while j < bytes.len() && bytes[j] != b'\n' && !is_delimiter(j) {
            j += 1;
        }
        if j >= bytes.len() || bytes[j] == b'\n' {
            i = j;
            continue;
        }

        let interior = &text[i + 1..j];
        let followed_by_digit = bytes.get(j + 1).is_some_and(|b| b.is_ascii_digit());
        let valid = !interior.is_empty()
            && !interior.starts_with(char::is_whitespace)
            && !interior.ends_with(char::is_whitespace)
            && !followed_by_digit;

        if valid {
            spans.push((i, j + 1));
            i = j + 1;
        } else {
            i = j;
        }
    }
    spans
}

/// Tag name of a raw markup region starting at the beginning of `line`.
fn raw_tag(line: &str) -> Option<&'static str> {
    let rest = line.strip_prefix('<')?;
    let name_len = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    let (name, after) = rest.split_at(name_len);

    // ordered lists may carry a start number ahead of the class
    let after = if name == "ol" {
        skip_start_attr(after)
    } else {
        after
    };
    let class = after.strip_prefix(" class=\"")?;

    RAW_SIGNATURES
        .iter()
        .find(|(tag, signature)| {
            *tag == name
                && class
                    .strip_prefix(signature)
                    .is_some_and(|rest| rest.starts_with(['"', ' ']))
        })
        .map(|(tag, _)| *tag)
}

fn skip_start_attr(after: &str) -> &str {
    let Some(number) = after.strip_prefix(" start=\"") else {
        return after;
    };
    let digits = number.find(|c: char| !c.is_ascii_digit()).unwrap_or(0);
    match number[digits..].strip_prefix('"') {
        Some(rest) if digits > 0 => rest,
        _ => after,
    }
}

/// End offset of a raw region: through the matching close tag, then to the
/// end of that line. `None` when the element is never closed.
fn raw_region_end(text: &str, start: usize, tag: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut pos = start;

    while let Some(offset) = text[pos..].find('<') {
        let at = pos + offset;
        let rest = &text[at + 1..];

        if let Some(after) = rest.strip_prefix('/').and_then(|r| strip_tag_name(r, tag)) {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                let close_start = text.len() - after.len();
                let close_end = text[close_start..]
                    .find('>')
                    .map_or(text.len(), |i| close_start + i + 1);
                let line_end = text[close_end..]
                    .find('\n')
                    .map_or(text.len(), |i| close_end + i);
                return Some(line_end);
            }
        } else if strip_tag_name(rest, tag).is_some() {
            depth += 1;
        }
        pos = at + 1;
    }
    None
}

/// Strip a tag name followed by a name boundary.
fn strip_tag_name<'a>(text: &'a str, tag: &str) -> Option<&'a str> {
    let head = text.get(..tag.len())?;
    if !head.eq_ignore_ascii_case(tag) {
        return None;
    }
    let after = &text[tag.len()..];
    match after.chars().next() {
        Some(c) if c.is_ascii_alphanumeric() => None,
        _ => Some(after),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(protected: &ProtectedText) -> Vec<Protected> {
        (0..protected.len())
            .filter_map(|i| protected.get(i).cloned())
            .collect()
    }

    #[test]
    fn test_split_markers() {
        let text = format!("a{}b", marker(TOKEN_OPEN, 12, TOKEN_CLOSE));
        assert_eq!(
            split_markers(&text, TOKEN_OPEN, TOKEN_CLOSE),
            vec![Piece::Text("a"), Piece::Token(12), Piece::Text("b")]
        );
    }

    #[test]
    fn test_display_math_spans_lines() {
        let protected = ProtectedText::protect("before $$\na = b\n$$ after", true);
        assert_eq!(
            kinds(&protected),
            vec![Protected::Math(MathSpan::display("\na = b\n"))]
        );
        assert!(!protected.text.contains('$'));
        assert_eq!(protected.restore(&protected.text), "before $$\na = b\n$$ after");
    }

    #[test]
    fn test_display_before_inline() {
        let protected = ProtectedText::protect("$$x=y$$ and $z$", true);
        assert_eq!(
            kinds(&protected),
            vec![
                Protected::Math(MathSpan::display("x=y")),
                Protected::Math(MathSpan::inline("z")),
            ]
        );
    }

    #[test]
    fn test_strict_inline_math_rejects_currency() {
        let protected = ProtectedText::protect("costs $5 and $10 today", true);
        assert_eq!(protected.len(), 0);
        assert_eq!(protected.text, "costs $5 and $10 today");
    }

    #[test]
    fn test_compat_inline_math_matches_currency() {
        let protected = ProtectedText::protect("costs $5 and $10 today", false);
        assert_eq!(
            kinds(&protected),
            vec![Protected::Math(MathSpan::inline("5 and "))]
        );
    }

    #[test]
    fn test_strict_inline_math_recovers_after_rejection() {
        let protected = ProtectedText::protect("pay $5 then $x^2$", true);
        assert_eq!(
            kinds(&protected),
            vec![Protected::Math(MathSpan::inline("x^2"))]
        );
    }

    #[test]
    fn test_escaped_dollar_is_not_a_delimiter() {
        let protected = ProtectedText::protect(r"\$a$ and $b$", true);
        assert_eq!(
            kinds(&protected),
            vec![Protected::Math(MathSpan::inline("b"))]
        );
    }

    #[test]
    fn test_inline_math_is_single_line() {
        let protected = ProtectedText::protect("$a\nb$", true);
        assert_eq!(protected.len(), 0);
    }

    #[test]
    fn test_fence_with_language() {
        let protected = ProtectedText::protect("```rust\nfn main() {}\n```", true);
        assert_eq!(
            kinds(&protected),
            vec![Protected::Fence(CodeBlock {
                language: Some("rust".to_string()),
                code: "fn main() {}".to_string(),
            })]
        );
    }

    #[test]
    fn test_math_inside_fence_is_restored() {
        let protected = ProtectedText::protect("```\necho $HOME$\n```", true);
        assert_eq!(
            kinds(&protected).last(),
            Some(&Protected::Fence(CodeBlock {
                language: None,
                code: "echo $HOME$".to_string(),
            }))
        );
    }

    #[test]
    fn test_inline_code() {
        let protected = ProtectedText::protect("use `**not bold**` here", true);
        assert_eq!(
            kinds(&protected),
            vec![Protected::Code("**not bold**".to_string())]
        );
    }

    fn h1(text: &str) -> String {
        format!("<h1 class=\"{} text-black\">{}</h1>", markup::H1, text)
    }

    #[test]
    fn test_raw_region_single_line() {
        let input = format!("{}\nplain", h1("Title"));
        let protected = ProtectedText::protect(&input, true);
        assert_eq!(kinds(&protected), vec![Protected::Raw(h1("Title"))]);
        assert!(protected.text.ends_with("\nplain"));
    }

    #[test]
    fn test_raw_region_nested_divs_across_lines() {
        let input = format!(
            "<div class=\"{}\" contenteditable=\"false\">\n  <h1>T</h1>\n  <div class=\"inline-block\"></div>\n\n  <p>Name</p>\n</div>\n# Next",
            markup::COVER_PAGE
        );
        let protected = ProtectedText::protect(&input, true);
        assert_eq!(protected.len(), 1);
        match protected.get(0) {
            Some(Protected::Raw(source)) => assert!(source.ends_with("</div>")),
            other => panic!("expected raw region, got {:?}", other),
        }
        assert!(protected.text.ends_with("\n# Next"));
    }

    #[test]
    fn test_unclosed_raw_region_is_one_line() {
        let input = format!("<p class=\"{}\">open\nmore", markup::PARAGRAPH);
        let protected = ProtectedText::protect(&input, true);
        assert_eq!(
            kinds(&protected),
            vec![Protected::Raw(format!("<p class=\"{}\">open", markup::PARAGRAPH))]
        );
    }

    #[test]
    fn test_raw_tag_requires_emitted_signature() {
        let paragraph = format!("<p class=\"{}\">", markup::PARAGRAPH);
        assert_eq!(raw_tag(&paragraph), Some("p"));
        assert_eq!(raw_tag(&format!("<h3 class=\"{} text-indigo-600\">", markup::H3)), Some("h3"));
        assert_eq!(raw_tag(&format!("<ol start=\"5\" class=\"{}\">", markup::LIST)), Some("ol"));
        assert_eq!(raw_tag(&format!("<ul class=\"{}\">", markup::LIST)), Some("ul"));
        assert_eq!(raw_tag(&format!("<div class=\"{}\">", markup::MATH_BLOCK)), Some("div"));
        assert_eq!(raw_tag("<div class=\"doxy-document font-serif\">"), Some("div"));

        assert_eq!(raw_tag("<p>"), None);
        assert_eq!(raw_tag("<p class=\"a\">"), None);
        assert_eq!(raw_tag("<pre>"), None);
        assert_eq!(raw_tag("<li>item</li>"), None);
        assert_eq!(raw_tag("<table>"), None);
        assert_eq!(raw_tag("<ul start=\"2\" class=\"my-4 space-y-1\">"), None);
        assert_eq!(raw_tag("<div class=\"other\">"), None);
        assert_eq!(raw_tag("<div class=\"doxy-documents\">"), None);
        assert_eq!(raw_tag("<script>"), None);
    }

    #[test]
    fn test_foreign_markup_is_not_protected() {
        let protected = ProtectedText::protect("<p><img src=x onerror=alert(1)></p>", true);
        assert_eq!(protected.len(), 0);
        assert_eq!(protected.text, "<p><img src=x onerror=alert(1)></p>");
    }

    #[test]
    fn test_sole_and_leading_token() {
        let protected = ProtectedText::protect("$$x$$\n$$y$$ tail", true);
        let lines: Vec<&str> = protected.text.lines().collect();
        assert!(protected.sole_token(lines[0]).is_some());
        assert!(protected.sole_token(lines[1]).is_none());
        assert!(protected.leading_token(lines[1]).is_some());
    }
}
