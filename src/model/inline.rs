//! Inline content types.

use serde::{Deserialize, Serialize};

/// Inline content within a heading, paragraph line, list item, quote or cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Inline {
    /// Literal text (escaped at render time)
    Text(String),

    /// `**x**` or `__x__`
    Strong(Vec<Inline>),

    /// `*x*`
    Emphasis(Vec<Inline>),

    /// `***x***`
    StrongEmphasis(Vec<Inline>),

    /// `` `x` ``
    Code(String),

    /// `[text](url)`, rendered as a citation anchor
    Link {
        /// Visible link text
        text: Vec<Inline>,
        /// Link target, verbatim
        url: String,
    },

    /// `$x$` or `$$x$$`
    Math(MathSpan),

    /// A fenced code block that appears in the middle of a line
    CodeBlock(CodeBlock),
}

impl Inline {
    /// Create a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text(text.into())
    }

    /// Get the plain text of this node.
    pub fn plain_text(&self) -> String {
        match self {
            Inline::Text(text) | Inline::Code(text) => text.clone(),
            Inline::Strong(children)
            | Inline::Emphasis(children)
            | Inline::StrongEmphasis(children) => plain_text(children),
            Inline::Link { text, .. } => plain_text(text),
            Inline::Math(span) => span.source.clone(),
            Inline::CodeBlock(block) => block.code.clone(),
        }
    }
}

/// Concatenate the plain text of a sequence of inline nodes.
pub fn plain_text(content: &[Inline]) -> String {
    content.iter().map(Inline::plain_text).collect()
}

/// Whether a math span is displayed on its own line or within running text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MathMode {
    /// `$...$`
    Inline,
    /// `$$...$$`
    Display,
}

impl MathMode {
    /// Check if this is display mode.
    pub fn is_display(&self) -> bool {
        matches!(self, MathMode::Display)
    }
}

/// A delimited math expression; the source is opaque LaTeX-like text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathSpan {
    /// Expression source without delimiters
    pub source: String,
    /// Display or inline
    pub mode: MathMode,
}

impl MathSpan {
    /// Create an inline math span.
    pub fn inline(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            mode: MathMode::Inline,
        }
    }

    /// Create a display math span.
    pub fn display(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            mode: MathMode::Display,
        }
    }
}

/// Preformatted code from a triple-backtick fence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Language tag from the opening fence line, if any
    pub language: Option<String>,
    /// Code content, verbatim
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_nested() {
        let content = vec![
            Inline::text("See "),
            Inline::Link {
                text: vec![Inline::Strong(vec![Inline::text("Paper")])],
                url: "https://example.com".to_string(),
            },
            Inline::text(" and "),
            Inline::Math(MathSpan::inline("x^2")),
        ];
        assert_eq!(plain_text(&content), "See Paper and x^2");
    }

    #[test]
    fn test_inline_serialization_tag() {
        let json = serde_json::to_string(&Inline::text("hi")).unwrap();
        assert!(json.contains("\"type\":\"text\""));
    }
}
