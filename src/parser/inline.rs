//! Inline parsing: ordered substitution passes building an inline tree.
//!
//! Each pass replaces its matches with a node marker (`U+E002 <index>
//! U+E003`) and records the matched inner text in an arena. Later passes
//! run over the top-level text and over every inner text recorded so far,
//! so a match never straddles two nodes.
//!
//! Pass order: links, `***x***`, `**x**`, `__x__`, `*x*`.

use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::protect::{
    marker, split_markers, Piece, Protected, ProtectedText, TOKEN_CLOSE, TOKEN_OPEN,
};
use crate::model::Inline;

const NODE_OPEN: char = '\u{E002}';
const NODE_CLOSE: char = '\u{E003}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Link,
    StrongEmphasis,
    Strong,
    StrongUnderscore,
    Emphasis,
}

impl Pass {
    const ORDER: [Pass; 5] = [
        Pass::Link,
        Pass::StrongEmphasis,
        Pass::Strong,
        Pass::StrongUnderscore,
        Pass::Emphasis,
    ];

    fn regex(self) -> &'static Regex {
        static LINK: OnceLock<Regex> = OnceLock::new();
        static TRIPLE: OnceLock<Regex> = OnceLock::new();
        static DOUBLE: OnceLock<Regex> = OnceLock::new();
        static UNDERSCORE: OnceLock<Regex> = OnceLock::new();
        static SINGLE: OnceLock<Regex> = OnceLock::new();

        let (cell, pattern) = match self {
            Pass::Link => (&LINK, r"\[([^\]\n]*)\]\(([^)\n]*)\)"),
            Pass::StrongEmphasis => (&TRIPLE, r"\*\*\*(.+?)\*\*\*"),
            Pass::Strong => (&DOUBLE, r"\*\*(.+?)\*\*"),
            Pass::StrongUnderscore => (&UNDERSCORE, r"__(.+?)__"),
            Pass::Emphasis => (&SINGLE, r"\*(.+?)\*"),
        };
        cell.get_or_init(|| Regex::new(pattern).expect("valid inline pattern"))
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Link { url: String },
    StrongEmphasis,
    Strong,
    Emphasis,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    inner: String,
}

/// Builds inline trees from tokenized line text.
pub(crate) struct InlineParser<'a> {
    protected: &'a ProtectedText,
}

impl<'a> InlineParser<'a> {
    /// Create a parser resolving tokens against `protected`.
    pub fn new(protected: &'a ProtectedText) -> Self {
        Self { protected }
    }

    /// Parse one line (or cell) of tokenized text.
    pub fn parse(&self, text: &str) -> Vec<Inline> {
        let mut arena: Vec<Node> = Vec::new();
        let mut top = text.to_string();

        for pass in Pass::ORDER {
            let existing = arena.len();
            top = self.apply(pass, &top, &mut arena);
            for index in 0..existing {
                let inner = std::mem::take(&mut arena[index].inner);
                arena[index].inner = self.apply(pass, &inner, &mut arena);
            }
        }

        self.build(&top, &arena, 0)
    }

    fn apply(&self, pass: Pass, text: &str, arena: &mut Vec<Node>) -> String {
        if !text.contains(['*', '_', '[']) {
            return text.to_string();
        }
        pass.regex()
            .replace_all(text, |caps: &Captures| {
                let kind = match pass {
                    Pass::Link => NodeKind::Link {
                        url: self.protected.restore(caps[2].trim()),
                    },
                    Pass::StrongEmphasis => NodeKind::StrongEmphasis,
                    Pass::Strong | Pass::StrongUnderscore => NodeKind::Strong,
                    Pass::Emphasis => NodeKind::Emphasis,
                };
                let index = arena.len();
                arena.push(Node {
                    kind,
                    inner: caps[1].to_string(),
                });
                marker(NODE_OPEN, index, NODE_CLOSE)
            })
            .into_owned()
    }

    fn build(&self, text: &str, arena: &[Node], depth: usize) -> Vec<Inline> {
        let mut out = Vec::new();

        for piece in split_markers(text, NODE_OPEN, NODE_CLOSE) {
            match piece {
                Piece::Text(s) => self.resolve_tokens(s, &mut out),
                Piece::Token(index) => {
                    // Markers are only ever created by this parser, but a
                    // corrupt index degrades to nothing rather than panicking.
                    let Some(node) = arena.get(index) else {
                        continue;
                    };
                    if depth > arena.len() {
                        continue;
                    }
                    let children = self.build(&node.inner, arena, depth + 1);
                    out.push(match &node.kind {
                        NodeKind::Link { url } => Inline::Link {
                            text: children,
                            url: url.clone(),
                        },
                        NodeKind::StrongEmphasis => Inline::StrongEmphasis(children),
                        NodeKind::Strong => Inline::Strong(children),
                        NodeKind::Emphasis => Inline::Emphasis(children),
                    });
                }
            }
        }
        out
    }

    fn resolve_tokens(&self, text: &str, out: &mut Vec<Inline>) {
        for piece in split_markers(text, TOKEN_OPEN, TOKEN_CLOSE) {
            match piece {
                Piece::Text(s) => push_text(out, s),
                Piece::Token(index) => match self.protected.get(index) {
                    Some(Protected::Math(span)) => out.push(Inline::Math(span.clone())),
                    Some(Protected::Fence(block)) => out.push(Inline::CodeBlock(block.clone())),
                    Some(Protected::Code(code)) => out.push(Inline::Code(code.clone())),
                    Some(Protected::Raw(source)) => push_text(out, source),
                    None => {}
                },
            }
        }
    }
}

fn push_text(out: &mut Vec<Inline>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Inline::Text(last)) = out.last_mut() {
        last.push_str(text);
    } else {
        out.push(Inline::text(text));
    }
}
