//! Block-level types.

use super::{inline, CodeBlock, Inline, MathSpan, Table};
use serde::{Deserialize, Serialize};

/// Kind of list marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    /// `-` or `*` items
    Unordered,
    /// `N.` items
    Ordered,
}

/// A block-level element of a transformed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Heading, levels 1-4
    Heading {
        /// Heading level
        level: u8,
        /// Heading content
        content: Vec<Inline>,
    },

    /// Prose lines, joined with explicit line breaks
    Paragraph {
        /// One entry per source line
        lines: Vec<Vec<Inline>>,
    },

    /// A prose line inside a chunk that begins with a structural element;
    /// emitted without a paragraph wrapper
    Text {
        /// Line content
        content: Vec<Inline>,
    },

    /// `>` quote line
    Blockquote {
        /// Quote content
        content: Vec<Inline>,
    },

    /// A run of adjacent list items of the same kind
    List {
        /// Marker kind
        kind: ListKind,
        /// Number of the first ordered item as written in the source
        start: Option<u64>,
        /// Item contents
        items: Vec<Vec<Inline>>,
    },

    /// Fenced code on a line of its own
    Code(CodeBlock),

    /// Display math on a line of its own
    Math(MathSpan),

    /// Pipe table
    Table(Table),

    /// Previously produced markup, passed through verbatim
    Raw {
        /// Markup source
        content: String,
    },
}

impl Block {
    /// Check if this block is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, Block::Heading { .. })
    }

    /// Check if this block is a list.
    pub fn is_list(&self) -> bool {
        matches!(self, Block::List { .. })
    }

    /// Get plain text content of the block.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Heading { content, .. }
            | Block::Text { content }
            | Block::Blockquote { content } => inline::plain_text(content),
            Block::Paragraph { lines } => lines
                .iter()
                .map(|line| inline::plain_text(line))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::List { items, .. } => items
                .iter()
                .map(|item| inline::plain_text(item))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Code(code) => code.code.clone(),
            Block::Math(span) => span.source.clone(),
            Block::Table(table) => table.plain_text(),
            Block::Raw { content } => content.clone(),
        }
    }

    /// Visit every inline sequence contained in this block.
    pub fn for_each_inline<'a>(&'a self, f: &mut impl FnMut(&'a [Inline])) {
        match self {
            Block::Heading { content, .. }
            | Block::Text { content }
            | Block::Blockquote { content } => f(content.as_slice()),
            Block::Paragraph { lines } => lines.iter().for_each(|line| f(line.as_slice())),
            Block::List { items, .. } => items.iter().for_each(|item| f(item.as_slice())),
            Block::Table(table) => {
                table.header.iter().for_each(|cell| f(cell.as_slice()));
                table
                    .rows
                    .iter()
                    .flat_map(|row| row.iter())
                    .for_each(|cell| f(cell.as_slice()));
            }
            Block::Code(_) | Block::Math(_) | Block::Raw { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_plain_text() {
        let list = Block::List {
            kind: ListKind::Unordered,
            start: None,
            items: vec![vec![Inline::text("one")], vec![Inline::text("two")]],
        };
        assert_eq!(list.plain_text(), "one\ntwo");
        assert!(list.is_list());
        assert!(!list.is_heading());
    }

    #[test]
    fn test_for_each_inline_visits_table_cells() {
        let mut table = Table::new(vec![vec![Inline::text("A")]], vec![]);
        table.add_row(vec![vec![Inline::text("1")]]);
        let block = Block::Table(table);

        let mut seen = Vec::new();
        block.for_each_inline(&mut |content| seen.push(inline::plain_text(content)));
        assert_eq!(seen, vec!["A", "1"]);
    }
}
