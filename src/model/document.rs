//! Document-level types.

use super::{Block, Inline};
use serde::{Deserialize, Serialize};

/// A transformed document: an ordered sequence of blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata
    pub metadata: Metadata,

    /// Blocks in source order
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block to the document.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Check if the document has any blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get the number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::plain_text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Text of the first level-1 heading, if any.
    pub fn title(&self) -> Option<String> {
        self.blocks.iter().find_map(|block| match block {
            Block::Heading { level: 1, content } => Some(super::inline::plain_text(content)),
            _ => None,
        })
    }

    /// All links in document order, as citations.
    pub fn citations(&self) -> Vec<Citation> {
        let mut citations = Vec::new();
        for block in &self.blocks {
            block.for_each_inline(&mut |content| collect_links(content, &mut citations));
        }
        citations
    }
}

fn collect_links(content: &[Inline], out: &mut Vec<Citation>) {
    for node in content {
        match node {
            Inline::Link { text, url } => out.push(Citation {
                text: super::inline::plain_text(text),
                url: url.clone(),
            }),
            Inline::Strong(children)
            | Inline::Emphasis(children)
            | Inline::StrongEmphasis(children) => collect_links(children, out),
            _ => {}
        }
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Whitespace-separated words in the raw input
    pub word_count: u32,

    /// Characters in the raw input
    pub char_count: u32,
}

impl Metadata {
    /// Measure raw input text.
    pub fn from_source(source: &str) -> Self {
        Self {
            word_count: count_u32(source.split_whitespace().count()),
            char_count: count_u32(source.chars().count()),
        }
    }
}

/// Narrow a count to `u32`, saturating at `u32::MAX`.
pub(crate) fn count_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// A link collected for bibliography generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Visible link text
    pub text: String,
    /// Link target
    pub url: String,
}
