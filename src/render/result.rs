//! Rendering result with metadata and statistics.

use crate::model::document::count_u32;
use crate::model::{Block, Document, Inline, Metadata};
use serde::{Deserialize, Serialize};

/// Words per minute used for the reading-time estimate.
pub const WORDS_PER_MINUTE: u32 = 200;

/// Result of rendering a document, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered content
    pub content: String,

    /// Document metadata (copied from source document)
    pub metadata: Metadata,

    /// Document statistics
    pub stats: DocumentStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, metadata: Metadata, stats: DocumentStats) -> Self {
        Self {
            content,
            metadata,
            stats,
        }
    }

    /// Create a simple result with just content.
    pub fn content_only(content: String) -> Self {
        Self {
            content,
            metadata: Metadata::default(),
            stats: DocumentStats::default(),
        }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Statistics about a transformed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Whitespace-separated tokens in the raw input
    pub word_count: u32,

    /// Estimated reading time in whole minutes, rounded up
    pub reading_minutes: u32,

    /// Number of headings
    pub heading_count: u32,

    /// Number of paragraphs
    pub paragraph_count: u32,

    /// Number of lists
    pub list_count: u32,

    /// Number of list items
    pub list_item_count: u32,

    /// Number of tables
    pub table_count: u32,

    /// Number of math spans, display and inline
    pub math_count: u32,

    /// Number of fenced code blocks
    pub code_block_count: u32,

    /// Number of citation links
    pub citation_count: u32,
}

impl DocumentStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics from a parsed document.
    pub fn from_document(doc: &Document) -> Self {
        let mut stats = Self::new();
        stats.set_word_count(doc.metadata.word_count);

        for block in &doc.blocks {
            match block {
                Block::Heading { .. } => stats.heading_count += 1,
                Block::Paragraph { .. } => stats.paragraph_count += 1,
                Block::List { items, .. } => {
                    stats.list_count += 1;
                    stats.list_item_count =
                        stats.list_item_count.saturating_add(count_u32(items.len()));
                }
                Block::Table(_) => stats.table_count += 1,
                Block::Math(_) => stats.math_count += 1,
                Block::Code(_) => stats.code_block_count += 1,
                Block::Text { .. } | Block::Blockquote { .. } | Block::Raw { .. } => {}
            }
            block.for_each_inline(&mut |content| stats.count_inline(content));
        }
        stats
    }

    /// Set the word count and derive the reading time.
    pub fn set_word_count(&mut self, words: u32) {
        self.word_count = words;
        self.reading_minutes = reading_minutes(words);
    }

    fn count_inline(&mut self, content: &[Inline]) {
        for node in content {
            match node {
                Inline::Math(_) => self.math_count += 1,
                Inline::CodeBlock(_) => self.code_block_count += 1,
                Inline::Link { text, .. } => {
                    self.citation_count += 1;
                    self.count_inline(text);
                }
                Inline::Strong(children)
                | Inline::Emphasis(children)
                | Inline::StrongEmphasis(children) => self.count_inline(children),
                Inline::Text(_) | Inline::Code(_) => {}
            }
        }
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &DocumentStats) {
        self.set_word_count(self.word_count.saturating_add(other.word_count));
        self.heading_count = self.heading_count.saturating_add(other.heading_count);
        self.paragraph_count = self.paragraph_count.saturating_add(other.paragraph_count);
        self.list_count = self.list_count.saturating_add(other.list_count);
        self.list_item_count = self.list_item_count.saturating_add(other.list_item_count);
        self.table_count = self.table_count.saturating_add(other.table_count);
        self.math_count = self.math_count.saturating_add(other.math_count);
        self.code_block_count = self.code_block_count.saturating_add(other.code_block_count);
        self.citation_count = self.citation_count.saturating_add(other.citation_count);
    }
}

/// Reading time in minutes, rounded up.
pub fn reading_minutes(words: u32) -> u32 {
    words.div_ceil(WORDS_PER_MINUTE)
}
