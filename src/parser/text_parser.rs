//! Raw text parser: cleanup, protection pre-pass, block and inline parsing.

use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::model::{Document, Metadata};

use super::block::BlockParser;
use super::cleanup::CleanupPipeline;
use super::options::ParseOptions;
use super::protect::ProtectedText;

/// Parser turning loosely Markdown-flavored text into a [`Document`].
///
/// Parsing is total: every input produces a document, possibly empty.
#[derive(Debug, Clone, Default)]
pub struct TextParser {
    options: ParseOptions,
}

impl TextParser {
    /// Create a parser with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom options.
    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Get the parser options.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse raw text into a document.
    pub fn parse(&self, input: &str) -> Document {
        let mut document = Document::new();
        document.metadata = Metadata::from_source(input);

        let cleaned = CleanupPipeline::new(self.options.cleanup.clone()).process(input);
        if cleaned.trim().is_empty() {
            log::debug!("input is blank, producing empty document");
            return document;
        }

        let protected = ProtectedText::protect(&cleaned, self.options.strict_inline_math);
        document.blocks = BlockParser::new(&protected).parse();

        log::debug!(
            "parsed {} bytes into {} blocks",
            input.len(),
            document.block_count()
        );
        document
    }

    /// Read and parse a UTF-8 text file.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Document> {
        let text = std::fs::read_to_string(path)?;
        Ok(self.parse(&text))
    }

    /// Read and parse UTF-8 text from a reader.
    pub fn parse_reader<R: Read>(&self, mut reader: R) -> Result<Document> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(self.parse(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Inline, MathSpan};

    #[test]
    fn test_blank_input_is_empty_document() {
        let parser = TextParser::new();
        assert!(parser.parse("").is_empty());
        assert!(parser.parse(" \n\t\n ").is_empty());
    }

    #[test]
    fn test_metadata_counts_raw_input() {
        let doc = TextParser::new().parse("# Title\n\nsome body text");
        assert_eq!(doc.metadata.word_count, 5);
        assert_eq!(doc.block_count(), 2);
    }

    #[test]
    fn test_crlf_input() {
        let doc = TextParser::new().parse("# A\r\n\r\nb");
        assert_eq!(doc.block_count(), 2);
        assert_eq!(doc.title(), Some("A".to_string()));
    }

    #[test]
    fn test_compat_inline_math_option() {
        let parser = TextParser::with_options(ParseOptions::new().compat_inline_math());
        let doc = parser.parse("costs $5 and $10");
        assert_eq!(
            doc.blocks,
            vec![Block::Paragraph {
                lines: vec![vec![
                    Inline::text("costs "),
                    Inline::Math(MathSpan::inline("5 and ")),
                    Inline::text("10"),
                ]]
            }]
        );
    }

    #[test]
    fn test_parse_reader() {
        let doc = TextParser::new()
            .parse_reader("- a\n- b".as_bytes())
            .unwrap();
        assert_eq!(doc.block_count(), 1);
        assert!(doc.blocks[0].is_list());
    }
}
