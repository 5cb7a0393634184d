//! Plain text rendering for transformed documents.

use crate::error::Result;
use crate::model::Document;

/// Convert a document to plain text, dropping all markup.
pub fn to_text(doc: &Document) -> Result<String> {
    Ok(doc.plain_text().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::TextParser;

    #[test]
    fn test_to_text() {
        let doc = TextParser::new().parse("# Hello, **world**!\n\nSee [docs](https://x.example).");
        let result = to_text(&doc).unwrap();

        assert_eq!(result, "Hello, world!\n\nSee docs.");
    }
}
