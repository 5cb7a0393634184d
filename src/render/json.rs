//! JSON rendering of the document tree.

use crate::error::{Error, Result};
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Load a document tree previously written by [`to_json`].
pub fn from_json(json: &str) -> Result<Document> {
    serde_json::from_str(json).map_err(|e| Error::Render(format!("JSON parse error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::TextParser;

    #[test]
    fn test_to_json_pretty() {
        let doc = TextParser::new().parse("## Test");

        let json = to_json(&doc, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"type\": \"heading\""));
        assert!(json.contains("\"level\": 2"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let doc = TextParser::new().parse("| A |\n|---|\n| 1 |");

        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        assert!(json.contains("\"type\":\"table\""));
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_json_round_trip() {
        let doc = TextParser::new().parse("- **a** $x$\n\n> [q](u)");
        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        assert_eq!(from_json(&json).unwrap(), doc);
        assert!(from_json("{\"blocks\": 3}").is_err());
    }
}
