//! JSON rendering of the parsed document model.
//!
//! A debugging aid: dumps the full document tree so a conversion that
//! produced surprising XML can be inspected stage by stage.

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Paragraph, Section};

    #[test]
    fn test_to_json_pretty() {
        let mut doc = Document::new();
        doc.front.title = "Test".to_string();
        let mut sec = Section::new("Introduction", "1", 1);
        sec.add_block(Block::Paragraph(Paragraph::with_text("Hello")));
        doc.sections.push(sec);

        let json = to_json(&doc, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("Introduction"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let doc = Document::new();
        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
    }
}
