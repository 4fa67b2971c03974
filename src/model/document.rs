//! Document-level types.

use serde::{Deserialize, Serialize};

use super::{FrontMatter, ReferenceSection};

/// A single numbered line of input text.
///
/// Produced once by the line reader and never mutated; the original line
/// number survives page-break stripping so diagnostics can point at the
/// position in the file the user is looking at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLine {
    /// Line number in the raw input (1-based).
    pub num: usize,

    /// Line text, right-trimmed.
    pub text: String,
}

impl SourceLine {
    /// Create a new source line.
    pub fn new(num: usize, text: impl Into<String>) -> Self {
        Self {
            num,
            text: text.into(),
        }
    }

    /// Check whether the line is blank.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Number of leading spaces.
    pub fn indent(&self) -> usize {
        self.text.len() - self.text.trim_start_matches(' ').len()
    }
}

/// A parsed draft document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Front matter (title, authors, date, process metadata).
    pub front: FrontMatter,

    /// Body sections, in document order.
    pub sections: Vec<Section>,

    /// Reference sections (normative/informative), in document order.
    pub references: Vec<ReferenceSection>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            front: FrontMatter::default(),
            sections: Vec::new(),
            references: Vec::new(),
        }
    }

    /// Check if the document has any body content.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.references.is_empty()
    }

    /// Iterate over every reference entry across all reference sections.
    pub fn all_references(&self) -> impl Iterator<Item = &super::Reference> {
        self.references.iter().flat_map(|s| s.entries.iter())
    }

    /// Get plain text content of the entire body.
    pub fn plain_text(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// A document section with heading and nested content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Heading text, without the numbering prefix.
    pub title: String,

    /// Numbering prefix as it appeared in the source (e.g. `3.2.1`),
    /// empty for unnumbered sections.
    pub number: String,

    /// Nesting depth (1 = top level).
    pub depth: usize,

    /// Source line the heading was found on.
    pub line: usize,

    /// Child content in document order.
    pub blocks: Vec<Block>,
}

impl Section {
    /// Create a new empty section.
    pub fn new(title: impl Into<String>, number: impl Into<String>, depth: usize) -> Self {
        Self {
            title: title.into(),
            number: number.into(),
            depth,
            line: 0,
            blocks: Vec::new(),
        }
    }

    /// Add a block to this section.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Check whether the section has no content (empty sections are legal).
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get plain text of the section including nested sections.
    pub fn plain_text(&self) -> String {
        let mut parts = vec![self.title.clone()];
        for block in &self.blocks {
            match block {
                Block::Paragraph(p) => parts.push(p.text.clone()),
                Block::Artwork(a) => parts.push(a.text()),
                Block::Section(s) => parts.push(s.plain_text()),
            }
        }
        parts.join("\n\n")
    }
}

/// Content block inside a section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A re-flowed text paragraph.
    Paragraph(Paragraph),

    /// A verbatim artwork/figure block.
    Artwork(Artwork),

    /// A nested subsection.
    Section(Section),
}

/// A paragraph of re-flowed text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    /// Logical text, physical lines joined with single spaces.
    pub text: String,

    /// Source line the paragraph starts on.
    pub line: usize,
}

impl Paragraph {
    /// Create a paragraph from already re-flowed text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            line: 0,
        }
    }

    /// Check if the paragraph is empty.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Number of words in the paragraph.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// A verbatim block whose lines are never re-flowed.
///
/// Lines are preserved exactly as read (right-trimmed only), including
/// their left margin, so output is newline-for-newline identical to the
/// input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artwork {
    /// The verbatim lines.
    pub lines: Vec<String>,

    /// Source line the block starts on.
    pub line: usize,
}

impl Artwork {
    /// Create an artwork block from verbatim lines.
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines, line: 0 }
    }

    /// The block content as a single newline-joined string.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Check if the block is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_line_indent() {
        let line = SourceLine::new(3, "   indented text");
        assert_eq!(line.indent(), 3);
        assert!(!line.is_blank());
        assert!(SourceLine::new(4, "   ").is_blank());
    }

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.all_references().count(), 0);
    }

    #[test]
    fn test_section_nesting() {
        let mut top = Section::new("Protocol Overview", "3", 1);
        let mut child = Section::new("Message Flow", "3.1", 2);
        child.add_block(Block::Paragraph(Paragraph::with_text("Messages flow.")));
        top.add_block(Block::Section(child));

        assert!(!top.is_empty());
        assert!(top.plain_text().contains("Messages flow."));
    }

    #[test]
    fn test_artwork_text_preserves_lines() {
        let art = Artwork::new(vec![
            "   +----+".to_string(),
            "   | A  |".to_string(),
            "   +----+".to_string(),
        ]);
        assert_eq!(art.text(), "   +----+\n   | A  |\n   +----+");
    }
}
