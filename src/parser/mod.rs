//! Draft parsing module.

pub mod frontmatter;
pub mod lines;
mod options;
pub mod reference;
pub mod structure;

pub use lines::{lines_to_text, read_lines, strip_pagebreaks, StripStats};
pub use options::ParseOptions;

use std::collections::HashSet;

use crate::diag::Diagnostics;
use crate::model::Document;

/// Parser for xml2rfc-rendered draft text.
///
/// Runs the full pipeline: line reading, page-break stripping,
/// structural reconstruction, front-matter extraction, and reference
/// parsing. Recoverable anomalies are collected as diagnostics; the
/// parser itself always produces a (possibly degraded) document.
#[derive(Debug, Default)]
pub struct DraftParser {
    options: ParseOptions,
}

impl DraftParser {
    /// Create a parser with the given options.
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Parse draft text into a document plus collected diagnostics.
    pub fn parse(&self, text: &str) -> (Document, Diagnostics) {
        let mut diags = Diagnostics::new();

        let raw = read_lines(text);
        let (stripped, stats) = strip_pagebreaks(&raw);
        log::debug!(
            "stripped {} furniture lines across {} page boundaries",
            stats.removed,
            stats.pages
        );

        let st = structure::parse_structure(&stripped, &mut diags);

        let mut doc = Document::new();
        doc.front = frontmatter::parse_front_matter(
            &st.front_lines,
            st.abstract_paragraphs,
            &st.address_lines,
            &self.options,
            &mut diags,
        );
        doc.sections = st.sections;
        for (title, block) in &st.reference_blocks {
            doc.references
                .push(reference::parse_reference_section(title, block, &mut diags));
        }

        self.check_anchor_uniqueness(&doc, &mut diags);
        (doc, diags)
    }

    /// Duplicate anchors make the output invalid for xml2rfc; report
    /// them, but keep converting.
    fn check_anchor_uniqueness(&self, doc: &Document, diags: &mut Diagnostics) {
        let mut seen = HashSet::new();
        for entry in doc.all_references() {
            if !seen.insert(entry.anchor.as_str()) {
                diags.warn(entry.line, format!("duplicate reference anchor [{}]", entry.anchor));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAFT: &str = "\
Network Working Group                                             J. Doe
Internet-Draft                                               Example Inc
Intended status: Informational                             5 August 2025


                       The Example Transfer Protocol
                        draft-doe-example-transfer-02

Abstract

   An example protocol used to exercise the converter.

1.  Introduction

   This is the introduction.

2.  Informative References

   [RFC2119]  Bradner, S., \"Key words for use in RFCs to Indicate
              Requirement Levels\", BCP 14, RFC 2119, March 1997.

   [RFC2119]  Bradner, S., \"Key words for use in RFCs to Indicate
              Requirement Levels\", BCP 14, RFC 2119, March 1997.

Author's Address

   Jane Doe
   Example Inc

   Email: jane@example.com
";

    #[test]
    fn test_full_pipeline() {
        let parser = DraftParser::default();
        let (doc, _) = parser.parse(DRAFT);

        assert_eq!(doc.front.title, "The Example Transfer Protocol");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.references.len(), 1);
        assert_eq!(doc.front.authors[0].email.as_deref(), Some("jane@example.com"));
    }

    #[test]
    fn test_duplicate_anchor_reported() {
        let parser = DraftParser::default();
        let (doc, diags) = parser.parse(DRAFT);

        assert_eq!(doc.all_references().count(), 2);
        assert!(diags
            .iter()
            .any(|d| d.message.contains("duplicate reference anchor [RFC2119]")));
    }
}
