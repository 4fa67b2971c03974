//! Structural reconstruction: sections, paragraphs, and artwork.
//!
//! A finite-state walker classifies each stripped line by indentation and
//! heading conventions, building the section tree and routing the special
//! regions (front matter, abstract, references, author addresses) to
//! their dedicated parsers.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::diag::Diagnostics;
use crate::model::{Artwork, Block, Paragraph, Section, SourceLine};

/// Raw structural split of a stripped draft.
///
/// Sections hold the body tree; the special regions are handed over as
/// lines (or pre-built paragraphs) for the front-matter and reference
/// parsers to interpret.
#[derive(Debug, Default)]
pub struct Structure {
    /// Lines preceding the first recognized heading.
    pub front_lines: Vec<SourceLine>,

    /// Body section tree.
    pub sections: Vec<Section>,

    /// Paragraphs of the Abstract section.
    pub abstract_paragraphs: Vec<Paragraph>,

    /// Raw lines of each references section, with its heading title.
    pub reference_blocks: Vec<(String, Vec<SourceLine>)>,

    /// Raw lines of the Authors' Addresses section.
    pub address_lines: Vec<SourceLine>,
}

static NUMBERED_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)*)\.?\s+(\S.*)$").unwrap());

static APPENDIX_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Appendix\s+([A-Z])((?:\.\d+)*)\.?\s*(.*)$").unwrap());

// Unnumbered headings xml2rfc emits at the left margin.
const KNOWN_HEADINGS: &[&str] = &[
    "abstract",
    "status of this memo",
    "copyright notice",
    "table of contents",
    "introduction",
    "acknowledgements",
    "acknowledgments",
    "contributors",
    "references",
    "normative references",
    "informative references",
    "author's address",
    "authors' addresses",
    "index",
];

const BOILERPLATE: &[&str] = &["status of this memo", "copyright notice", "table of contents"];

#[derive(Debug, Clone)]
struct Heading {
    number: String,
    title: String,
    depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Body,
    Abstract,
    Skip,
    Refs,
    Addresses,
}

/// Reconstruct document structure from stripped lines.
pub fn parse_structure(lines: &[SourceLine], diags: &mut Diagnostics) -> Structure {
    let margin = body_margin(lines);

    let first = (0..lines.len()).find(|&i| heading_at(lines, i, false).is_some());
    let Some(first) = first else {
        return degraded(lines, margin, diags);
    };

    let mut walker = Walker::new(margin, diags);
    walker.st.front_lines = lines[..first].to_vec();
    walker.walk(&lines[first..]);
    walker.finish()
}

/// Modal indentation of indented non-blank lines; xml2rfc uses 3.
fn body_margin(lines: &[SourceLine]) -> usize {
    let mut counts = [0usize; 16];
    for line in lines {
        if !line.is_blank() {
            let indent = line.indent();
            if (1..16).contains(&indent) {
                counts[indent] += 1;
            }
        }
    }
    counts
        .iter()
        .enumerate()
        .max_by_key(|(_, &n)| n)
        .filter(|(_, &n)| n > 0)
        .map(|(i, _)| i)
        .unwrap_or(3)
}

/// Try to interpret the line at `idx` as a section heading.
///
/// Generic (unlisted, unnumbered) headings are only accepted once the
/// document body has started; the first-page header block is full of
/// short capitalized lines that would otherwise match.
fn heading_at(lines: &[SourceLine], idx: usize, allow_generic: bool) -> Option<Heading> {
    let line = &lines[idx];
    if line.is_blank() || line.indent() > 0 {
        return None;
    }
    let text = line.text.as_str();

    if let Some(c) = NUMBERED_HEADING.captures(text) {
        let number = c[1].to_string();
        let depth = number.split('.').count();
        return Some(Heading {
            number,
            title: c[2].trim().to_string(),
            depth,
        });
    }
    if let Some(c) = APPENDIX_HEADING.captures(text) {
        let number = format!("{}{}", &c[1], &c[2]);
        let depth = 1 + c[2].matches('.').count();
        return Some(Heading {
            number,
            title: c[3].trim().to_string(),
            depth,
        });
    }

    let lower = text.trim_end_matches(':').to_lowercase();
    if KNOWN_HEADINGS.contains(&lower.as_str()) {
        return Some(Heading {
            number: String::new(),
            title: text.trim().to_string(),
            depth: 1,
        });
    }

    // Generic unnumbered heading: short, capitalized, no terminal period,
    // no column gaps, followed by a blank line.
    let next_blank = lines.get(idx + 1).map_or(true, |l| l.is_blank());
    if allow_generic
        && next_blank
        && !text.contains("   ")
        && text.len() <= 72
        && text.split_whitespace().count() <= 10
        && text.starts_with(|c: char| c.is_ascii_uppercase())
        && !text.ends_with('.')
    {
        return Some(Heading {
            number: String::new(),
            title: text.trim().to_string(),
            depth: 1,
        });
    }
    None
}

struct Walker<'a> {
    margin: usize,
    mode: Mode,
    stack: Vec<Section>,
    roots: Vec<Section>,
    // Open paragraph: (first line number, trimmed physical lines).
    para: Option<(usize, Vec<String>)>,
    // Open artwork: (first line number, verbatim lines, pending blanks).
    art: Option<(usize, Vec<String>, usize)>,
    st: Structure,
    diags: &'a mut Diagnostics,
}

impl<'a> Walker<'a> {
    fn new(margin: usize, diags: &'a mut Diagnostics) -> Self {
        Self {
            margin,
            mode: Mode::Body,
            stack: Vec::new(),
            roots: Vec::new(),
            para: None,
            art: None,
            st: Structure::default(),
            diags,
        }
    }

    fn walk(&mut self, lines: &[SourceLine]) {
        for (i, line) in lines.iter().enumerate() {
            let heading = heading_at(lines, i, true);

            // Reference and address regions are captured verbatim; their
            // dedicated parsers do the interpretation.
            if matches!(self.mode, Mode::Refs | Mode::Addresses) && heading.is_none() {
                match self.mode {
                    Mode::Refs => {
                        if let Some((_, block)) = self.st.reference_blocks.last_mut() {
                            block.push(line.clone());
                        }
                    }
                    Mode::Addresses => self.st.address_lines.push(line.clone()),
                    _ => unreachable!(),
                }
                continue;
            }

            if let Some(h) = heading {
                self.flush_para();
                self.flush_art();
                self.handle_heading(h, line.num);
                continue;
            }

            if line.is_blank() {
                self.flush_para();
                if let Some((_, _, blanks)) = self.art.as_mut() {
                    *blanks += 1;
                }
                continue;
            }

            if self.mode == Mode::Skip {
                continue;
            }

            if line.indent() > self.margin {
                if let Some((_, parts)) = self.para.as_mut() {
                    // Hanging continuation of an open paragraph.
                    parts.push(line.text.trim().to_string());
                } else {
                    match self.art.as_mut() {
                        Some((_, art_lines, blanks)) => {
                            for _ in 0..*blanks {
                                art_lines.push(String::new());
                            }
                            *blanks = 0;
                            art_lines.push(line.text.clone());
                        }
                        None => {
                            self.art = Some((line.num, vec![line.text.clone()], 0));
                        }
                    }
                }
            } else {
                self.flush_art();
                match self.para.as_mut() {
                    Some((_, parts)) => parts.push(line.text.trim().to_string()),
                    None => self.para = Some((line.num, vec![line.text.trim().to_string()])),
                }
            }
        }
    }

    fn handle_heading(&mut self, h: Heading, num: usize) {
        let lower = h.title.trim_end_matches(':').to_lowercase();

        if lower == "abstract" {
            self.mode = Mode::Abstract;
        } else if BOILERPLATE.contains(&lower.as_str()) {
            self.mode = Mode::Skip;
        } else if lower.ends_with("references") {
            self.st.reference_blocks.push((h.title, Vec::new()));
            self.mode = Mode::Refs;
        } else if lower.starts_with("author") && lower.contains("address") {
            self.mode = Mode::Addresses;
        } else {
            self.mode = Mode::Body;
            self.open_section(h, num);
        }
    }

    fn open_section(&mut self, h: Heading, num: usize) {
        let mut depth = h.depth;
        while self.stack.last().is_some_and(|s| s.depth >= depth) {
            let done = self.stack.pop().expect("stack checked non-empty");
            self.attach_section(done);
        }
        let max_allowed = self.stack.last().map_or(1, |s| s.depth + 1);
        if depth > max_allowed {
            self.diags.warn(
                num,
                format!(
                    "section '{}' jumps to depth {}, clamping to {}",
                    h.title, depth, max_allowed
                ),
            );
            depth = max_allowed;
        }
        let mut sec = Section::new(h.title, h.number, depth);
        sec.line = num;
        self.stack.push(sec);
    }

    fn attach_section(&mut self, sec: Section) {
        match self.stack.last_mut() {
            Some(parent) => parent.add_block(Block::Section(sec)),
            None => self.roots.push(sec),
        }
    }

    fn attach_block(&mut self, block: Block) {
        match self.mode {
            Mode::Body => {
                if let Some(sec) = self.stack.last_mut() {
                    sec.add_block(block);
                }
            }
            Mode::Abstract => {
                // An abstract holds prose only; anything indented is
                // folded back into a paragraph.
                let para = match block {
                    Block::Paragraph(p) => p,
                    Block::Artwork(a) => {
                        let mut p = Paragraph::with_text(
                            a.lines
                                .iter()
                                .map(|l| l.trim())
                                .collect::<Vec<_>>()
                                .join(" "),
                        );
                        p.line = a.line;
                        p
                    }
                    Block::Section(_) => return,
                };
                self.st.abstract_paragraphs.push(para);
            }
            Mode::Skip | Mode::Refs | Mode::Addresses => {}
        }
    }

    fn flush_para(&mut self) {
        if let Some((num, parts)) = self.para.take() {
            let mut p = Paragraph::with_text(parts.join(" "));
            p.line = num;
            if !p.is_empty() {
                self.attach_block(Block::Paragraph(p));
            }
        }
    }

    fn flush_art(&mut self) {
        if let Some((num, lines, _trailing_blanks)) = self.art.take() {
            let mut a = Artwork::new(lines);
            a.line = num;
            if !a.is_empty() {
                self.attach_block(Block::Artwork(a));
            }
        }
    }

    fn finish(mut self) -> Structure {
        self.flush_para();
        self.flush_art();
        while let Some(sec) = self.stack.pop() {
            self.attach_section(sec);
        }
        self.st.sections = std::mem::take(&mut self.roots);
        self.st
            .reference_blocks
            .retain(|(_, block)| block.iter().any(|l| !l.is_blank()));
        self.st
    }
}

/// No recognizable heading: one top-level section of paragraphs.
fn degraded(lines: &[SourceLine], margin: usize, diags: &mut Diagnostics) -> Structure {
    diags.warn_global("no recognizable section heading; treating document as a single section");

    // Keep the leading contiguous block as front matter candidate text.
    let split = lines
        .iter()
        .position(|l| l.is_blank())
        .unwrap_or(lines.len());

    let mut walker = Walker::new(margin, diags);
    walker.st.front_lines = lines[..split].to_vec();
    walker.stack.push(Section::new("", "", 1));
    walker.walk(&lines[split..]);
    walker.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lines::read_lines;

    fn structure_of(text: &str) -> (Structure, Diagnostics) {
        let lines = read_lines(text);
        let mut diags = Diagnostics::new();
        let st = parse_structure(&lines, &mut diags);
        (st, diags)
    }

    const SIMPLE: &str = "\
Some Working Group                                                J. Doe

                          A Test Protocol

Abstract

   This document tests the parser.

1.  Introduction

   The introduction paragraph spans
   two physical lines.

1.1.  Details

   Details here.

      +--------+
      | figure |
      +--------+

2.  Second Section

   Final text.
";

    #[test]
    fn test_front_region_ends_at_first_heading() {
        let (st, _) = structure_of(SIMPLE);
        assert!(st
            .front_lines
            .iter()
            .any(|l| l.text.contains("A Test Protocol")));
        assert!(!st.front_lines.iter().any(|l| l.text.contains("Abstract")));
    }

    #[test]
    fn test_abstract_routed_to_front() {
        let (st, _) = structure_of(SIMPLE);
        assert_eq!(st.abstract_paragraphs.len(), 1);
        assert_eq!(
            st.abstract_paragraphs[0].text,
            "This document tests the parser."
        );
    }

    #[test]
    fn test_section_tree_depths() {
        let (st, _) = structure_of(SIMPLE);
        assert_eq!(st.sections.len(), 2);
        assert_eq!(st.sections[0].title, "Introduction");
        assert_eq!(st.sections[0].depth, 1);

        let nested: Vec<_> = st.sections[0]
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Section(s) => Some(s),
                _ => None,
            })
            .collect();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].title, "Details");
        assert_eq!(nested[0].depth, 2);
    }

    #[test]
    fn test_paragraph_reflow() {
        let (st, _) = structure_of(SIMPLE);
        match &st.sections[0].blocks[0] {
            Block::Paragraph(p) => {
                assert_eq!(p.text, "The introduction paragraph spans two physical lines.");
            }
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_artwork_detected_and_preserved() {
        let (st, _) = structure_of(SIMPLE);
        let details = match &st.sections[0].blocks[1] {
            Block::Section(s) => s,
            other => panic!("expected section, got {:?}", other),
        };
        let art = details
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Artwork(a) => Some(a),
                _ => None,
            })
            .expect("artwork block");
        assert_eq!(art.lines[0], "      +--------+");
        assert_eq!(art.lines.len(), 3);
    }

    #[test]
    fn test_depth_jump_clamped() {
        let text = "\
1.  Top

   Text.

1.1.1.  Too Deep

   More text.
";
        let (st, diags) = structure_of(text);
        assert!(!diags.is_empty());
        let child = st.sections[0]
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Section(s) => Some(s),
                _ => None,
            })
            .unwrap();
        assert_eq!(child.depth, 2);
    }

    #[test]
    fn test_no_heading_degrades_to_single_section() {
        let text = "Just some text\n\n   without any heading at all.\n";
        let (st, diags) = structure_of(text);
        assert_eq!(st.sections.len(), 1);
        assert!(diags.iter().any(|d| d.message.contains("no recognizable")));
    }

    #[test]
    fn test_references_block_captured() {
        let text = "\
1.  Introduction

   Intro.

2.  References

2.1.  Normative References

   [RFC2119]  Bradner, S., \"Key words\", RFC 2119, March 1997.

3.  More

   Tail.
";
        let (st, _) = structure_of(text);
        assert_eq!(st.reference_blocks.len(), 1);
        assert_eq!(st.reference_blocks[0].0, "Normative References");
        assert!(st.reference_blocks[0]
            .1
            .iter()
            .any(|l| l.text.contains("[RFC2119]")));
        // The empty parent "References" block is dropped.
        assert_eq!(st.sections.len(), 2);
        assert_eq!(st.sections[1].title, "More");
    }
}
