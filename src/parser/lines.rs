//! Line reading and page-break stripping.
//!
//! The line reader turns raw draft text into numbered [`SourceLine`]s.
//! The stripper removes the pagination furniture xml2rfc inserts: form
//! feeds, `[Page n]` footers, and the running header repeated at the top
//! of every page. Original line numbers are retained so downstream
//! diagnostics can point at the input file.

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};
use unicode_normalization::UnicodeNormalization;

use crate::model::SourceLine;

/// Split raw text into numbered, right-trimmed source lines.
///
/// Input is NFC-normalized before any pattern matching so that composed
/// and decomposed spellings of the same author name compare equal.
pub fn read_lines(text: &str) -> Vec<SourceLine> {
    let text: String = text.nfc().collect();
    text.split('\n')
        .enumerate()
        // Trailing form feeds are page-boundary markers and must survive
        // until the stripper has seen them.
        .map(|(i, line)| SourceLine::new(i + 1, line.trim_end_matches([' ', '\t', '\r'])))
        .collect()
}

/// Counts of what the stripper removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StripStats {
    /// Total lines dropped (furniture and page-boundary padding).
    pub removed: usize,

    /// Number of page boundaries seen.
    pub pages: usize,
}

// Footer: "Doe                  Expires January 2026                  [Page 12]".
// The brackets are required; prose lines ending in "page 12" must survive.
static PAGE_FOOTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[Pp]age [0-9ivxlc]+\]\s*$").unwrap());

// Running headers repeated at the top of every page. All end in a year
// and carry the title or document name in the middle column.
static RUNNING_HEADERS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"(?i)^ *Internet.Draft.{2,}(19|20)[0-9][0-9] *$",
        r"(?i)^ *Draft.+(  +).*(19|20)[0-9][0-9] *$",
        r"(?i)^RFC ?-?[0-9]+.*(  +).*(19|20)[0-9][0-9] *$",
        r"^draft-[-a-z0-9_.]+.*[0-9][0-9][0-9][0-9]$",
    ])
    .unwrap()
});

// Document name repeated on a line of its own directly under the header.
static DOCNAME_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ *draft-[-a-z0-9_.]+ *$").unwrap());

/// Remove running headers/footers and page-boundary padding.
///
/// Paragraphs split across a page boundary are rejoined: the blank
/// padding around a boundary collapses to a single blank line when the
/// text before the boundary ended a sentence, and to nothing when it did
/// not. Lines keep their original numbers. Text with no page furniture
/// passes through unchanged, and running the stripper on its own output
/// is a no-op.
pub fn strip_pagebreaks(lines: &[SourceLine]) -> (Vec<SourceLine>, StripStats) {
    let mut out: Vec<SourceLine> = Vec::with_capacity(lines.len());
    let mut stats = StripStats::default();
    let mut pending_blanks: Vec<SourceLine> = Vec::new();
    let mut newpage = false;
    let mut sentence = true;

    for line in lines {
        if PAGE_FOOTER.is_match(&line.text) && !line.is_blank() {
            stats.removed += 1;
            continue;
        }
        if line.text.contains('\u{c}') {
            newpage = true;
            stats.pages += 1;
            stats.removed += 1;
            continue;
        }
        if RUNNING_HEADERS.is_match(&line.text) {
            newpage = true;
            stats.removed += 1;
            continue;
        }
        if newpage && DOCNAME_ONLY.is_match(&line.text) {
            stats.removed += 1;
            continue;
        }
        if line.is_blank() {
            pending_blanks.push(line.clone());
            continue;
        }

        // Non-blank content: decide what the buffered blanks become.
        if newpage {
            stats.removed += pending_blanks.len();
            if sentence {
                // Distinct paragraphs on either side of the boundary;
                // keep one separating blank.
                out.push(SourceLine::new(line.num, ""));
                stats.removed = stats.removed.saturating_sub(1);
            }
        } else {
            out.append(&mut pending_blanks);
        }
        pending_blanks.clear();
        newpage = false;

        sentence = line.text.ends_with(['.', ':', '!', '?'])
            || !line.text.starts_with(' ');
        out.push(line.clone());
    }

    // Trailing blanks at end of input are dropped.
    stats.removed += pending_blanks.len();

    (out, stats)
}

/// Join cleaned lines into strip-only output text, with a trailing newline.
pub fn lines_to_text(lines: &[SourceLine]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.text);
        out.push('\n');
    }
    out
}
