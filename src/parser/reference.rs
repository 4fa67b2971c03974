//! Reference-entry parsing with an ordered matcher chain.
//!
//! Citation formatting in published drafts is inconsistent, so each
//! entry is tried against a fixed-priority list of matchers. A matcher
//! only claims an entry when every punctuation and ordering cue it
//! relies on is present; the first claim wins. An entry no matcher
//! claims degrades to anchor-plus-raw-text with a recorded diagnostic
//! rather than failing the conversion.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::diag::Diagnostics;
use crate::model::{DocDate, Reference, ReferenceSection, SeriesInfo, SourceLine};
use crate::parser::frontmatter::parse_date;

static ENTRY_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s{0,8}\[([^\[\]\s]+)\]\s+(\S.*)$").unwrap());

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static QUOTED_TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]+)""#).unwrap());

static SERIES_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(RFC|STD|BCP|FYI|FIPS(?: PUB)?|DOI|ISO(?:/IEC)?|IEEE|ANSI|ITU-T(?: Recommendation)?)[ #]*([A-Za-z0-9./:-]+)$",
    )
    .unwrap()
});

static DRAFT_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(draft-[a-z0-9-]+)$").unwrap());

static NOOP_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^work in progress$").unwrap());

static TARGET_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<([^<>\s]+)>$").unwrap());

static TARGET_ANYWHERE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<([^<>\s]+)>").unwrap());

static INITIALS_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[A-Z]\.[ -]?)+$").unwrap());

static INITIALS_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[A-Z]\.[ -]?)+\p{Lu}[\p{L}'-]*$").unwrap());

// "November 29, 2001" -> "29 November 2001" so comma-splitting the
// trailer does not cut the date in half.
static US_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(January|February|March|April|May|June|July|August|September|October|November|December) (\d{1,2}), (\d{4})",
    )
    .unwrap()
});

/// Fields recovered by a successful matcher.
#[derive(Debug, Default)]
struct MatchedFields {
    authors: Vec<String>,
    title: String,
    series: Vec<SeriesInfo>,
    date: Option<DocDate>,
    target: Option<String>,
}

type Matcher = fn(&str) -> Option<MatchedFields>;

/// Matchers in priority order. The first whose cues are all satisfied
/// determines the field extraction; nothing is retried afterwards.
static MATCHERS: &[(&str, Matcher)] = &[
    ("authors-quoted-title", match_authors_quoted_title),
    ("series-before-title", match_series_before_title),
    ("quoted-title-only", match_quoted_title_only),
    ("angle-target", match_target_entry),
];

/// Parse the raw lines of one references section.
pub fn parse_reference_section(
    title: &str,
    lines: &[SourceLine],
    diags: &mut Diagnostics,
) -> ReferenceSection {
    let mut section = ReferenceSection::new(title);
    let mut pending: Vec<(String, usize, Vec<String>)> = Vec::new();

    for line in lines {
        if line.is_blank() {
            continue;
        }
        if let Some(c) = ENTRY_START.captures(&line.text) {
            pending.push((c[1].to_string(), line.num, vec![c[2].trim().to_string()]));
        } else if let Some((_, _, parts)) = pending.last_mut() {
            parts.push(line.text.trim().to_string());
        }
    }

    for (anchor, num, parts) in pending {
        let raw = WHITESPACE.replace_all(&parts.join(" "), " ").into_owned();
        section.entries.push(parse_entry(&anchor, &raw, num, diags));
    }
    section
}

fn parse_entry(anchor: &str, raw: &str, line: usize, diags: &mut Diagnostics) -> Reference {
    for &(name, matcher) in MATCHERS {
        if let Some(fields) = matcher(raw) {
            return Reference {
                anchor: anchor.to_string(),
                authors: fields.authors,
                title: fields.title,
                series: fields.series,
                date: fields.date,
                target: fields.target,
                line,
                matched_by: Some(name),
            };
        }
    }
    diags.warn(line, format!("unrecognized reference format for [{}]", anchor));
    Reference::fallback(anchor, raw, line)
}

/// Split at the first quoted segment: (before, title, after).
fn split_quoted(raw: &str) -> Option<(&str, String, &str)> {
    let m = QUOTED_TITLE.captures(raw)?;
    let whole = m.get(0).expect("whole match");
    let title = m[1].trim().trim_end_matches(',').to_string();
    Some((&raw[..whole.start()], title, &raw[whole.end()..]))
}

/// `Authors, "Title", series..., date.` — the common xml2rfc form.
fn match_authors_quoted_title(raw: &str) -> Option<MatchedFields> {
    let (before, title, after) = split_quoted(raw)?;
    let authors = parse_authors(before)?;
    let trailer = parse_trailer(after, true)?;
    Some(MatchedFields {
        authors,
        title,
        series: trailer.series,
        date: trailer.date,
        target: trailer.target,
    })
}

/// `Authors, BCP 14, RFC 2119, "Title", date.` — series before the title.
fn match_series_before_title(raw: &str) -> Option<MatchedFields> {
    let (before, title, after) = split_quoted(raw)?;
    let tokens = comma_tokens(before);
    let first_series = tokens
        .iter()
        .position(|t| SERIES_TOKEN.is_match(t) || DRAFT_TOKEN.is_match(t))?;
    let mut series = Vec::new();
    for token in &tokens[first_series..] {
        series.push(series_info(token)?);
    }
    let authors = parse_authors(&tokens[..first_series].join(", "))?;
    let trailer = parse_trailer(after, true)?;
    series.extend(trailer.series);
    Some(MatchedFields {
        authors,
        title,
        series,
        date: trailer.date,
        target: trailer.target,
    })
}

/// `"Title", whatever...` — quoted title with no author segment; the
/// trailer is scanned leniently.
fn match_quoted_title_only(raw: &str) -> Option<MatchedFields> {
    let (before, title, after) = split_quoted(raw)?;
    if !comma_tokens(before).is_empty() {
        return None;
    }
    let trailer = parse_trailer(after, false)?;
    Some(MatchedFields {
        title,
        series: trailer.series,
        date: trailer.date,
        target: trailer.target,
        ..Default::default()
    })
}

/// `Some unquoted title, <https://example.org/spec>.` — the target URL
/// is the only reliable cue.
fn match_target_entry(raw: &str) -> Option<MatchedFields> {
    let m = TARGET_ANYWHERE.find(raw)?;
    let target = raw[m.start() + 1..m.end() - 1].to_string();
    let title = raw[..m.start()]
        .trim()
        .trim_end_matches([',', '.'])
        .trim()
        .to_string();
    if title.is_empty() {
        return None;
    }
    let date = parse_trailer(&raw[m.end()..], false)?.date;
    Some(MatchedFields {
        title,
        target: Some(target),
        date,
        ..Default::default()
    })
}

fn comma_tokens(text: &str) -> Vec<String> {
    text.trim()
        .trim_end_matches(',')
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Parse the author list preceding a quoted title.
///
/// Handles `Bradner, S.`, `Doe, J., Smith, P., and T. Wu`, editor
/// suffixes, and organization names as a single author. Returns `None`
/// when any token is not recognizably part of an author list, so a
/// higher-priority matcher never swallows series or date text.
fn parse_authors(text: &str) -> Option<Vec<String>> {
    let tokens = comma_tokens(text);
    if tokens.is_empty() {
        return None;
    }
    let mut authors: Vec<String> = Vec::new();
    for token in &tokens {
        let token = token.strip_prefix("and ").unwrap_or(token).trim();
        if SERIES_TOKEN.is_match(token)
            || DRAFT_TOKEN.is_match(token)
            || parse_date(token).is_some()
            || TARGET_TOKEN.is_match(token)
        {
            return None;
        }
        if token == "Ed." {
            let last = authors.last_mut()?;
            last.push_str(", Ed.");
        } else if INITIALS_ONLY.is_match(token) {
            // Initials following a bare surname token.
            let last = authors.last_mut()?;
            if last.contains(", ") || last.contains(' ') {
                return None;
            }
            last.push_str(", ");
            last.push_str(token);
        } else if INITIALS_FIRST.is_match(token) {
            authors.push(token.to_string());
        } else if token.contains(' ') {
            // Multi-word token with no initials: an organization.
            authors.push(token.to_string());
        } else if token.chars().next()?.is_uppercase() {
            // Bare surname; initials expected in the next token.
            authors.push(token.to_string());
        } else {
            return None;
        }
    }
    // A trailing bare surname with no initials never materialized into a
    // full author name.
    if authors
        .iter()
        .any(|a| !a.contains(' ') && !a.contains(", "))
    {
        return None;
    }
    Some(authors)
}

#[derive(Debug, Default)]
struct Trailer {
    series: Vec<SeriesInfo>,
    date: Option<DocDate>,
    target: Option<String>,
}

/// Scan the text following the title for series, date, and target
/// tokens. In strict mode an unrecognized token rejects the match; in
/// lenient mode it is skipped.
fn parse_trailer(text: &str, strict: bool) -> Option<Trailer> {
    let text = US_DATE.replace_all(text, "$2 $1 $3");
    let text = text.trim().trim_start_matches(',').trim();
    let text = text.strip_suffix('.').unwrap_or(text);

    let mut trailer = Trailer::default();
    for token in text.split(',') {
        let token = token.trim().trim_end_matches('.').trim();
        if token.is_empty() || NOOP_TOKEN.is_match(token) {
            continue;
        }
        if let Some(c) = TARGET_TOKEN.captures(token) {
            trailer.target = Some(c[1].to_string());
        } else if let Some(info) = series_info(token) {
            trailer.series.push(info);
        } else if let Some(date) = date_token(token) {
            trailer.date = Some(date);
        } else if strict {
            return None;
        }
    }
    Some(trailer)
}

fn series_info(token: &str) -> Option<SeriesInfo> {
    if let Some(c) = SERIES_TOKEN.captures(token) {
        return Some(SeriesInfo::new(&c[1], &c[2]));
    }
    if let Some(c) = DRAFT_TOKEN.captures(token) {
        return Some(SeriesInfo::new("Internet-Draft", &c[1]));
    }
    None
}

fn date_token(token: &str) -> Option<DocDate> {
    if let Some(date) = parse_date(token) {
        return Some(date);
    }
    // A bare year is accepted as a citation date.
    if token.len() == 4 && token.chars().all(|c| c.is_ascii_digit()) {
        return Some(DocDate {
            day: None,
            month: None,
            year: token.parse().ok(),
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lines::read_lines;

    fn parse_one(entry: &str) -> (Reference, Diagnostics) {
        let lines = read_lines(entry);
        let mut diags = Diagnostics::new();
        let section = parse_reference_section("Informative References", &lines, &mut diags);
        assert_eq!(section.entries.len(), 1, "expected one entry");
        (section.entries.into_iter().next().unwrap(), diags)
    }

    #[test]
    fn test_rfc_style_entry() {
        let (r, diags) = parse_one(
            "   [RFC2119]  Bradner, S., \"Key words for use in RFCs to Indicate\n              Requirement Levels\", BCP 14, RFC 2119, March 1997.",
        );
        assert_eq!(r.anchor, "RFC2119");
        assert_eq!(r.authors, vec!["Bradner, S."]);
        assert_eq!(
            r.title,
            "Key words for use in RFCs to Indicate Requirement Levels"
        );
        assert_eq!(
            r.series,
            vec![SeriesInfo::new("BCP", "14"), SeriesInfo::new("RFC", "2119")]
        );
        let date = r.date.unwrap();
        assert_eq!(date.month.as_deref(), Some("March"));
        assert_eq!(date.year, Some(1997));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_organization_author_with_quoted_title() {
        let (r, diags) = parse_one(
            "   [AES]      National Institute of Standards and Technology,\n              \"Advanced Encryption Standard (AES)\", FIPS 197,\n              November 2001.",
        );
        assert_eq!(r.anchor, "AES");
        assert_eq!(
            r.authors,
            vec!["National Institute of Standards and Technology"]
        );
        assert_eq!(r.title, "Advanced Encryption Standard (AES)");
        assert_eq!(r.series, vec![SeriesInfo::new("FIPS", "197")]);
        let date = r.date.unwrap();
        assert_eq!(date.month.as_deref(), Some("November"));
        assert_eq!(date.year, Some(2001));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_unquoted_colon_entry_falls_back() {
        let (r, diags) = parse_one(
            "   [AES]      National Institute of Standards and Technology. FIPS Pub\n              197: Advanced Encryption Standard (AES). 26 November 2001.",
        );
        assert_eq!(r.anchor, "AES");
        assert!(!r.is_structured());
        assert!(r.title.contains("FIPS Pub 197"));
        assert_eq!(diags.len(), 1);
        assert!(diags.iter().next().unwrap().message.contains("[AES]"));
    }

    #[test]
    fn test_series_before_title() {
        let (r, _) = parse_one(
            "   [RFC2119]  Bradner, S., BCP 14, RFC 2119, \"Key words for use in\n              RFCs to Indicate Requirement Levels\", March 1997.",
        );
        assert_eq!(r.matched_by, Some("series-before-title"));
        assert_eq!(r.authors, vec!["Bradner, S."]);
        assert_eq!(
            r.series,
            vec![SeriesInfo::new("BCP", "14"), SeriesInfo::new("RFC", "2119")]
        );
    }

    #[test]
    fn test_multiple_authors_with_and() {
        let (r, _) = parse_one(
            "   [X]  Doe, J., Smith, P., and T. Wu, \"A Joint Work\", RFC 9000,\n        June 2021.",
        );
        assert_eq!(r.authors, vec!["Doe, J.", "Smith, P.", "T. Wu"]);
        assert_eq!(r.series, vec![SeriesInfo::new("RFC", "9000")]);
    }

    #[test]
    fn test_editor_suffix() {
        let (r, _) = parse_one("   [Y]  Levkowetz, H., Ed., \"Editing\", RFC 1234, May 2002.");
        assert_eq!(r.authors, vec!["Levkowetz, H., Ed."]);
    }

    #[test]
    fn test_quoted_title_only() {
        let (r, _) = parse_one("   [TMPL]  \"A Bare Template Document\", October 2014.");
        assert_eq!(r.matched_by, Some("quoted-title-only"));
        assert!(r.authors.is_empty());
        assert_eq!(r.title, "A Bare Template Document");
    }

    #[test]
    fn test_target_entry() {
        let (r, _) =
            parse_one("   [W3C]  Extensible Markup Language, <https://www.w3.org/TR/xml/>.");
        assert_eq!(r.matched_by, Some("angle-target"));
        assert_eq!(r.title, "Extensible Markup Language");
        assert_eq!(r.target.as_deref(), Some("https://www.w3.org/TR/xml/"));
    }

    #[test]
    fn test_target_in_trailer() {
        let (r, _) = parse_one(
            "   [RFC8174]  Leiba, B., \"Ambiguity of Uppercase vs Lowercase\", BCP 14,\n              RFC 8174, May 2017, <https://www.rfc-editor.org/info/rfc8174>.",
        );
        assert_eq!(r.matched_by, Some("authors-quoted-title"));
        assert_eq!(
            r.target.as_deref(),
            Some("https://www.rfc-editor.org/info/rfc8174")
        );
    }

    #[test]
    fn test_work_in_progress_draft() {
        let (r, _) = parse_one(
            "   [I-D.x]  Doe, J., \"Something Underway\", Work in Progress,\n             draft-doe-something-03, January 2024.",
        );
        assert_eq!(r.matched_by, Some("authors-quoted-title"));
        assert_eq!(
            r.series,
            vec![SeriesInfo::new("Internet-Draft", "draft-doe-something-03")]
        );
    }

    #[test]
    fn test_anchor_order_preserved() {
        let text = "\
   [B]  Beta, B., \"Second Entry\", RFC 2, February 2002.

   [A]  Alpha, A., \"First Entry\", RFC 1, January 2001.
";
        let lines = read_lines(text);
        let mut diags = Diagnostics::new();
        let section = parse_reference_section("Normative References", &lines, &mut diags);
        let anchors: Vec<_> = section.entries.iter().map(|e| e.anchor.as_str()).collect();
        assert_eq!(anchors, vec!["B", "A"]);
    }
}
