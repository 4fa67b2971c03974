//! Front-matter extraction from the first page.
//!
//! The first page of an xml2rfc rendering carries a two-column header
//! block (process metadata on the left, authors and date on the right),
//! a centered title, and usually the centered document name. The
//! Authors' Addresses section at the end of the document supplies the
//! full contact blocks, merged here onto the first-page authors.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::diag::Diagnostics;
use crate::model::{Author, DocDate, FrontMatter, Paragraph, SourceLine, Stream};
use crate::parser::ParseOptions;

static COLUMN_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\S.*?)   +(\S.*)$").unwrap());

static DATE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(\d{1,2}) +)?(January|February|March|April|May|June|July|August|September|October|November|December)(?: +(\d{1,2}),)? +(\d{4})$",
    )
    .unwrap()
});

static AUTHOR_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[A-Z]\.[ -]?)+[\p{L}][\p{L}'-]*(?:, Ed\.)?$").unwrap());

static DOCNAME_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<?(draft-[a-z0-9-]+?)(?:\.txt)?>?$").unwrap());

static RFC_NUMBER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Request for Comments:\s*(\d+)$").unwrap());

static OBSOLETES_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(Obsoletes|Updates):\s*([0-9, ]+)").unwrap());

static CONTACT_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(Email|E-mail|Phone|Tel|Fax|URI):\s*(\S.*)$").unwrap());

/// Extract front matter from the pre-heading region and the special
/// sections routed by the structural parser.
pub fn parse_front_matter(
    front_lines: &[SourceLine],
    abstract_paragraphs: Vec<Paragraph>,
    address_lines: &[SourceLine],
    options: &ParseOptions,
    diags: &mut Diagnostics,
) -> FrontMatter {
    let mut fm = FrontMatter {
        abstract_paragraphs,
        ..Default::default()
    };
    let mut detected_stream = None;

    let groups = split_groups(front_lines);
    if let Some(header) = groups.first() {
        parse_header_block(header, &mut fm, &mut detected_stream);
    }

    // Everything centered below the header block: title, document name,
    // sometimes the date.
    let mut title_parts: Vec<String> = Vec::new();
    for group in groups.iter().skip(1) {
        for line in group {
            if line.indent() < 8 {
                continue;
            }
            let text = line.text.trim();
            if let Some(c) = DOCNAME_LINE.captures(text) {
                fm.docname = Some(c[1].to_string());
            } else if let Some(date) = parse_date(text) {
                if fm.date.is_empty() {
                    fm.date = date;
                }
            } else {
                title_parts.push(text.to_string());
            }
        }
    }
    fm.title = title_parts.join(" ");

    if fm.title.is_empty() {
        diags.warn_global("no document title found on the first page");
    }
    if fm.date.is_empty() {
        diags.warn_global("no document date found; using today's date");
        fm.date = DocDate::today();
    }

    merge_addresses(&mut fm, address_lines);

    // Overrides win over anything inferred from the text.
    fm.stream = options.stream.or(detected_stream).or(Some(Stream::Ietf));
    fm.consensus = options.consensus;
    fm.ipr = options
        .ipr
        .clone()
        .or_else(|| Some("trust200902".to_string()));

    fm
}

/// Split lines into blank-separated groups.
fn split_groups(lines: &[SourceLine]) -> Vec<Vec<&SourceLine>> {
    let mut groups = Vec::new();
    let mut current: Vec<&SourceLine> = Vec::new();
    for line in lines {
        if line.is_blank() {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

fn parse_header_block(
    header: &[&SourceLine],
    fm: &mut FrontMatter,
    detected_stream: &mut Option<Stream>,
) {
    let mut first_left = true;
    for line in header {
        let (left, right) = match COLUMN_SPLIT.captures(&line.text) {
            Some(c) => (
                Some(c.get(1).expect("group 1").as_str().to_string()),
                Some(c.get(2).expect("group 2").as_str().to_string()),
            ),
            None if line.indent() > 0 => (None, Some(line.text.trim().to_string())),
            None => (Some(line.text.trim().to_string()), None),
        };

        if let Some(left) = left {
            parse_header_left(&left, first_left, fm, detected_stream);
            first_left = false;
        }
        if let Some(right) = right {
            parse_header_right(&right, fm);
        }
    }
}

fn parse_header_left(
    text: &str,
    is_first: bool,
    fm: &mut FrontMatter,
    detected_stream: &mut Option<Stream>,
) {
    if let Some(c) = RFC_NUMBER_LINE.captures(text) {
        fm.rfc_number = c[1].parse().ok();
        return;
    }
    if let Some(c) = OBSOLETES_LINE.captures(text) {
        let numbers = c[2]
            .split(',')
            .filter_map(|n| n.trim().parse::<u32>().ok())
            .collect();
        if &c[1] == "Obsoletes" {
            fm.obsoletes = numbers;
        } else {
            fm.updates = numbers;
        }
        return;
    }
    if let Some(rest) = text
        .strip_prefix("Category:")
        .or_else(|| text.strip_prefix("Intended status:"))
        .or_else(|| text.strip_prefix("Intended Status:"))
    {
        fm.category = category_token(rest.trim());
        return;
    }
    if text.starts_with("Expires")
        || text.starts_with("Expiration")
        || text.starts_with("ISSN")
        || text == "Internet-Draft"
        || text == "INTERNET-DRAFT"
    {
        return;
    }

    if is_first {
        *detected_stream = stream_marker(text);
        if detected_stream.is_none() && text != "Network Working Group" {
            fm.workgroup = Some(text.to_string());
        }
    }
}

fn parse_header_right(text: &str, fm: &mut FrontMatter) {
    if let Some(date) = parse_date(text) {
        if fm.date.is_empty() {
            fm.date = date;
        }
        return;
    }
    if AUTHOR_LINE.is_match(text) {
        fm.authors.push(Author::from_name(text));
        return;
    }
    // Anything else in the right column belongs to the organization of
    // the most recent author.
    if let Some(author) = fm.authors.last_mut() {
        match author.organization.as_mut() {
            Some(org) => {
                org.push_str(", ");
                org.push_str(text);
            }
            None => author.organization = Some(text.to_string()),
        }
    }
}

fn stream_marker(text: &str) -> Option<Stream> {
    if text.contains("Internet Engineering Task Force") || text == "Network Working Group" {
        Some(Stream::Ietf)
    } else if text.contains("Internet Architecture Board") {
        Some(Stream::Iab)
    } else if text.contains("Internet Research Task Force") {
        Some(Stream::Irtf)
    } else if text.contains("Independent Submission") {
        Some(Stream::Independent)
    } else {
        None
    }
}

fn category_token(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    let token = if lower.contains("standards track") {
        "std"
    } else if lower.contains("best current practice") {
        "bcp"
    } else if lower.contains("informational") {
        "info"
    } else if lower.contains("experimental") {
        "exp"
    } else if lower.contains("historic") {
        "historic"
    } else {
        return None;
    };
    Some(token.to_string())
}

/// Parse `5 February 2026`, `February 5, 2026`, or `February 2026`.
pub(crate) fn parse_date(text: &str) -> Option<DocDate> {
    let c = DATE_LINE.captures(text.trim())?;
    let month: chrono::Month = c[2].parse().ok()?;
    let day = c
        .get(1)
        .or_else(|| c.get(3))
        .and_then(|m| m.as_str().parse().ok());
    Some(DocDate {
        day,
        month: Some(month.name().to_string()),
        year: c[4].parse().ok(),
    })
}

/// Merge Authors' Addresses contact blocks onto the first-page authors.
fn merge_addresses(fm: &mut FrontMatter, lines: &[SourceLine]) {
    let groups = split_groups(lines);
    let mut current: Option<usize> = None;

    for group in groups {
        let mut lines = group.iter();
        let Some(first) = lines.next() else { continue };
        let first_text = first.text.trim();

        // A group opening with a known surname (or a plausible full name
        // when nobody is current yet) starts a new contact block.
        let mut matched = fm.authors.iter().position(|a| {
            a.surname
                .as_deref()
                .is_some_and(|s| first_text.split_whitespace().any(|w| w == s))
        });
        if matched.is_none() && current.is_none() && looks_like_name(first_text) {
            fm.authors.push(Author::from_name(first_text));
            matched = Some(fm.authors.len() - 1);
        }

        let (idx, new_block) = match matched {
            Some(idx) => (idx, true),
            None => match current {
                Some(idx) => (idx, false),
                None => continue,
            },
        };
        current = Some(idx);
        let author = &mut fm.authors[idx];

        let rest: Vec<&str> = if new_block {
            lines.map(|l| l.text.trim()).collect()
        } else {
            std::iter::once(first_text)
                .chain(lines.map(|l| l.text.trim()))
                .collect()
        };

        // The first unlabeled line of a fresh contact block is the
        // organization (it restates what the header block abbreviated);
        // later unlabeled lines are postal address lines.
        let mut org_open = new_block;
        for text in rest {
            if let Some(c) = CONTACT_LABEL.captures(text) {
                let value = c[2].to_string();
                match c[1].to_lowercase().as_str() {
                    "email" | "e-mail" => author.email = Some(value),
                    "phone" | "tel" => author.phone = Some(value),
                    "uri" => author.uri = Some(value),
                    _ => {}
                }
            } else if org_open {
                author.organization = Some(text.to_string());
                org_open = false;
            } else {
                author.address.push(text.to_string());
            }
        }
    }
}

fn looks_like_name(text: &str) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();
    (2..=4).contains(&words.len())
        && words
            .iter()
            .all(|w| w.starts_with(|c: char| c.is_uppercase()))
        && !text.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lines::read_lines;

    const FRONT: &str = "\
Network Working Group                                             J. Doe
Internet-Draft                                               Example Inc
Intended status: Informational                            P. Q. Examplar
Expires: 6 February 2026                                  Other Org, Ltd
                                                           5 August 2025


                       The Example Transfer Protocol
                      draft-doe-example-transfer-02";

    const ADDRESSES: &str = "\
   Jane Doe
   Example Inc
   123 Main Street
   Anytown

   Email: jane@example.com

   Peter Q. Examplar
   Other Org, Ltd

   Phone: +1 555 0100
   Email: pqe@other.example";

    fn parse(front: &str, addresses: &str, options: &ParseOptions) -> FrontMatter {
        let front_lines = read_lines(front);
        let address_lines = read_lines(addresses);
        let mut diags = Diagnostics::new();
        parse_front_matter(&front_lines, Vec::new(), &address_lines, options, &mut diags)
    }

    #[test]
    fn test_title_and_docname() {
        let fm = parse(FRONT, "", &ParseOptions::default());
        assert_eq!(fm.title, "The Example Transfer Protocol");
        assert_eq!(fm.docname.as_deref(), Some("draft-doe-example-transfer-02"));
    }

    #[test]
    fn test_header_metadata() {
        let fm = parse(FRONT, "", &ParseOptions::default());
        assert_eq!(fm.category.as_deref(), Some("info"));
        assert_eq!(fm.stream, Some(Stream::Ietf));
        assert_eq!(fm.date.month.as_deref(), Some("August"));
        assert_eq!(fm.date.day, Some(5));
        assert_eq!(fm.date.year, Some(2025));
    }

    #[test]
    fn test_authors_from_right_column() {
        let fm = parse(FRONT, "", &ParseOptions::default());
        assert_eq!(fm.authors.len(), 2);
        assert_eq!(fm.authors[0].surname.as_deref(), Some("Doe"));
        assert_eq!(fm.authors[0].organization.as_deref(), Some("Example Inc"));
        assert_eq!(fm.authors[1].surname.as_deref(), Some("Examplar"));
    }

    #[test]
    fn test_address_merge() {
        let fm = parse(FRONT, ADDRESSES, &ParseOptions::default());
        let jane = &fm.authors[0];
        assert_eq!(jane.email.as_deref(), Some("jane@example.com"));
        assert_eq!(jane.address, vec!["123 Main Street", "Anytown"]);

        let pqe = &fm.authors[1];
        assert_eq!(pqe.phone.as_deref(), Some("+1 555 0100"));
        assert_eq!(pqe.email.as_deref(), Some("pqe@other.example"));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let options = ParseOptions::new()
            .with_stream(Stream::Independent)
            .with_ipr("pre5378Trust200902")
            .with_consensus(false);
        let fm = parse(FRONT, "", &options);
        assert_eq!(fm.stream, Some(Stream::Independent));
        assert_eq!(fm.ipr.as_deref(), Some("pre5378Trust200902"));
        assert_eq!(fm.consensus, Some(false));
    }

    #[test]
    fn test_date_forms() {
        assert_eq!(
            parse_date("26 November 2001"),
            Some(DocDate {
                day: Some(26),
                month: Some("November".to_string()),
                year: Some(2001)
            })
        );
        assert_eq!(
            parse_date("April 1, 2003").unwrap().day,
            Some(1),
        );
        let monthly = parse_date("March 1997").unwrap();
        assert_eq!(monthly.day, None);
        assert_eq!(monthly.year, Some(1997));
        assert!(parse_date("Sometime 2001").is_none());
    }

    #[test]
    fn test_missing_date_falls_back_to_today() {
        let front_lines = read_lines("Network Working Group                       J. Doe");
        let mut diags = Diagnostics::new();
        let fm = parse_front_matter(
            &front_lines,
            Vec::new(),
            &[],
            &ParseOptions::default(),
            &mut diags,
        );
        assert!(!fm.date.is_empty());
        assert!(diags.iter().any(|d| d.message.contains("today")));
    }
}
