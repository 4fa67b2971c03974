//! Front matter types: title, authors, date, and process metadata.

use std::fmt;
use std::str::FromStr;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::Paragraph;

/// The IETF process track a document is published under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stream {
    /// IETF stream.
    Ietf,
    /// IAB stream.
    Iab,
    /// IRTF stream.
    Irtf,
    /// Independent submission stream.
    Independent,
}

impl Stream {
    /// The attribute value used in the XML output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stream::Ietf => "IETF",
            Stream::Iab => "IAB",
            Stream::Irtf => "IRTF",
            Stream::Independent => "independent",
        }
    }

    /// All valid stream names, for error messages.
    pub fn names() -> &'static [&'static str] {
        &["IETF", "IAB", "IRTF", "independent"]
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stream {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IETF" => Ok(Stream::Ietf),
            "IAB" => Ok(Stream::Iab),
            "IRTF" => Ok(Stream::Irtf),
            "independent" => Ok(Stream::Independent),
            other => Err(Error::UnknownStream(other.to_string())),
        }
    }
}

/// A document date with optional day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocDate {
    /// Day of month, when the draft carries one.
    pub day: Option<u32>,

    /// Month name (e.g. `November`).
    pub month: Option<String>,

    /// Four-digit year.
    pub year: Option<i32>,
}

impl DocDate {
    /// Today's date, used when the draft carries no recognizable date.
    pub fn today() -> Self {
        let now = chrono::Local::now().date_naive();
        Self {
            day: Some(now.day()),
            month: Some(month_name(now.month())),
            year: Some(now.year()),
        }
    }

    /// Check whether any field is populated.
    pub fn is_empty(&self) -> bool {
        self.day.is_none() && self.month.is_none() && self.year.is_none()
    }
}

fn month_name(month: u32) -> String {
    // chrono::Month is 1-based via try_from
    chrono::Month::try_from(month as u8)
        .map(|m| m.name().to_string())
        .unwrap_or_default()
}

/// A document author with optional contact details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Author {
    /// Full name as given on the first page (e.g. `J. Doe`).
    pub fullname: String,

    /// Leading initials (e.g. `J.`).
    pub initials: Option<String>,

    /// Surname.
    pub surname: Option<String>,

    /// Whether the author is marked as editor (`, Ed.`).
    pub editor: bool,

    /// Organization line.
    pub organization: Option<String>,

    /// Postal address lines, in order.
    pub address: Vec<String>,

    /// Email address.
    pub email: Option<String>,

    /// Phone number.
    pub phone: Option<String>,

    /// URI.
    pub uri: Option<String>,
}

impl Author {
    /// Create an author from a name line, splitting initials and surname.
    pub fn from_name(name: &str) -> Self {
        let mut name = name.trim().to_string();
        let editor = name.ends_with(", Ed.");
        if editor {
            name.truncate(name.len() - ", Ed.".len());
        }
        let (initials, surname) = split_name(&name);
        Self {
            fullname: name,
            initials,
            surname,
            editor,
            ..Default::default()
        }
    }

    /// Check whether any contact field beyond the name is populated.
    pub fn has_contact(&self) -> bool {
        self.organization.is_some()
            || !self.address.is_empty()
            || self.email.is_some()
            || self.phone.is_some()
            || self.uri.is_some()
    }
}

/// Split `J. Q. Doe` into initials `J. Q.` and surname `Doe`.
fn split_name(name: &str) -> (Option<String>, Option<String>) {
    let words: Vec<&str> = name.split_whitespace().collect();
    if words.len() < 2 {
        return (None, words.last().map(|s| s.to_string()));
    }
    let (last, rest) = words.split_last().expect("len checked above");
    if rest.iter().all(|w| w.ends_with('.')) {
        (Some(rest.join(" ")), Some(last.to_string()))
    } else {
        // "Jane Doe" style: no initials to separate
        (None, Some(last.to_string()))
    }
}

/// Front matter extracted from the first page and abstract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrontMatter {
    /// Document title.
    pub title: String,

    /// Document name (e.g. `draft-ietf-foo-bar-02`), without extension.
    pub docname: Option<String>,

    /// Working group named in the first-page header.
    pub workgroup: Option<String>,

    /// RFC number, when converting a published RFC.
    pub rfc_number: Option<u32>,

    /// RFC numbers this document obsoletes.
    pub obsoletes: Vec<u32>,

    /// RFC numbers this document updates.
    pub updates: Vec<u32>,

    /// Document date.
    pub date: DocDate,

    /// Authors in first-page order.
    pub authors: Vec<Author>,

    /// Abstract paragraphs.
    pub abstract_paragraphs: Vec<Paragraph>,

    /// Publication stream.
    pub stream: Option<Stream>,

    /// Whether the document had working-group consensus.
    pub consensus: Option<bool>,

    /// IPR declaration token (e.g. `trust200902`).
    pub ipr: Option<String>,

    /// Category token (`std`, `info`, `exp`, `bcp`, `historic`).
    pub category: Option<String>,
}

impl FrontMatter {
    /// Find an author by surname, for merging contact blocks.
    pub fn author_by_surname_mut(&mut self, surname: &str) -> Option<&mut Author> {
        self.authors
            .iter_mut()
            .find(|a| a.surname.as_deref() == Some(surname))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_round_trip() {
        for name in Stream::names() {
            let stream: Stream = name.parse().unwrap();
            assert_eq!(stream.as_str(), *name);
        }
    }

    #[test]
    fn test_stream_rejects_unknown() {
        let err = "iesg".parse::<Stream>().unwrap_err();
        assert!(matches!(err, Error::UnknownStream(_)));
    }

    #[test]
    fn test_author_from_name() {
        let a = Author::from_name("J. Q. Public");
        assert_eq!(a.initials.as_deref(), Some("J. Q."));
        assert_eq!(a.surname.as_deref(), Some("Public"));
        assert!(!a.editor);

        let e = Author::from_name("H. Levkowetz, Ed.");
        assert!(e.editor);
        assert_eq!(e.surname.as_deref(), Some("Levkowetz"));
    }

    #[test]
    fn test_doc_date_today() {
        let d = DocDate::today();
        assert!(!d.is_empty());
        assert!(d.year.unwrap() >= 2024);
        assert!(d.month.is_some());
    }
}
