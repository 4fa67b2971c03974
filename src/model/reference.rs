//! Bibliographic reference types.

use serde::{Deserialize, Serialize};

use super::DocDate;

/// A references section (e.g. Normative vs. Informative).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceSection {
    /// Section title as it appeared in the source.
    pub title: String,

    /// Entries in source order.
    pub entries: Vec<Reference>,
}

impl ReferenceSection {
    /// Create an empty references section.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
        }
    }
}

/// A single bibliographic entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reference {
    /// Bracketed anchor, without the brackets (e.g. `RFC2119`).
    pub anchor: String,

    /// Author names in citation order; organizations appear as a single
    /// name (e.g. `National Institute of Standards and Technology`).
    pub authors: Vec<String>,

    /// Title. For an unmatched entry this holds the raw citation text.
    pub title: String,

    /// Series identifiers, e.g. (`RFC`, `2119`) or (`DOI`, `10.1.1`).
    pub series: Vec<SeriesInfo>,

    /// Publication date, when recognized.
    pub date: Option<DocDate>,

    /// Target URL from an angle-bracketed trailer.
    pub target: Option<String>,

    /// Source line the entry starts on.
    pub line: usize,

    /// Name of the matcher that recognized this entry, `None` when the
    /// entry fell back to raw text.
    #[serde(skip_deserializing)]
    pub matched_by: Option<&'static str>,
}

impl Reference {
    /// Create a minimally structured entry: anchor plus raw text as title.
    pub fn fallback(anchor: impl Into<String>, raw: impl Into<String>, line: usize) -> Self {
        Self {
            anchor: anchor.into(),
            title: raw.into(),
            line,
            ..Default::default()
        }
    }

    /// Whether the entry was recognized by a matcher.
    pub fn is_structured(&self) -> bool {
        self.matched_by.is_some()
    }
}

/// A structured publication identifier attached to a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesInfo {
    /// Series name, e.g. `RFC`, `STD`, `FIPS`, `DOI`.
    pub name: String,

    /// Series value, e.g. `2119`.
    pub value: String,
}

impl SeriesInfo {
    /// Create a series identifier.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
