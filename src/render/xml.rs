//! XML rendering for parsed drafts.
//!
//! The v2 (RFC 7749) and v3 (RFC 7991) vocabularies share most of their
//! element names; the differences are held in one table per version so
//! the walking code stays schema-agnostic.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::diag::Diagnostics;
use crate::error::{Error, Result};
use crate::model::{Author, Block, DocDate, Document, Reference, Section};

use super::{RenderOptions, SchemaVersion};

/// Per-version element and attribute conventions.
struct SchemaTable {
    /// `version` attribute on the root element.
    version_attr: Option<&'static str>,
    /// Section/references titles as a `title` attribute (v2) or a
    /// `<name>` child element (v3).
    title_as_attr: bool,
    /// Artwork wrapped in a `<figure>` element (v2) or bare (v3).
    artwork_in_figure: bool,
}

const V2_TABLE: SchemaTable = SchemaTable {
    version_attr: None,
    title_as_attr: true,
    artwork_in_figure: true,
};

const V3_TABLE: SchemaTable = SchemaTable {
    version_attr: Some("3"),
    title_as_attr: false,
    artwork_in_figure: false,
};

impl SchemaVersion {
    fn table(&self) -> &'static SchemaTable {
        match self {
            SchemaVersion::V2 => &V2_TABLE,
            SchemaVersion::V3 => &V3_TABLE,
        }
    }
}

/// Render a document to XML text for the chosen schema version.
///
/// A missing title is the one structurally required field; anything else
/// that is absent is omitted with a diagnostic.
pub fn to_xml(doc: &Document, options: &RenderOptions, diags: &mut Diagnostics) -> Result<String> {
    if doc.front.title.is_empty() {
        return Err(Error::MissingField("title"));
    }
    let mut w = Writer::new(options.schema.table());
    w.render(doc, diags);
    Ok(w.out)
}

struct Writer {
    out: String,
    depth: usize,
    table: &'static SchemaTable,
}

impl Writer {
    fn new(table: &'static SchemaTable) -> Self {
        Self {
            out: String::new(),
            depth: 0,
            table,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn open(&mut self, tag: &str) {
        self.line(tag);
        self.depth += 1;
    }

    fn close(&mut self, name: &str) {
        self.depth -= 1;
        self.line(&format!("</{}>", name));
    }

    fn element(&mut self, name: &str, text: &str) {
        self.line(&format!("<{0}>{1}</{0}>", name, escape_text(text)));
    }

    fn render(&mut self, doc: &Document, diags: &mut Diagnostics) {
        self.line(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        let root = self.root_tag(doc, diags);
        self.open(&root);

        self.render_front(doc, diags);
        self.render_middle(doc);
        self.render_back(doc);

        self.close("rfc");
    }

    fn root_tag(&self, doc: &Document, diags: &mut Diagnostics) -> String {
        let fm = &doc.front;
        let mut tag = String::from("<rfc");
        if let Some(v) = self.table.version_attr {
            tag.push_str(&attr("version", v));
        }
        match (&fm.docname, fm.rfc_number) {
            (_, Some(number)) => tag.push_str(&attr("number", &number.to_string())),
            (Some(docname), None) => tag.push_str(&attr("docName", docname)),
            (None, None) => {
                diags.warn_global("neither document name nor RFC number found");
            }
        }
        match &fm.category {
            Some(category) => tag.push_str(&attr("category", category)),
            None => diags.warn_global("no category recognized; omitting category attribute"),
        }
        if let Some(ipr) = &fm.ipr {
            tag.push_str(&attr("ipr", ipr));
        }
        if let Some(stream) = fm.stream {
            tag.push_str(&attr("submissionType", stream.as_str()));
        }
        if let Some(consensus) = fm.consensus {
            tag.push_str(&attr("consensus", if consensus { "yes" } else { "no" }));
        }
        if !fm.obsoletes.is_empty() {
            tag.push_str(&attr("obsoletes", &join_numbers(&fm.obsoletes)));
        }
        if !fm.updates.is_empty() {
            tag.push_str(&attr("updates", &join_numbers(&fm.updates)));
        }
        tag.push('>');
        tag
    }

    fn render_front(&mut self, doc: &Document, diags: &mut Diagnostics) {
        let fm = &doc.front;
        self.open("<front>");
        self.element("title", &fm.title);
        if fm.authors.is_empty() {
            diags.warn_global("no authors found on the first page");
        }
        for author in &fm.authors {
            self.render_author(author);
        }
        self.render_date(&fm.date);
        if let Some(workgroup) = &fm.workgroup {
            self.element("workgroup", workgroup);
        }
        if !fm.abstract_paragraphs.is_empty() {
            self.open("<abstract>");
            for para in &fm.abstract_paragraphs {
                self.element("t", &para.text);
            }
            self.close("abstract");
        }
        self.close("front");
    }

    fn render_author(&mut self, author: &Author) {
        let mut tag = format!("<author{}", attr("fullname", &author.fullname));
        if let Some(initials) = &author.initials {
            tag.push_str(&attr("initials", initials));
        }
        if let Some(surname) = &author.surname {
            tag.push_str(&attr("surname", surname));
        }
        if author.editor {
            tag.push_str(&attr("role", "editor"));
        }
        if !author.has_contact() {
            tag.push_str("/>");
            self.line(&tag);
            return;
        }
        tag.push('>');
        self.open(&tag);
        if let Some(org) = &author.organization {
            self.element("organization", org);
        }
        if !author.address.is_empty()
            || author.email.is_some()
            || author.phone.is_some()
            || author.uri.is_some()
        {
            self.open("<address>");
            if !author.address.is_empty() {
                self.open("<postal>");
                for street in &author.address {
                    self.element("street", street);
                }
                self.close("postal");
            }
            if let Some(phone) = &author.phone {
                self.element("phone", phone);
            }
            if let Some(email) = &author.email {
                self.element("email", email);
            }
            if let Some(uri) = &author.uri {
                self.element("uri", uri);
            }
            self.close("address");
        }
        self.close("author");
    }

    fn render_date(&mut self, date: &DocDate) {
        if date.is_empty() {
            return;
        }
        let mut tag = String::from("<date");
        if let Some(day) = date.day {
            tag.push_str(&attr("day", &day.to_string()));
        }
        if let Some(month) = &date.month {
            tag.push_str(&attr("month", month));
        }
        if let Some(year) = date.year {
            tag.push_str(&attr("year", &year.to_string()));
        }
        tag.push_str("/>");
        self.line(&tag);
    }

    fn render_middle(&mut self, doc: &Document) {
        self.open("<middle>");
        for section in &doc.sections {
            self.render_section(section);
        }
        self.close("middle");
    }

    fn render_section(&mut self, section: &Section) {
        if self.table.title_as_attr {
            self.open(&format!("<section{}>", attr("title", &section.title)));
        } else {
            self.open("<section>");
            self.element("name", &section.title);
        }
        for block in &section.blocks {
            match block {
                Block::Paragraph(p) => self.element("t", &p.text),
                Block::Artwork(a) => self.render_artwork(&a.lines),
                Block::Section(s) => self.render_section(s),
            }
        }
        self.close("section");
    }

    /// Artwork payload is emitted newline-for-newline, and the closing
    /// tag is not indented, so the content between the tags is exactly
    /// the input lines.
    fn render_artwork(&mut self, lines: &[String]) {
        if self.table.artwork_in_figure {
            self.open("<figure>");
        }
        self.line("<artwork>");
        for line in lines {
            self.out.push_str(&escape_text(line));
            self.out.push('\n');
        }
        self.out.push_str("</artwork>\n");
        if self.table.artwork_in_figure {
            self.close("figure");
        }
    }

    fn render_back(&mut self, doc: &Document) {
        if doc.references.is_empty() {
            return;
        }
        self.open("<back>");
        for section in &doc.references {
            if self.table.title_as_attr {
                self.open(&format!("<references{}>", attr("title", &section.title)));
            } else {
                self.open("<references>");
                self.element("name", &section.title);
            }
            for entry in &section.entries {
                self.render_reference(entry);
            }
            self.close("references");
        }
        self.close("back");
    }

    fn render_reference(&mut self, entry: &Reference) {
        let mut tag = format!("<reference{}", attr("anchor", &entry.anchor));
        if let Some(target) = &entry.target {
            tag.push_str(&attr("target", target));
        }
        tag.push('>');
        self.open(&tag);

        self.open("<front>");
        self.element("title", &entry.title);
        for name in &entry.authors {
            self.render_reference_author(name);
        }
        if let Some(date) = &entry.date {
            self.render_date(date);
        }
        self.close("front");

        for info in &entry.series {
            self.line(&format!(
                "<seriesInfo{}{}/>",
                attr("name", &info.name),
                attr("value", &info.value)
            ));
        }
        self.close("reference");
    }

    /// Citation author strings come in surname-first (`Bradner, S.`),
    /// initials-first (`T. Wu`), or organization form.
    fn render_reference_author(&mut self, name: &str) {
        static SURNAME_FIRST: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"^(\p{Lu}[\p{L}'-]*), ((?:[A-Z]\.[ -]?)+?)(, Ed\.)?$").unwrap()
        });
        static INITIALS_FIRST: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^((?:[A-Z]\.[ -]?)+) ?(\p{Lu}[\p{L}'-]*)$").unwrap());

        if let Some(c) = SURNAME_FIRST.captures(name) {
            let (surname, initials) = (&c[1], c[2].trim());
            let mut tag = format!(
                "<author{}{}{}",
                attr("fullname", &format!("{} {}", initials, surname)),
                attr("initials", initials),
                attr("surname", surname),
            );
            if c.get(3).is_some() {
                tag.push_str(&attr("role", "editor"));
            }
            tag.push_str("/>");
            self.line(&tag);
        } else if let Some(c) = INITIALS_FIRST.captures(name) {
            let (initials, surname) = (c[1].trim(), &c[2]);
            self.line(&format!(
                "<author{}{}{}/>",
                attr("fullname", name),
                attr("initials", initials),
                attr("surname", surname),
            ));
        } else {
            self.open("<author>");
            self.element("organization", name);
            self.close("author");
        }
    }
}

fn attr(name: &str, value: &str) -> String {
    format!(" {}=\"{}\"", name, escape_attr(value))
}

fn join_numbers(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Escape reserved characters in element text.
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape reserved characters in attribute values.
fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}
