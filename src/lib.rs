//! # id2xml
//!
//! Convert plain-text IETF Internet-Drafts and RFCs (the canonical
//! rendering produced by the xml2rfc toolchain) back into structured XML
//! following the RFC 7749 (v2) or RFC 7991 (v3) schema.
//!
//! ## Quick Start
//!
//! ```no_run
//! use id2xml::{convert_file, ConvertOptions};
//!
//! fn main() -> id2xml::Result<()> {
//!     let options = ConvertOptions::new();
//!     let result = convert_file("draft-example-00.txt".as_ref(), &options)?;
//!     println!("{}", result.content);
//!     Ok(())
//! }
//! ```
//!
//! ## How it works
//!
//! - **Page-break stripping**: running headers/footers and form feeds
//!   are removed, keeping original line numbers for diagnostics.
//! - **Structure reconstruction**: indentation and heading conventions
//!   rebuild the section/paragraph/artwork tree.
//! - **Front matter and references**: the first page and the reference
//!   sections are interpreted with ordered heuristic matchers; anything
//!   unrecognized degrades gracefully and is reported, never fatal.
//! - **Schema-aware output**: one document model, two XML vocabularies.

pub mod convert;
pub mod diag;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use convert::{convert_file, convert_paths, convert_str, ConvertOptions, ConvertResult};
pub use diag::{Diagnostic, Diagnostics, Severity};
pub use error::{Error, Result};
pub use model::{
    Artwork, Author, Block, DocDate, Document, FrontMatter, Paragraph, Reference,
    ReferenceSection, Section, SeriesInfo, SourceLine, Stream,
};
pub use parser::{
    lines_to_text, read_lines, strip_pagebreaks, DraftParser, ParseOptions, StripStats,
};
pub use render::{to_json, to_xml, JsonFormat, RenderOptions, SchemaVersion};
