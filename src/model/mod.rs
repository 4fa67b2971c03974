//! Document model types.

mod document;
mod frontmatter;
mod reference;

pub use document::{Artwork, Block, Document, Paragraph, Section, SourceLine};
pub use frontmatter::{Author, DocDate, FrontMatter, Stream};
pub use reference::{Reference, ReferenceSection, SeriesInfo};
