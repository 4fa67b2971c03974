//! Rendering module for converting parsed drafts to output formats.

mod json;
mod options;
mod xml;

pub use json::{to_json, JsonFormat};
pub use options::{RenderOptions, SchemaVersion};
pub use xml::to_xml;
