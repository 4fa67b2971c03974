//! Rendering options and schema selection.

use std::fmt;

/// Target XML vocabulary.
///
/// `V2` is the RFC 7749 schema, `V3` the RFC 7991 schema. The two share
/// most element names; the differences are table-driven in the
/// serializer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaVersion {
    /// RFC 7749 vocabulary (default).
    #[default]
    V2,
    /// RFC 7991 vocabulary.
    V3,
}

impl SchemaVersion {
    /// Short name as used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::V2 => "v2",
            SchemaVersion::V3 => "v3",
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for rendering a parsed document.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Target schema version.
    pub schema: SchemaVersion,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target schema version.
    pub fn with_schema(mut self, schema: SchemaVersion) -> Self {
        self.schema = schema;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_v2() {
        assert_eq!(RenderOptions::default().schema, SchemaVersion::V2);
        assert_eq!(SchemaVersion::V2.as_str(), "v2");
    }

    #[test]
    fn test_builder() {
        let options = RenderOptions::new().with_schema(SchemaVersion::V3);
        assert_eq!(options.schema, SchemaVersion::V3);
    }
}
