//! Parsing options and metadata overrides.

use crate::error::Result;
use crate::model::Stream;

/// Options for parsing draft text.
///
/// The override fields take precedence over anything inferred from the
/// first-page header. Stream values are validated when the option is
/// built, so an invalid override fails before any file is read.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Publication stream override.
    pub stream: Option<Stream>,

    /// IPR declaration override (e.g. `trust200902`).
    pub ipr: Option<String>,

    /// Consensus override.
    pub consensus: Option<bool>,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stream override.
    pub fn with_stream(mut self, stream: Stream) -> Self {
        self.stream = Some(stream);
        self
    }

    /// Set the stream override from its textual name.
    ///
    /// Fails for anything outside IETF, IAB, IRTF, independent.
    pub fn with_stream_name(mut self, name: &str) -> Result<Self> {
        self.stream = Some(name.parse()?);
        Ok(self)
    }

    /// Set the ipr override.
    pub fn with_ipr(mut self, ipr: impl Into<String>) -> Self {
        self.ipr = Some(ipr.into());
        self
    }

    /// Set the consensus override.
    pub fn with_consensus(mut self, consensus: bool) -> Self {
        self.consensus = Some(consensus);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let options = ParseOptions::new()
            .with_stream(Stream::Irtf)
            .with_ipr("trust200902")
            .with_consensus(true);

        assert_eq!(options.stream, Some(Stream::Irtf));
        assert_eq!(options.ipr.as_deref(), Some("trust200902"));
        assert_eq!(options.consensus, Some(true));
    }

    #[test]
    fn test_stream_name_validation() {
        assert!(ParseOptions::new().with_stream_name("IAB").is_ok());
        assert!(ParseOptions::new().with_stream_name("ISO").is_err());
    }
}
