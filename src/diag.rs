//! Line-addressable diagnostics collected during conversion.
//!
//! The parsing engine never prints or aborts on a recoverable anomaly; it
//! records a [`Diagnostic`] and degrades. The caller (normally the CLI)
//! decides what to show. Every diagnostic is also mirrored to the `log`
//! facade so library embedders get them for free.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a recorded diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Recoverable anomaly; conversion continued.
    Warning,
    /// The document (or a required part of it) could not be produced.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic message, optionally tied to a source line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity of the condition.
    pub severity: Severity,

    /// Source line number (1-based) in the input text, if known.
    pub line: Option<usize>,

    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(n) => write!(f, "{}: line {}: {}", self.severity, n, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Collector for diagnostics produced while converting one document.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning tied to a source line.
    pub fn warn(&mut self, line: usize, message: impl Into<String>) {
        let message = message.into();
        log::warn!("line {}: {}", line, message);
        self.items.push(Diagnostic {
            severity: Severity::Warning,
            line: Some(line),
            message,
        });
    }

    /// Record a warning with no specific source line.
    pub fn warn_global(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.items.push(Diagnostic {
            severity: Severity::Warning,
            line: None,
            message,
        });
    }

    /// Record an error-level diagnostic with no specific source line.
    pub fn error_global(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::error!("{}", message);
        self.items.push(Diagnostic {
            severity: Severity::Error,
            line: None,
            message,
        });
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over recorded diagnostics in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Consume the collector and return the recorded diagnostics.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_in_order() {
        let mut diags = Diagnostics::new();
        diags.warn(10, "unmatched reference [X]");
        diags.warn_global("no document date found");

        assert_eq!(diags.len(), 2);
        let items: Vec<_> = diags.iter().collect();
        assert_eq!(items[0].line, Some(10));
        assert_eq!(items[1].line, None);
    }

    #[test]
    fn test_display() {
        let d = Diagnostic {
            severity: Severity::Warning,
            line: Some(7),
            message: "duplicate anchor [RFC2119]".to_string(),
        };
        assert_eq!(d.to_string(), "warning: line 7: duplicate anchor [RFC2119]");
    }
}
