//! High-level conversion driver.
//!
//! Ties the pipeline together: strip, parse, render. One call per input
//! file; files are independent, so multi-file runs can fan out across a
//! thread pool without changing observable behavior.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::diag::Diagnostic;
use crate::error::Result;
use crate::parser::{lines_to_text, read_lines, strip_pagebreaks, DraftParser, ParseOptions};
use crate::render::{to_xml, RenderOptions};

/// Options for document conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Parsing options and metadata overrides.
    pub parse: ParseOptions,

    /// Rendering options (schema version).
    pub render: RenderOptions,

    /// Only strip page furniture; do not convert to XML.
    pub strip_only: bool,

    /// Process multiple input files in parallel.
    pub parallel: bool,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set parsing options.
    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// Enable strip-only mode.
    pub fn strip_only(mut self) -> Self {
        self.strip_only = true;
        self
    }

    /// Enable or disable parallel processing across files.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// File extension the output should carry.
    pub fn output_extension(&self) -> &'static str {
        if self.strip_only {
            "raw"
        } else {
            "xml"
        }
    }
}

/// Result of converting one document.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Converted content: XML, or cleaned text in strip-only mode.
    pub content: String,

    /// Diagnostics collected while converting.
    pub diagnostics: Vec<Diagnostic>,
}

impl ConvertResult {
    /// Check whether any diagnostics were recorded.
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Convert draft text to XML (or cleaned text in strip-only mode).
pub fn convert_str(text: &str, options: &ConvertOptions) -> Result<ConvertResult> {
    if options.strip_only {
        let lines = read_lines(text);
        let (stripped, _) = strip_pagebreaks(&lines);
        return Ok(ConvertResult {
            content: lines_to_text(&stripped),
            diagnostics: Vec::new(),
        });
    }

    let parser = DraftParser::new(options.parse.clone());
    let (doc, mut diags) = parser.parse(text);
    let content = to_xml(&doc, &options.render, &mut diags)?;
    Ok(ConvertResult {
        content,
        diagnostics: diags.into_vec(),
    })
}

/// Read and convert a single file.
pub fn convert_file(path: &Path, options: &ConvertOptions) -> Result<ConvertResult> {
    let text = std::fs::read_to_string(path)?;
    convert_str(&text, options)
}

/// Convert several files, each independently.
///
/// A failing file does not stop the others; every path gets its own
/// result. With `options.parallel` set, files are distributed across a
/// thread pool (one worker per file, no shared state).
pub fn convert_paths(
    paths: &[PathBuf],
    options: &ConvertOptions,
) -> Vec<(PathBuf, Result<ConvertResult>)> {
    if options.parallel && paths.len() > 1 {
        paths
            .par_iter()
            .map(|p| (p.clone(), convert_file(p, options)))
            .collect()
    } else {
        paths
            .iter()
            .map(|p| (p.clone(), convert_file(p, options)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DRAFT: &str = "\
Network Working Group                                             J. Doe
Internet-Draft                                               Example Inc
Intended status: Informational                             5 August 2025


                            A Tiny Test Draft
                          draft-doe-tiny-test-00

Abstract

   Exercises the conversion driver.

1.  Introduction

   Only one section.
";

    #[test]
    fn test_convert_str_xml() {
        let result = convert_str(DRAFT, &ConvertOptions::new()).unwrap();
        assert!(result.content.starts_with("<?xml"));
        assert!(result.content.contains("<title>A Tiny Test Draft</title>"));
    }

    #[test]
    fn test_strip_only_mode() {
        let options = ConvertOptions::new().strip_only();
        let result = convert_str(DRAFT, &options).unwrap();
        assert!(result.content.contains("A Tiny Test Draft"));
        assert!(!result.content.contains("<?xml"));
        assert!(result.content.ends_with('\n'));
        assert_eq!(options.output_extension(), "raw");
    }

    #[test]
    fn test_convert_paths_reports_each_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        let mut f = std::fs::File::create(&good).unwrap();
        f.write_all(DRAFT.as_bytes()).unwrap();
        let missing = dir.path().join("missing.txt");

        let results = convert_paths(&[good.clone(), missing.clone()], &ConvertOptions::new());
        assert_eq!(results.len(), 2);
        assert!(results.iter().find(|(p, _)| *p == good).unwrap().1.is_ok());
        assert!(results.iter().find(|(p, _)| *p == missing).unwrap().1.is_err());
    }

    #[test]
    fn test_convert_paths_parallel_matches_sequential() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for i in 0..3 {
            let p = dir.path().join(format!("d{}.txt", i));
            std::fs::write(&p, DRAFT).unwrap();
            paths.push(p);
        }
        let seq = convert_paths(&paths, &ConvertOptions::new());
        let par = convert_paths(&paths, &ConvertOptions::new().with_parallel(true));
        for ((p1, r1), (p2, r2)) in seq.iter().zip(par.iter()) {
            assert_eq!(p1, p2);
            assert_eq!(
                r1.as_ref().unwrap().content,
                r2.as_ref().unwrap().content
            );
        }
    }
}
