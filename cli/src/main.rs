//! id2xml CLI - convert text format RFCs and Internet-Drafts to XML

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use id2xml::{
    convert_str, to_json, ConvertOptions, ConvertResult, DraftParser, JsonFormat, ParseOptions,
    RenderOptions, SchemaVersion,
};

#[derive(Parser)]
#[command(name = "id2xml")]
#[command(version)]
#[command(about = "Convert text format RFCs and Internet-Drafts to XML", long_about = None)]
struct Cli {
    /// Text format draft(s) to be converted to xml
    #[arg(value_name = "DRAFT", required = true)]
    drafts: Vec<PathBuf>,

    /// Output v2 (RFC 7749) schema
    #[arg(short = '2', long = "v2", conflicts_with = "v3")]
    v2: bool,

    /// Output v3 (RFC 7991) schema
    #[arg(short = '3', long = "v3")]
    v3: bool,

    /// Set the doc consensus, one of yes, no
    #[arg(long = "doc-consensus", value_name = "CONS")]
    doc_consensus: Option<String>,

    /// Set the doc ipr value (e.g., trust200902)
    #[arg(long = "doc-ipr", value_name = "IPR")]
    doc_ipr: Option<String>,

    /// Set the doc stream, one of IETF, IAB, IRTF, or independent
    #[arg(long = "doc-stream", value_name = "STREAM")]
    doc_stream: Option<String>,

    /// Set the output file name ('-' for stdout)
    #[arg(
        short = 'o',
        long = "out",
        value_name = "FILE",
        conflicts_with = "output_path"
    )]
    output_file: Option<PathBuf>,

    /// Set the output directory name
    #[arg(short = 'p', long = "path", value_name = "DIR")]
    output_path: Option<PathBuf>,

    /// Be more quiet
    #[arg(short, long)]
    quiet: bool,

    /// Don't convert, only strip headers and footers
    #[arg(short = 's', long = "strip-only")]
    strip_only: bool,

    /// Dump the parsed document model as JSON instead of XML
    #[arg(long, conflicts_with = "strip_only")]
    json: bool,

    /// Be (slightly) more verbose
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // Configuration errors abort before any file is read.
    let options = match build_options(&cli) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    let to_stdout = cli.output_file.as_deref() == Some(Path::new("-"));
    let progress = make_progress(&cli, to_stdout);

    let mut failures = 0usize;
    for draft in &cli.drafts {
        if let Err(e) = process_file(draft, &cli, &options) {
            failures += 1;
            eprintln!(
                "{}: failure converting {}: {}",
                "Error".red().bold(),
                draft.display(),
                e
            );
        }
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }
    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    if failures > 0 {
        eprintln!(
            "{}: {} of {} files failed",
            "Error".red().bold(),
            failures,
            cli.drafts.len()
        );
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn build_options(cli: &Cli) -> id2xml::Result<ConvertOptions> {
    let mut parse = ParseOptions::new();
    if let Some(stream) = &cli.doc_stream {
        parse = parse.with_stream_name(stream)?;
    }
    if let Some(ipr) = &cli.doc_ipr {
        parse = parse.with_ipr(ipr);
    }
    if let Some(consensus) = &cli.doc_consensus {
        let value = match consensus.to_lowercase().as_str() {
            "yes" => true,
            "no" => false,
            other => {
                return Err(id2xml::Error::Config(format!(
                    "expected one of yes, no for consensus, but got '{}'",
                    other
                )))
            }
        };
        parse = parse.with_consensus(value);
    }

    if cli.output_file.is_some() && cli.drafts.len() > 1 {
        return Err(id2xml::Error::Config(
            "the -o option requires a single input file".to_string(),
        ));
    }

    let schema = match (cli.v2, cli.v3) {
        (_, true) => SchemaVersion::V3,
        _ => SchemaVersion::V2,
    };

    let mut options = ConvertOptions::new()
        .with_parse_options(parse)
        .with_render_options(RenderOptions::new().with_schema(schema));
    if cli.strip_only {
        options = options.strip_only();
    }
    Ok(options)
}

fn make_progress(cli: &Cli, to_stdout: bool) -> Option<ProgressBar> {
    if cli.drafts.len() < 2 || cli.quiet || to_stdout {
        return None;
    }
    let pb = ProgressBar::new(cli.drafts.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("static template")
            .progress_chars("#>-"),
    );
    Some(pb)
}

fn process_file(
    draft: &Path,
    cli: &Cli,
    options: &ConvertOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = output_target(draft, cli, options)?;

    if !cli.quiet {
        let verb = if cli.strip_only {
            "Stripping"
        } else {
            "Converting"
        };
        eprintln!(" {} '{}'", verb, draft.display());
    }

    let text = fs::read_to_string(draft)?;
    let result = if cli.json {
        dump_json(&text, options)?
    } else {
        convert_str(&text, options)?
    };
    log::info!(
        "converted {} ({} diagnostics)",
        draft.display(),
        result.diagnostics.len()
    );

    if !cli.quiet {
        for diag in &result.diagnostics {
            eprintln!("{}: {}", draft.display(), diag);
        }
    }

    match output {
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(result.content.as_bytes())?;
        }
        Some(path) => {
            fs::write(&path, &result.content)?;
            if !cli.quiet {
                eprintln!(" Written to '{}'", path.display());
            }
        }
    }
    Ok(())
}

/// Dump the parsed model as JSON, keeping the collected diagnostics.
fn dump_json(text: &str, options: &ConvertOptions) -> id2xml::Result<ConvertResult> {
    let parser = DraftParser::new(options.parse.clone());
    let (doc, diags) = parser.parse(text);
    let content = to_json(&doc, JsonFormat::Pretty)?;
    Ok(ConvertResult {
        content,
        diagnostics: diags.into_vec(),
    })
}

/// Work out where the output goes: `None` means stdout.
///
/// An implicit output name (derived from the input name) refuses to
/// overwrite an existing file unless we are only stripping; the existing
/// file could well be the authors' original XML.
fn output_target(
    draft: &Path,
    cli: &Cli,
    options: &ConvertOptions,
) -> Result<Option<PathBuf>, String> {
    let extension = if cli.json {
        "json"
    } else {
        options.output_extension()
    };

    if let Some(out) = &cli.output_file {
        if out == Path::new("-") {
            return Ok(None);
        }
        return Ok(Some(out.clone()));
    }
    if let Some(dir) = &cli.output_path {
        let name = draft.file_stem().unwrap_or_default();
        return Ok(Some(dir.join(name).with_extension(extension)));
    }

    let implied = draft.with_extension(extension);
    if !cli.strip_only && implied.exists() {
        return Err(format!(
            "The implied output file ({}) already exists.  Provide an explicit \
             output filename (with -o) or a directory path (with -p) if you want \
             id2xml to overwrite an existing file.",
            implied.display()
        ));
    }
    Ok(Some(implied))
}
