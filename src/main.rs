use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use text_extractor::export::ExportArtifact;
use text_extractor::{
    ingest, init_logging, parse_types, BatchExtraction, Config, CsvCommaMode, ExportFormat, ExtractError,
    ExtractionType, Session,
};
use tracing::info;

/// Extract emails, URLs, phone numbers, dates, numbers and custom patterns from text
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Plain-text files to read (stdin when none are given)
    #[arg(index = 1)]
    files: Vec<PathBuf>,

    /// Types to extract (comma-separated, e.g. "email,url")
    #[arg(short, long)]
    types: Option<String>,

    /// Custom case-insensitive regular expression
    #[arg(short = 'p', long)]
    custom: Option<String>,

    /// Export format: csv, txt or json
    #[arg(short, long)]
    format: Option<ExportFormat>,

    /// Write exports into this directory instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also save the complete text as its own file (requires --output)
    #[arg(long)]
    full_text: bool,

    /// Print the plain summary of every non-empty result
    #[arg(long)]
    copy_all: bool,

    /// Show text statistics and per-type counts
    #[arg(short, long)]
    stats: bool,

    /// Write commas in CSV values without a backslash escape
    #[arg(long)]
    csv_strict: bool,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn notify(err: &ExtractError) {
    eprintln!("{}: {}", err.severity().as_str(), err);
}

fn read_input(args: &Args, config: &Config) -> io::Result<String> {
    if args.files.is_empty() {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    let progress_bar = if args.files.len() > 1 {
        let pb = ProgressBar::new(args.files.len() as u64);
        pb.set_style(ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"));
        Some(pb)
    } else {
        None
    };

    let ingested = ingest::read_sources_with(&args.files, config.max_file_bytes, |_| {
        if let Some(pb) = &progress_bar {
            pb.inc(1);
        }
    });
    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    for (path, reason) in &ingested.skipped {
        eprintln!("error: {}: {}", path.display(), reason);
    }
    info!(loaded = ingested.loaded.len(), skipped = ingested.skipped.len(), "input files processed");

    Ok(ingested.text)
}

fn write_artifact(dir: &Path, artifact: &ExportArtifact) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&artifact.filename);
    fs::write(&path, &artifact.content)?;
    println!("Wrote {} ({})", path.display(), artifact.mime);
    Ok(())
}

/// An export without `--output` owns stdout, so everything else goes to stderr.
fn export_to_stdout(args: &Args) -> bool {
    args.format.is_some() && args.output.is_none()
}

fn write_results(out: &mut dyn Write, batch: &BatchExtraction) -> io::Result<()> {
    for (kind, matches) in &batch.results {
        writeln!(out, "\n{} ({}):", kind, matches.len())?;
        if matches.is_empty() {
            writeln!(out, "  No results found")?;
        }
        for item in matches {
            writeln!(out, "  {}", item)?;
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(if args.verbose { "debug" } else { "warn" });

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if args.csv_strict {
        config.csv_commas = CsvCommaMode::Strict;
    }

    let mut types = match &args.types {
        Some(list) => parse_types(list)?,
        None => config.default_types.clone(),
    };
    if args.custom.is_some() && !types.contains(&ExtractionType::Custom) {
        types.push(ExtractionType::Custom);
    }

    let text = read_input(&args, &config)?;
    if text.trim().is_empty() {
        notify(&ExtractError::EmptyInput);
        process::exit(2);
    }

    let mut session = Session::new(config);
    let batch = session.extract_types(&types, &text, args.custom.as_deref());

    let mut console: Box<dyn Write> = if export_to_stdout(&args) {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    };

    write_results(&mut *console, &batch)?;
    for (_, err) in &batch.failures {
        notify(err);
    }

    if args.stats {
        if let Some(stats) = session.stats() {
            writeln!(console, "\n{} chars, {} words, {} lines", stats.chars, stats.words, stats.lines)?;
        }
        for (label, count) in &session.counts().0 {
            writeln!(console, "  {:<8} {}", label, count)?;
        }
    }

    if args.copy_all {
        match session.copy_all() {
            Ok(summary) => write!(console, "\n{}", summary)?,
            Err(err) => notify(&err),
        }
    }
    console.flush()?;

    if let Some(format) = args.format {
        match session.export(format) {
            Ok(artifact) => match &args.output {
                Some(dir) => write_artifact(dir, &artifact)?,
                None => print!("{}", artifact.content),
            },
            Err(err) => notify(&err),
        }
    }

    if args.full_text {
        match (&args.output, session.export_full_text()) {
            (Some(dir), Ok(artifact)) => write_artifact(dir, &artifact)?,
            (None, Ok(_)) => eprintln!("warning: --full-text needs --output"),
            (_, Err(err)) => notify(&err),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use text_extractor::PatternRegistry;

    #[test]
    fn test_export_without_output_owns_stdout() {
        let cases = vec![
            (vec!["text-extractor", "--format", "json"], true),
            (vec!["text-extractor", "--format", "csv", "--output", "out"], false),
            (vec!["text-extractor", "--types", "email"], false),
        ];

        for (argv, expected) in cases {
            let args = Args::parse_from(argv.clone());
            assert_eq!(export_to_stdout(&args), expected, "Routing for {:?}", argv);
        }
    }

    #[test]
    fn test_write_results_listing() {
        let mut registry = PatternRegistry::new();
        let batch = text_extractor::extract_all(
            &mut registry,
            &[ExtractionType::Email, ExtractionType::Phone],
            "mail a@b.com",
            None,
        );

        let mut out = Vec::new();
        write_results(&mut out, &batch).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\nemail (1):\n  a@b.com\n\nphone (0):\n  No results found\n"
        );
    }
}
