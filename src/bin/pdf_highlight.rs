//! CLI tool for highlighting configured phrases in a PDF

use clap::Parser;
use pdf_highlighter::{process_pdf, ColorMapping, Grouping, HighlightError, HighlightOptions};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    name = "pdf-highlight",
    version,
    about = "Highlight configured phrases in a PDF, one color per phrase group"
)]
struct Cli {
    /// Input PDF
    input: PathBuf,

    /// Color → phrases JSON file
    #[arg(short, long, default_value = "color_phrases.json")]
    config: PathBuf,

    /// Directory the highlighted PDF is written to
    #[arg(short, long, default_value = "data/output")]
    output_dir: PathBuf,

    /// Prefix for the output file name (e.g. "hl_")
    #[arg(short, long, default_value = "")]
    prefix: String,

    /// One annotation per occurrence instead of one per phrase and page
    #[arg(long)]
    per_occurrence: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Everything a run needs, resolved from the command line
#[derive(Debug)]
struct RunConfig {
    input: PathBuf,
    output: PathBuf,
    config: PathBuf,
    options: HighlightOptions,
}

impl RunConfig {
    fn from_cli(cli: Cli) -> Result<Self, HighlightError> {
        let output = output_path(&cli.input, &cli.output_dir, &cli.prefix)?;
        let grouping = if cli.per_occurrence {
            Grouping::PerOccurrence
        } else {
            Grouping::PerPhrase
        };
        Ok(Self {
            input: cli.input,
            output,
            config: cli.config,
            options: HighlightOptions {
                grouping,
                ..Default::default()
            },
        })
    }
}

fn output_path(input: &Path, output_dir: &Path, prefix: &str) -> Result<PathBuf, HighlightError> {
    let file_name = input.file_name().ok_or_else(|| {
        HighlightError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("input path has no file name: {}", input.display()),
        ))
    })?;
    let mut name = std::ffi::OsString::from(prefix);
    name.push(file_name);
    Ok(output_dir.join(name))
}

fn run(config: &RunConfig) -> Result<(), HighlightError> {
    let start = Instant::now();

    // Configuration errors surface before the document is opened
    let mapping = ColorMapping::load(&config.config)?;
    if mapping.is_empty() {
        log::warn!("{} configures no colors", config.config.display());
    }

    let report = process_pdf(&config.input, &config.output, &mapping, &config.options)?;

    println!("PDF Highlighting");
    println!("================");
    println!("File: {}", config.input.display());
    println!("Pages: {}", report.page_count);
    println!();
    for ((color, phrase), count) in &report.matches_per_phrase {
        println!("  {:<10} {:>5}  {}", color, count, phrase);
    }
    println!();
    println!("Annotations: {}", report.annotations);
    println!("Processing time: {}ms", start.elapsed().as_millis());
    println!("Output: {}", config.output.display());

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = RunConfig::from_cli(cli).and_then(|config| run(&config));
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
