//! CLI tool for building a month's MSEP presentation from schedule PDFs.

use anyhow::{bail, Context, Result};
use clap::Parser;
use msep_core::{EventRecord, ParserConfig, Period, ScheduleExtractor};
use msep_pdf::PdfTextSource;
use msep_pptx::{PlaceholderSet, SlideGenerator, Template};
use serde::Deserialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Build a month's MSEP presentation from schedule PDFs and a slide template.
#[derive(Parser, Debug)]
#[command(name = "msep-slides")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Month to extract (Eylül ... Haziran)
    #[arg(short, long)]
    month: Period,

    /// Directory holding the schedule PDFs and the template
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Template .pptx (default: discovered in the input directory)
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Output directory (default: the input directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with parser settings and placeholder tokens
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the extracted records as JSON instead of generating slides
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Settings file layout: parser settings at the top level, template tokens
/// under `placeholders`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Settings {
    #[serde(flatten)]
    parser: ParserConfig,
    placeholders: PlaceholderSet,
}

/// Input files found in a directory.
#[derive(Debug, PartialEq)]
struct Inputs {
    pdfs: Vec<PathBuf>,
    template: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let settings = match &args.config {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };

    let inputs = discover_inputs(&args.dir)?;
    if inputs.pdfs.is_empty() {
        bail!("no PDF files found in {}", args.dir.display());
    }

    log::debug!("PDFs: {:?}", inputs.pdfs);

    let extractor = ScheduleExtractor::with_config(&settings.parser);
    let source = PdfTextSource::new();

    if args.json {
        let records = extractor.extract_all(&source, &inputs.pdfs, args.month.name());
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    // the template must be usable before any PDF is parsed
    let template_path = match args.template.clone().or(inputs.template) {
        Some(path) => path,
        None => bail!("no template (.pptx) found in {}", args.dir.display()),
    };
    log::debug!("Template: {}", template_path.display());
    let template = Template::open(&template_path)
        .with_context(|| format!("Failed to open template {}", template_path.display()))?;

    let records = extractor.extract_all(&source, &inputs.pdfs, args.month.name());
    if records.is_empty() {
        println!("No events found for {}.", args.month);
        return Ok(());
    }

    print_summary(&records);

    let bytes = SlideGenerator::new()
        .with_placeholders(settings.placeholders.clone())
        .generate(&template, &records)
        .context("Failed to generate presentation")?;

    let output_path = get_output_path(&args.dir, args.output.as_ref(), args.month)?;
    write_output(&output_path, &bytes)?;
    println!("Written to: {}", output_path.display());

    Ok(())
}

fn load_settings(path: &Path) -> Result<Settings> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid settings in {}", path.display()))
}

/// Find schedule PDFs and the slide template in `dir`.
fn discover_inputs(dir: &Path) -> Result<Inputs> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut pdfs = Vec::new();
    let mut templates = Vec::new();

    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if has_extension(&path, "pdf") {
            pdfs.push(path);
        } else if has_extension(&path, "pptx") && !name.starts_with("~$") {
            templates.push(path);
        }
    }

    pdfs.sort();
    templates.sort();

    let template = templates
        .iter()
        .find(|p| file_name_lower(p).contains("sablon"))
        .or_else(|| templates.first())
        .cloned();

    Ok(Inputs { pdfs, template })
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn file_name_lower(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_lowercase()
}

fn print_summary(records: &[EventRecord]) {
    for record in records {
        println!(
            "{} | {} | {} konuşmacı",
            record.date,
            record.topic,
            record.speakers.len()
        );
    }
}

/// Output file name for a month's presentation.
fn output_file_name(period: Period) -> String {
    format!("MSEP_{}_Sunumu.pptx", period.name())
}

/// Determine the output path for a month's presentation.
fn get_output_path(input_dir: &Path, output_dir: Option<&PathBuf>, period: Period) -> Result<PathBuf> {
    let output_filename = output_file_name(period);

    let output_path = match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(output_filename)
        }
        None => input_dir.join(output_filename),
    };

    Ok(output_path)
}

/// Write output to a file.
fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
