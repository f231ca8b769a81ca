//! pdftab CLI - PDF table extraction and summarization tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdftab::summarize::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use pdftab::{
    process_upload, render, ChatSummarizer, DetectionMode, ErrorMode, ExtractOptions, Extraction,
    JsonFormat, PageSelection, PipelineOptions, Report, SummarizerConfig, TableFormat,
    UploadSession,
};

#[derive(Parser)]
#[command(name = "pdftab")]
#[command(version)]
#[command(about = "Extract tables from PDF files and summarize them", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract tables from a PDF
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: FormatArg,

        /// Table detection mode
        #[arg(long, value_enum, default_value = "auto")]
        mode: ModeArg,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Fail on the first unreadable page instead of skipping it
        #[arg(long)]
        strict: bool,
    },

    /// Extract tables and summarize each one with a language model
    Summarize {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// API key for the chat-completions endpoint
        #[arg(long, env = "MISTRAL_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Model name
        #[arg(long, env = "PDFTAB_MODEL", default_value = DEFAULT_MODEL)]
        model: String,

        /// Chat-completions endpoint
        #[arg(long, env = "PDFTAB_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
        endpoint: String,

        /// Request timeout in seconds
        #[arg(long, default_value = "60")]
        timeout: u64,

        /// Table detection mode
        #[arg(long, value_enum, default_value = "auto")]
        mode: ModeArg,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
enum FormatArg {
    /// Aligned plain text
    Text,
    /// Markdown pipe tables
    Markdown,
    /// HTML tables
    Html,
    /// JSON array of tables
    Json,
}

impl From<FormatArg> for TableFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => TableFormat::Text,
            FormatArg::Markdown => TableFormat::Markdown,
            FormatArg::Html => TableFormat::Html,
            FormatArg::Json => TableFormat::Json,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
enum ModeArg {
    /// Ruled tables first, then whitespace-aligned tables
    Auto,
    /// Whitespace-aligned tables only
    Stream,
    /// Ruled tables only
    Lattice,
}

impl From<ModeArg> for DetectionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Auto => DetectionMode::Auto,
            ModeArg::Stream => DetectionMode::Stream,
            ModeArg::Lattice => DetectionMode::Lattice,
        }
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Extract {
            input,
            output,
            format,
            mode,
            pages,
            strict,
        }) => cmd_extract(
            &input,
            output.as_deref(),
            format,
            mode,
            pages.as_deref(),
            strict,
        ),
        Some(Commands::Summarize {
            input,
            api_key,
            model,
            endpoint,
            timeout,
            mode,
            pages,
        }) => {
            let mut config = SummarizerConfig::new()
                .with_model(model)
                .with_endpoint(endpoint)
                .with_timeout(timeout);
            if let Some(key) = api_key {
                config = config.with_api_key(key);
            }
            cmd_summarize(&input, config, mode, pages.as_deref())
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: print every table as text
            if let Some(input) = cli.input {
                cmd_extract(&input, None, FormatArg::Text, ModeArg::Auto, None, false)
            } else {
                println!("{}", "Usage: pdftab <FILE>".yellow());
                println!("       pdftab --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn extract_options(
    mode: ModeArg,
    pages: Option<&str>,
    strict: bool,
) -> Result<ExtractOptions, Box<dyn std::error::Error>> {
    let page_selection = match pages {
        Some(p) => PageSelection::parse(p)?,
        None => PageSelection::All,
    };
    let error_mode = if strict {
        ErrorMode::Strict
    } else {
        ErrorMode::Lenient
    };

    Ok(ExtractOptions::new()
        .with_error_mode(error_mode)
        .with_pages(page_selection)
        .with_mode(mode.into()))
}

fn spinner(message: &'static str) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    format: FormatArg,
    mode: ModeArg,
    pages: Option<&str>,
    strict: bool,
) -> CliResult {
    let options = extract_options(mode, pages, strict)?.with_format(format.into());
    log::info!(
        "Extracting tables from {} (mode {:?}, pages {:?})",
        input.display(),
        options.mode,
        options.pages
    );

    let pb = spinner("Extracting tables...")?;
    let result = pdftab::extract_tables_with_options(input, &options);
    pb.finish_and_clear();
    let extraction = result?;
    log::debug!("Found {} tables in {}", extraction.len(), input.display());

    if extraction.is_empty() {
        eprintln!("{}", "No tables found in the document.".yellow());
        return Ok(());
    }

    let content = format_extraction(&extraction, format)?;
    if let Some(path) = output {
        fs::write(path, &content)?;
        println!(
            "{} {} tables to {}",
            "Saved".green(),
            extraction.len(),
            path.display()
        );
    } else {
        println!("{}", content);
    }

    Ok(())
}

/// Join the rendered tables into one document.
fn format_extraction(
    extraction: &Extraction,
    format: FormatArg,
) -> Result<String, Box<dyn std::error::Error>> {
    if format == FormatArg::Json {
        return Ok(render::to_json(&extraction.tables[..], JsonFormat::Pretty)?);
    }

    let sections: Vec<String> = extraction
        .iter()
        .enumerate()
        .map(|(i, (table, rendered))| match format {
            FormatArg::Markdown => format!("## Table {} (page {})\n\n{}", i + 1, table.page, rendered),
            FormatArg::Html => format!("<h2>Table {} (page {})</h2>\n{}", i + 1, table.page, rendered),
            _ => format!("Table {} (page {})\n{}", i + 1, table.page, rendered),
        })
        .collect();

    Ok(sections.join("\n\n"))
}

fn cmd_summarize(
    input: &Path,
    config: SummarizerConfig,
    mode: ModeArg,
    pages: Option<&str>,
) -> CliResult {
    let summarizer = ChatSummarizer::new(config)?;
    let options = PipelineOptions::from(
        extract_options(mode, pages, false)?.with_format(TableFormat::Text),
    );
    let data = fs::read(input)?;
    log::info!("Summarizing tables of {} ({} bytes)", input.display(), data.len());

    let mut session = UploadSession::new();
    let pb = spinner("Extracting and summarizing tables...")?;
    let report = process_upload(&mut session, &data, &options, Some(&summarizer));
    pb.finish_and_clear();
    let report = report?;
    log::debug!(
        "{} summaries, {} failed",
        report.summaries.len(),
        report.summaries.iter().filter(|s| !s.is_ok()).count()
    );

    print_report(input, &report);

    if report.extraction.is_err() {
        return Err("table extraction failed".into());
    }
    Ok(())
}

fn print_report(input: &Path, report: &Report) {
    println!("{}", "Document".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    match &report.overview {
        Ok(overview) => {
            println!("{}: PDF {}", "Format".bold(), overview.version);
            println!("{}: {}", "Pages".bold(), overview.page_count);
            println!(
                "{}: {:.1} KB",
                "File Size".bold(),
                overview.byte_len as f64 / 1024.0
            );
        }
        Err(e) => println!("{} {}", "Error previewing PDF:".red(), e),
    }
    println!();

    let extraction = match &report.extraction {
        Ok(extraction) => extraction,
        Err(e) => {
            println!("{} {}", "Error extracting tables:".red(), e);
            return;
        }
    };

    if extraction.is_empty() {
        println!("{}", "No tables found in the uploaded PDF.".yellow());
        return;
    }

    for (i, (table, rendered)) in extraction.iter().enumerate() {
        println!(
            "{} {}",
            format!("Table {}", i + 1).cyan().bold(),
            format!("(page {}, {} rows)", table.page, table.row_count()).dimmed()
        );
        println!("{}", rendered);
        println!();

        println!("{}", format!("Summary of Table {}", i + 1).bold());
        match report.summaries.iter().find(|s| s.index == i) {
            Some(summary) => match &summary.outcome {
                Ok(text) => println!("{}", text),
                Err(e) => println!("{} {}", "Error during summarization:".red(), e),
            },
            None => println!("{}", "(no summary)".dimmed()),
        }
        println!();
    }
}

fn cmd_version() {
    println!("{} {}", "pdftab".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF table extraction and summarization tool");
    println!();
    println!("License: MIT");
}
