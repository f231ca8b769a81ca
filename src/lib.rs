//! # pdftab
//!
//! Table extraction from PDF documents, with optional natural-language
//! summaries of each table.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdftab::{extract_tables, render};
//!
//! fn main() -> pdftab::Result<()> {
//!     let extraction = extract_tables("report.pdf")?;
//!
//!     for (i, table) in extraction.tables.iter().enumerate() {
//!         println!("Table {} (page {}):", i + 1, table.page);
//!         println!("{}", render::to_text(table));
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Two detectors**: ruled tables (lattice) and whitespace-aligned tables (stream)
//! - **Reading order**: tables come back by page, top to bottom, left to right
//! - **Multiple output formats**: plain text, Markdown, HTML, JSON
//! - **Summaries**: a [`Summarizer`] trait, with an HTTP chat-completions
//!   client behind the `http` feature
//! - **Upload handling**: [`UploadSession`] keeps one staged file and removes it

pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod session;
pub mod summarize;
pub mod table;

// Re-export commonly used types
pub use detect::{is_pdf, sniff_bytes, sniff_path, PdfHeader};
pub use error::{Error, Result};
pub use extract::{ExtractOptions, Extraction, TableExtractor};
pub use model::{BBox, DetectionMethod, Document, PageLayout, Ruling, Table, TextSpan};
pub use parser::{ErrorMode, PageSelection, ParseOptions, PdfParser};
pub use pipeline::{process, process_upload, Overview, PipelineOptions, Report};
pub use render::{JsonFormat, TableFormat};
pub use session::UploadSession;
pub use summarize::{summarize_tables, Summarizer, SummarizerConfig, TableSummary};
pub use table::{DetectionMode, LatticeConfig, StreamConfig, TableFinder};

#[cfg(feature = "http")]
pub use summarize::ChatSummarizer;

use std::path::Path;

/// Extract every table from a PDF file.
///
/// A document without tables gives an empty [`Extraction`], not an error.
///
/// # Example
///
/// ```no_run
/// use pdftab::extract_tables;
///
/// let extraction = extract_tables("report.pdf").unwrap();
/// println!("{} tables", extraction.len());
/// ```
pub fn extract_tables<P: AsRef<Path>>(path: P) -> Result<Extraction> {
    TableExtractor::new().extract(path)
}

/// Extract tables from a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdftab::{extract_tables_with_options, ExtractOptions, PageSelection, TableFormat};
///
/// let options = ExtractOptions::new()
///     .lenient()
///     .with_pages(PageSelection::parse("1-3").unwrap())
///     .with_format(TableFormat::Markdown);
/// let extraction = extract_tables_with_options("report.pdf", &options).unwrap();
/// ```
pub fn extract_tables_with_options<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<Extraction> {
    TableExtractor::with_options(options.clone()).extract(path)
}

/// Extract tables from a PDF held in memory.
pub fn extract_tables_from_bytes(data: &[u8], options: &ExtractOptions) -> Result<Extraction> {
    TableExtractor::with_options(options.clone()).extract_bytes(data)
}

/// Parse a PDF file into positioned text and rulings without finding tables.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    PdfParser::open(path)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bytes_empty_data() {
        let result = extract_tables_from_bytes(&[], &ExtractOptions::default());
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_extract_bytes_too_short() {
        let result = extract_tables_from_bytes(b"%PDF", &ExtractOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_bytes_unknown_magic() {
        let data = [0xFF, 0xFE, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let result = extract_tables_from_bytes(&data, &ExtractOptions::default());
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_extract_bytes_truncated_body() {
        let result = extract_tables_from_bytes(b"%PDF-1.7\n%garbage", &ExtractOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_missing_file() {
        let result = extract_tables("/nonexistent/file.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
