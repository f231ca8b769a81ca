//! End-to-end processing of one uploaded document.
//!
//! Three steps run in order, each with its own failure domain:
//!
//! 1. **Overview**: version, page count and size. A failure is reported and
//!    extraction still runs.
//! 2. **Extraction**: tables and their renderings. A failure is reported and
//!    no summaries are requested.
//! 3. **Summaries**: one call per table; a failure only affects its table.

use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::extract::{ExtractOptions, Extraction, TableExtractor};
use crate::parser::PdfParser;
use crate::session::UploadSession;
use crate::summarize::{summarize_tables, Summarizer, TableSummary};

/// Lightweight description of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    /// Version from the file header, e.g. "1.7"
    pub version: String,
    pub page_count: u32,
    /// File size in bytes
    pub byte_len: u64,
}

/// Options for [`process`].
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub extract: ExtractOptions,
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract = options;
        self
    }
}

impl From<ExtractOptions> for PipelineOptions {
    fn from(extract: ExtractOptions) -> Self {
        Self { extract }
    }
}

/// Outcome of every step of the pipeline.
#[derive(Debug)]
pub struct Report {
    pub overview: Result<Overview>,
    pub extraction: Result<Extraction>,
    /// Empty when extraction failed or no summarizer was given
    pub summaries: Vec<TableSummary>,
}

impl Report {
    /// Number of tables extracted (0 when extraction failed).
    pub fn table_count(&self) -> usize {
        self.extraction.as_ref().map(Extraction::len).unwrap_or(0)
    }

    /// Whether every step that ran succeeded.
    pub fn is_complete(&self) -> bool {
        self.overview.is_ok() && self.extraction.is_ok() && self.summaries.iter().all(TableSummary::is_ok)
    }
}

/// Describe a PDF file without extracting anything.
pub fn overview<P: AsRef<Path>>(path: P) -> Result<Overview> {
    let path = path.as_ref();
    let byte_len = std::fs::metadata(path)?.len();
    let parser = PdfParser::open(path)?;

    Ok(Overview {
        version: parser.version().to_string(),
        page_count: parser.page_count(),
        byte_len,
    })
}

/// Run overview, extraction and (optionally) summarization on a file.
pub fn process<P: AsRef<Path>>(
    path: P,
    options: &PipelineOptions,
    summarizer: Option<&dyn Summarizer>,
) -> Report {
    let path = path.as_ref();

    let overview = overview(path);
    if let Err(e) = &overview {
        log::warn!("Overview of {} failed: {}", path.display(), e);
    }

    let extraction = TableExtractor::with_options(options.extract.clone()).extract(path);
    let summaries = match (&extraction, summarizer) {
        (Ok(extraction), Some(summarizer)) => summarize_tables(summarizer, &extraction.tables),
        (Err(e), _) => {
            log::warn!("Extraction of {} failed: {}", path.display(), e);
            Vec::new()
        }
        (Ok(_), None) => Vec::new(),
    };

    Report {
        overview,
        extraction,
        summaries,
    }
}

/// Stage an upload, process it, and remove the staged file.
///
/// Only a failure to write the upload is returned as an error; everything
/// after that is reported in the [`Report`].
pub fn process_upload(
    session: &mut UploadSession,
    data: &[u8],
    options: &PipelineOptions,
    summarizer: Option<&dyn Summarizer>,
) -> Result<Report> {
    let path = session.stage(data)?.to_path_buf();
    let report = process(&path, options, summarizer);
    session.release();
    Ok(report)
}
