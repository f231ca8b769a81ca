//! Table extraction: parse, find, render.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Document, Table};
use crate::parser::{ErrorMode, PageSelection, ParseOptions, PdfParser};
use crate::render::{render_tables, TableFormat};
use crate::table::{DetectionMode, LatticeConfig, StreamConfig, TableFinder};

/// Options controlling a table extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Error handling mode for pages that fail to parse
    pub error_mode: ErrorMode,

    /// Pages to search
    pub pages: PageSelection,

    /// Detectors to run
    pub mode: DetectionMode,

    /// Format of [`Extraction::rendered`]
    pub format: TableFormat,

    /// Whitespace detector tuning
    pub stream: StreamConfig,

    /// Ruling detector tuning
    pub lattice: LatticeConfig,
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip pages that fail to parse instead of failing the extraction.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    pub fn with_mode(mut self, mode: DetectionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_format(mut self, format: TableFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_stream_config(mut self, config: StreamConfig) -> Self {
        self.stream = config;
        self
    }

    pub fn with_lattice_config(mut self, config: LatticeConfig) -> Self {
        self.lattice = config;
        self
    }

    fn parse_options(&self) -> ParseOptions {
        ParseOptions::new()
            .with_error_mode(self.error_mode)
            .with_pages(self.pages.clone())
    }

    fn finder(&self) -> TableFinder {
        TableFinder::new(self.mode)
            .with_stream_config(self.stream.clone())
            .with_lattice_config(self.lattice.clone())
    }
}

/// Tables found in a document, with each table rendered for review.
///
/// `rendered[i]` is `tables[i]` in the requested [`TableFormat`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub tables: Vec<Table>,
    pub rendered: Vec<String>,
}

impl Extraction {
    /// Number of tables found.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Iterate over tables paired with their rendering.
    pub fn iter(&self) -> impl Iterator<Item = (&Table, &str)> {
        self.tables
            .iter()
            .zip(self.rendered.iter().map(String::as_str))
    }
}

/// Builder for extracting tables from PDF documents.
///
/// # Example
///
/// ```no_run
/// use pdftab::{DetectionMode, TableExtractor, TableFormat};
///
/// let extraction = TableExtractor::new()
///     .with_mode(DetectionMode::Lattice)
///     .with_format(TableFormat::Markdown)
///     .lenient()
///     .extract("report.pdf")?;
/// for (table, markdown) in extraction.iter() {
///     println!("page {}:\n{}", table.page, markdown);
/// }
/// # Ok::<(), pdftab::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableExtractor {
    options: ExtractOptions,
}

impl TableExtractor {
    /// Create a new extractor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor from existing options.
    pub fn with_options(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Enable lenient parsing mode.
    pub fn lenient(mut self) -> Self {
        self.options = self.options.lenient();
        self
    }

    /// Set detection mode.
    pub fn with_mode(mut self, mode: DetectionMode) -> Self {
        self.options = self.options.with_mode(mode);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Set the format of rendered tables.
    pub fn with_format(mut self, format: TableFormat) -> Self {
        self.options = self.options.with_format(format);
        self
    }

    pub fn with_stream_config(mut self, config: StreamConfig) -> Self {
        self.options = self.options.with_stream_config(config);
        self
    }

    pub fn with_lattice_config(mut self, config: LatticeConfig) -> Self {
        self.options = self.options.with_lattice_config(config);
        self
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract the tables of a PDF file.
    pub fn extract<P: AsRef<Path>>(&self, path: P) -> Result<Extraction> {
        let parser = PdfParser::open_with_options(path, self.options.parse_options())?;
        self.extract_document(&parser.parse()?)
    }

    /// Extract the tables of a PDF held in memory.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<Extraction> {
        let parser = PdfParser::from_bytes_with_options(data, self.options.parse_options())?;
        self.extract_document(&parser.parse()?)
    }

    /// Find and render the tables of an already parsed document.
    pub fn extract_document(&self, document: &Document) -> Result<Extraction> {
        let tables = self.options.finder().find(document);
        let rendered = render_tables(&tables, self.options.format)?;

        if tables.is_empty() {
            log::info!("No tables found in {} pages", document.page_count());
        }
        Ok(Extraction { tables, rendered })
    }
}
