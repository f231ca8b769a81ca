//! PDF document parser: header check, page selection, per-page interpretation.

use std::path::Path;

use crate::detect::{sniff_bytes, sniff_path};
use crate::error::{Error, Result};
use crate::model::{Document, PageLayout};

use super::backend::{LopdfBackend, PageId, PdfBackend};
use super::interpreter::ContentInterpreter;
use super::options::{ErrorMode, ParseOptions};

/// PDF document parser.
pub struct PdfParser<B: PdfBackend = LopdfBackend> {
    backend: B,
    version: String,
    options: ParseOptions,
}

impl PdfParser<LopdfBackend> {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let header = sniff_path(path)?;
        log::debug!("Opening {} ({})", path.display(), header);

        let backend = LopdfBackend::load_file(path)?;
        Ok(Self {
            backend,
            version: header.version,
            options,
        })
    }

    /// Parse a PDF held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF held in memory with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let header = sniff_bytes(data)?;
        let backend = LopdfBackend::load_bytes(data)?;
        Ok(Self {
            backend,
            version: header.version,
            options,
        })
    }
}

impl<B: PdfBackend> PdfParser<B> {
    /// Wrap an already loaded backend.
    pub fn with_backend(backend: B, version: impl Into<String>, options: ParseOptions) -> Self {
        Self {
            backend,
            version: version.into(),
            options,
        }
    }

    /// Get the number of pages in the file.
    pub fn page_count(&self) -> u32 {
        self.backend.pages().len() as u32
    }

    /// Declared PDF version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Parse the selected pages into positioned content.
    pub fn parse(&self) -> Result<Document> {
        let pages = self.backend.pages();
        let mut document = Document::new();
        document.total_pages = pages.len() as u32;
        document.version = self.version.clone();

        // A range may run past the end, but must start on an existing page
        let missing = match &self.options.pages {
            super::PageSelection::All => None,
            super::PageSelection::Range(range) => {
                Some(*range.start()).filter(|p| !pages.contains_key(p))
            }
            super::PageSelection::Pages(wanted) => {
                wanted.iter().copied().find(|p| !pages.contains_key(p))
            }
        };
        if let Some(missing) = missing {
            return Err(Error::PageOutOfRange(missing, document.total_pages));
        }

        for (&page_num, &page_id) in pages.iter() {
            if !self.options.pages.includes(page_num) {
                continue;
            }

            match self.parse_page(page_num, page_id) {
                Ok(page) => document.add_page(page),
                Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                    log::warn!("Skipping page {}: {}", page_num, e);
                }
                Err(e) => return Err(e),
            }
        }

        log::debug!(
            "Parsed {} of {} pages",
            document.page_count(),
            document.total_pages
        );
        Ok(document)
    }

    /// Interpret one page.
    pub fn parse_page(&self, page_num: u32, page_id: PageId) -> Result<PageLayout> {
        let (width, height) = self.backend.page_size(page_id);
        let mut page = PageLayout::new(page_num, width, height);

        let fonts = self.backend.page_fonts(page_id)?;
        let raw = self.backend.page_content(page_id)?;
        if raw.is_empty() {
            return Ok(page);
        }

        let ops = self
            .backend
            .decode_content(&raw)
            .map_err(|e| Error::ContentStream {
                page: page_num,
                message: e.to_string(),
            })?;

        let decode = |font: &[u8], bytes: &[u8]| self.backend.decode_text(page_id, font, bytes);
        let content = ContentInterpreter::new(&fonts, &decode).run(&ops);

        log::debug!(
            "Page {}: {} spans, {} rulings",
            page_num,
            content.spans.len(),
            content.rulings.len()
        );

        page.spans = content.spans;
        page.rulings = content.rulings;
        Ok(page)
    }
}
