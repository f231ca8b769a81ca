//! Table finding.
//!
//! Two detectors are available: [`LatticeDetector`] for tables drawn with
//! ruling lines and [`StreamDetector`] for tables laid out with whitespace.
//! [`TableFinder`] runs them over a document and returns the tables in
//! reading order.

mod cells;
mod lattice;
mod stream;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{Document, PageLayout, Table};

pub use cells::{is_numeric, normalize_cell};
pub use lattice::{LatticeConfig, LatticeDetector};
pub use stream::{StreamConfig, StreamDetector};

/// Which detectors to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMode {
    /// Ruled tables first, then whitespace tables among the leftover text
    #[default]
    Auto,
    /// Whitespace alignment only
    Stream,
    /// Ruling lines only
    Lattice,
}

impl FromStr for DetectionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "stream" => Ok(Self::Stream),
            "lattice" => Ok(Self::Lattice),
            other => Err(Error::Config(format!("unknown detection mode: {other}"))),
        }
    }
}

/// Runs the detectors over pages and orders their output.
#[derive(Debug, Clone, Default)]
pub struct TableFinder {
    mode: DetectionMode,
    stream: StreamDetector,
    lattice: LatticeDetector,
}

impl TableFinder {
    pub fn new(mode: DetectionMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn with_stream_config(mut self, config: StreamConfig) -> Self {
        self.stream = StreamDetector::with_config(config);
        self
    }

    pub fn with_lattice_config(mut self, config: LatticeConfig) -> Self {
        self.lattice = LatticeDetector::with_config(config);
        self
    }

    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    /// Find all tables in a document, page by page, in reading order.
    pub fn find(&self, document: &Document) -> Vec<Table> {
        let mut tables: Vec<Table> = document
            .pages
            .iter()
            .flat_map(|page| self.find_in_page(page))
            .collect();
        // Stable, so each page keeps its reading order
        tables.sort_by_key(|t| t.page);
        log::debug!(
            "TableFinder: {} tables in {} pages",
            tables.len(),
            document.page_count()
        );
        tables
    }

    /// Find the tables on one page, top to bottom then left to right.
    pub fn find_in_page(&self, page: &PageLayout) -> Vec<Table> {
        let tables = match self.mode {
            DetectionMode::Stream => self.stream.detect(page.number, page.spans.clone()).0,
            DetectionMode::Lattice => {
                self.lattice
                    .detect(page.number, page.spans.clone(), &page.rulings)
                    .0
            }
            DetectionMode::Auto => {
                let (mut tables, remaining) =
                    self.lattice
                        .detect(page.number, page.spans.clone(), &page.rulings);
                tables.extend(self.stream.detect(page.number, remaining).0);
                tables
            }
        };

        reading_order(tables)
    }
}

/// Order the tables of one page top to bottom, then left to right.
///
/// Tables whose vertical extents overlap form a band and are read left to
/// right, even when their top edges differ.
fn reading_order(mut tables: Vec<Table>) -> Vec<Table> {
    tables.sort_by(|a, b| b.region.top.total_cmp(&a.region.top));

    let mut ordered = Vec::with_capacity(tables.len());
    let mut band: Vec<Table> = Vec::new();
    let mut band_bottom = f32::MAX;
    for table in tables {
        if !band.is_empty() && table.region.top <= band_bottom {
            flush_band(&mut band, &mut ordered);
        }
        band_bottom = if band.is_empty() {
            table.region.bottom
        } else {
            band_bottom.min(table.region.bottom)
        };
        band.push(table);
    }
    flush_band(&mut band, &mut ordered);

    ordered
}

fn flush_band(band: &mut Vec<Table>, ordered: &mut Vec<Table>) {
    band.sort_by(|a, b| a.region.left.total_cmp(&b.region.left));
    ordered.append(band);
}
