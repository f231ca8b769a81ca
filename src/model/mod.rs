//! Document and table model types.
//!
//! The parser fills a [`Document`] with positioned spans and rulings; the
//! table finders turn regions of it into [`Table`] grids.

mod document;
mod geometry;
mod table;

pub use document::{Document, PageLayout, TextSpan};
pub use geometry::{BBox, Orientation, Ruling};
pub use table::{DetectionMethod, Table};
