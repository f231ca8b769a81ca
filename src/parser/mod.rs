//! PDF parsing module.

pub mod backend;
mod interpreter;
mod options;
mod pdf_parser;

pub use backend::{LopdfBackend, PdfBackend};
pub use interpreter::{ContentInterpreter, Matrix, PageContent};
pub use options::{ErrorMode, PageSelection, ParseOptions};
pub use pdf_parser::PdfParser;
