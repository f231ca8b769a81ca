//! Cell text cleanup and header detection shared by both detectors.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::model::Table;

/// Normalize the text of one cell: NFKC, whitespace collapsed, trimmed.
pub fn normalize_cell(text: &str) -> String {
    let normalized: String = text.nfkc().collect();
    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether a cell holds a number (amount, count, percentage, ...).
///
/// Accepts `1,234.50`, `(12)`, `-3.5%`, `$ 40`, `€1.200,00`.
pub fn is_numeric(text: &str) -> bool {
    static NUMERIC: OnceLock<Regex> = OnceLock::new();
    let re = NUMERIC.get_or_init(|| {
        Regex::new(r"^[-+]?\(?[-+]?[$€£¥₩]?\s*[-+]?(\d{1,3}([,.\s]\d{3})+|\d+)([.,]\d+)?\)?\s*%?$")
            .unwrap()
    });
    re.is_match(text.trim())
}

/// Normalize every cell and decide whether the first row is a header.
///
/// `first_row_bold` is true when every span of the first row used a bold face.
pub fn finish_table(mut table: Table, first_row_bold: bool) -> Table {
    for row in &mut table.rows {
        for cell in row.iter_mut() {
            *cell = normalize_cell(cell);
        }
    }

    table.header_rows = if has_header(&table, first_row_bold) { 1 } else { 0 };
    table
}

fn has_header(table: &Table, first_row_bold: bool) -> bool {
    let Some((first, body)) = table.rows.split_first() else {
        return false;
    };
    if body.is_empty() || first.iter().all(|c| c.is_empty()) {
        return false;
    }
    if first.iter().any(|c| is_numeric(c)) {
        return false;
    }

    first_row_bold || body.iter().flatten().any(|c| is_numeric(c))
}
