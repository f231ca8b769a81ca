//! Plain text rendering of tables.
//!
//! The layout is the one the summarizer sees: a label line, then one line
//! per row, every column right-aligned to its widest cell.

use crate::model::Table;

/// Convert a table to aligned plain text.
///
/// The header row labels the columns when there is one; otherwise columns
/// are labelled `0..n`.
pub fn to_text(table: &Table) -> String {
    let rows = table.padded_rows();
    let columns = table.column_count();
    if columns == 0 {
        return String::new();
    }

    let numbered: Vec<String> = (0..columns).map(|i| i.to_string()).collect();
    let (labels, body): (Vec<&str>, &[Vec<&str>]) = if table.header_rows > 0 {
        (rows[0].clone(), &rows[1..])
    } else {
        (numbered.iter().map(String::as_str).collect(), &rows[..])
    };

    let mut widths: Vec<usize> = labels.iter().map(|l| display_width(l)).collect();
    for row in body {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(display_width(cell));
        }
    }

    let mut output = String::new();
    push_line(&mut output, &labels, &widths);
    for row in body {
        push_line(&mut output, row, &widths);
    }
    output.truncate(output.trim_end().len());
    output
}

fn push_line(output: &mut String, cells: &[&str], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| {
            let pad = width.saturating_sub(display_width(cell));
            format!("{}{}", " ".repeat(pad), cell)
        })
        .collect();
    output.push_str(line.join(" ").trim_end());
    output.push('\n');
}

fn display_width(text: &str) -> usize {
    text.chars().count()
}
