//! Markdown rendering of tables.

use crate::model::Table;

/// Convert a table to a GFM pipe table.
///
/// Markdown needs a header line, so the first row is always placed above
/// the separator even when it was not detected as a header.
pub fn to_markdown(table: &Table) -> String {
    let rows = table.padded_rows();
    let mut output = String::new();
    if rows.is_empty() || table.column_count() == 0 {
        return output;
    }

    for (i, row) in rows.iter().enumerate() {
        output.push('|');
        for cell in row {
            output.push_str(&format!(" {} |", escape_markdown(cell)));
        }
        output.push('\n');

        if i == 0 {
            output.push('|');
            for _ in row {
                output.push_str(" --- |");
            }
            output.push('\n');
        }
    }

    output
}

/// Escape the characters that would break a pipe table or turn into emphasis.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            '\n' => result.push(' '),
            _ => result.push(c),
        }
    }
    result
}
