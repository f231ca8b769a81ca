//! HTML rendering of tables.

use crate::model::Table;

/// Convert a table to an HTML `<table>` element.
pub fn to_html(table: &Table) -> String {
    let mut output = String::from("<table>\n");
    let width = table.column_count();

    if !table.header().is_empty() {
        output.push_str("<thead>\n");
        for row in table.header() {
            render_row(&mut output, row, width, "th");
        }
        output.push_str("</thead>\n");
    }

    output.push_str("<tbody>\n");
    for row in table.body() {
        render_row(&mut output, row, width, "td");
    }
    output.push_str("</tbody>\n");
    output.push_str("</table>\n");

    output
}

fn render_row(output: &mut String, row: &[String], width: usize, tag: &str) {
    output.push_str("<tr>");
    for i in 0..width {
        let cell = row.get(i).map(String::as_str).unwrap_or("");
        output.push_str(&format!("<{tag}>{}</{tag}>", escape_html(cell)));
    }
    output.push_str("</tr>\n");
}

fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}
