//! Rendering module for converting tables to various output formats.

mod html;
mod json;
mod markdown;
mod text;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Table;

pub use html::to_html;
pub use json::{to_json, JsonFormat};
pub use markdown::to_markdown;
pub use text::to_text;

/// Output format for a rendered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    /// Aligned plain text (what the summarizer receives)
    Text,
    /// GFM pipe table
    Markdown,
    /// HTML `<table>` element
    #[default]
    Html,
    /// Pretty-printed JSON object
    Json,
}

impl FromStr for TableFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            other => Err(Error::Config(format!("unknown table format: {other}"))),
        }
    }
}

/// Render one table in the given format.
pub fn render_table(table: &Table, format: TableFormat) -> Result<String> {
    match format {
        TableFormat::Text => Ok(to_text(table)),
        TableFormat::Markdown => Ok(to_markdown(table)),
        TableFormat::Html => Ok(to_html(table)),
        TableFormat::Json => to_json(table, JsonFormat::Pretty),
    }
}

/// Render every table, preserving order.
pub fn render_tables(tables: &[Table], format: TableFormat) -> Result<Vec<String>> {
    tables.iter().map(|t| render_table(t, format)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, DetectionMethod};

    #[test]
    fn test_table_format_from_str() {
        assert_eq!("md".parse::<TableFormat>().unwrap(), TableFormat::Markdown);
        assert_eq!("HTML".parse::<TableFormat>().unwrap(), TableFormat::Html);
        assert!("csv".parse::<TableFormat>().is_err());
        assert_eq!(TableFormat::default(), TableFormat::Html);
    }

    #[test]
    fn test_render_tables_keeps_order() {
        let tables: Vec<Table> = ["first", "second"]
            .iter()
            .map(|name| {
                let mut t = Table::new(
                    1,
                    BBox::from_corners(0.0, 0.0, 1.0, 1.0),
                    DetectionMethod::Stream,
                );
                t.add_row([*name, "x"]);
                t
            })
            .collect();

        let rendered = render_tables(&tables, TableFormat::Markdown).unwrap();
        assert_eq!(rendered.len(), 2);
        assert!(rendered[0].contains("first"));
        assert!(rendered[1].contains("second"));
    }
}
