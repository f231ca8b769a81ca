//! Table detection using text position analysis (Stream mode algorithm).
//!
//! Inspired by Camelot's Stream mode, this module detects tables by analyzing
//! text alignment patterns without relying on graphical lines.

use std::collections::{HashMap, HashSet};

use crate::model::{BBox, DetectionMethod, Table, TextSpan};

use super::cells::finish_table;

/// Bucket width used to group span edges into candidate column edges.
const EDGE_BUCKET: f32 = 5.0;

/// Distance within which a span counts as aligned with a column edge.
const ALIGN_TOLERANCE: f32 = 5.0;

/// Vertical gap, in font sizes, that ends a table region.
const ROW_GAP_FACTOR: f32 = 3.0;

/// Stream detector configuration.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum column alignment ratio (0.0-1.0)
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 12,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

/// A line of spans sharing a baseline.
#[derive(Debug, Clone)]
struct SpanRow<'a> {
    /// Average baseline of the row
    y: f32,
    /// Largest font size in the row
    font_size: f32,
    /// Indices into the page's spans, with the spans, sorted by X
    spans: Vec<(usize, &'a TextSpan)>,
}

/// Which side of its spans a column lines up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Edge {
    Left,
    Right,
}

impl Edge {
    fn of(self, span: &TextSpan) -> f32 {
        match self {
            Edge::Left => span.x,
            Edge::Right => span.right(),
        }
    }
}

/// Nearby edge positions of one kind that vote for the same column.
#[derive(Debug, Clone)]
struct EdgeGroup {
    kind: Edge,
    positions: Vec<f32>,
}

impl EdgeGroup {
    /// The span lines up with one of the group's positions.
    fn supports(&self, span: &TextSpan) -> bool {
        let edge = self.kind.of(span);
        self.positions
            .iter()
            .any(|p| (edge - p).abs() <= ALIGN_TOLERANCE)
    }

    /// The span runs across one of the group's positions.
    fn is_crossed_by(&self, span: &TextSpan) -> bool {
        self.positions
            .iter()
            .any(|&p| span.x < p - ALIGN_TOLERANCE && span.right() > p + ALIGN_TOLERANCE)
    }
}

/// Horizontal extent of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Column {
    left: f32,
    right: f32,
}

impl Column {
    fn of(span: &TextSpan) -> Self {
        Self {
            left: span.x,
            right: span.right(),
        }
    }

    fn contains(&self, span: &TextSpan) -> bool {
        span.x >= self.left - ALIGN_TOLERANCE && span.right() <= self.right + ALIGN_TOLERANCE
    }

    fn overlaps(&self, span: &TextSpan) -> bool {
        span.x < self.right - ALIGN_TOLERANCE && span.right() > self.left + ALIGN_TOLERANCE
    }

    fn distance(&self, x: f32) -> f32 {
        if x < self.left {
            self.left - x
        } else if x > self.right {
            x - self.right
        } else {
            0.0
        }
    }
}

/// Detects whitespace-aligned tables in a page's text spans.
#[derive(Debug, Clone, Default)]
pub struct StreamDetector {
    config: StreamConfig,
}

impl StreamDetector {
    /// Create a new detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new detector with custom configuration.
    pub fn with_config(config: StreamConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Detect tables among the spans of one page.
    ///
    /// Returns the tables and the spans that were NOT part of any table.
    pub fn detect(&self, page: u32, spans: Vec<TextSpan>) -> (Vec<Table>, Vec<TextSpan>) {
        let min_spans = self.config.min_rows * self.config.min_columns;
        if spans.len() < min_spans {
            log::debug!(
                "StreamDetector: page {}: not enough spans ({} < {})",
                page,
                spans.len(),
                min_spans
            );
            return (vec![], spans);
        }

        let rows = self.group_into_rows(&spans);
        if rows.len() < self.config.min_rows {
            log::debug!(
                "StreamDetector: page {}: not enough rows ({} < {})",
                page,
                rows.len(),
                self.config.min_rows
            );
            return (vec![], spans);
        }

        let columns = self.detect_columns(&rows);
        log::debug!(
            "StreamDetector: page {}: {} rows, columns {:?}",
            page,
            rows.len(),
            columns
        );
        if columns.len() < self.config.min_columns {
            return (vec![], spans);
        }

        let regions = self.find_table_regions(&rows, &columns);
        log::debug!("StreamDetector: page {}: {} candidate regions", page, regions.len());

        let mut tables = Vec::new();
        let mut used: HashSet<usize> = HashSet::new();

        for (start, end) in regions {
            let region_rows = &rows[start..=end];

            // Columns of the whole page can be polluted by text around the table
            let region_columns = self.detect_columns(region_rows);

            if region_columns.len() < self.config.min_columns {
                continue;
            }
            if region_columns.len() > self.config.max_columns {
                log::debug!(
                    "StreamDetector: skipping region, too many columns ({} > {})",
                    region_columns.len(),
                    self.config.max_columns
                );
                continue;
            }
            if is_list_pattern(region_rows, &region_columns) {
                log::debug!("StreamDetector: skipping region, detected as list pattern");
                continue;
            }

            used.extend(region_rows.iter().flat_map(|r| r.spans.iter().map(|(i, _)| *i)));
            tables.push(self.build_table(page, region_rows, &region_columns));
        }

        let remaining = spans
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !used.contains(i))
            .map(|(_, span)| span)
            .collect();

        (tables, remaining)
    }

    /// Group spans into rows by Y position.
    fn group_into_rows<'a>(&self, spans: &'a [TextSpan]) -> Vec<SpanRow<'a>> {
        let mut sorted: Vec<(usize, &TextSpan)> = spans.iter().enumerate().collect();
        // Top of the page first, then left to right
        sorted.sort_by(|(_, a), (_, b)| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

        let mut rows: Vec<SpanRow> = Vec::new();
        let mut current: Vec<(usize, &TextSpan)> = Vec::new();
        let mut current_y: Option<f32> = None;

        for (index, span) in sorted {
            let tolerance = span.font_size * self.config.y_tolerance_factor;
            match current_y {
                Some(y) if (span.y - y).abs() <= tolerance => current.push((index, span)),
                _ => {
                    if !current.is_empty() {
                        rows.push(make_row(std::mem::take(&mut current)));
                    }
                    current_y = Some(span.y);
                    current.push((index, span));
                }
            }
        }
        if !current.is_empty() {
            rows.push(make_row(current));
        }

        rows
    }

    /// Detect columns from the left and right edges of the spans.
    ///
    /// Rows with two or more spans are the likely table rows; when there are
    /// too few of them, every row votes instead. Text columns line up on
    /// their left edge and amount columns on their right edge, so both kinds
    /// of edge vote. Each accepted edge grows a column from the spans aligned
    /// on it; columns that overlap are the same column seen from both sides.
    fn detect_columns(&self, rows: &[SpanRow]) -> Vec<Column> {
        if rows.is_empty() {
            return vec![];
        }

        let multi: Vec<&SpanRow> = rows.iter().filter(|r| r.spans.len() >= 2).collect();
        let voters: Vec<&SpanRow> = if multi.len() >= self.config.min_rows {
            multi
        } else {
            rows.iter().collect()
        };

        // Count each edge bucket only once per row
        let mut counts: HashMap<(Edge, i32), usize> = HashMap::new();
        for row in &voters {
            let buckets: HashSet<(Edge, i32)> = row
                .spans
                .iter()
                .flat_map(|(_, s)| {
                    [Edge::Left, Edge::Right].map(|kind| (kind, bucket_of(kind.of(s))))
                })
                .collect();
            for bucket in buckets {
                *counts.entry(bucket).or_insert(0) += 1;
            }
        }

        let min_occurrences =
            ((voters.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let groups: Vec<EdgeGroup> = [Edge::Left, Edge::Right]
            .into_iter()
            .flat_map(|kind| {
                let mut edges: Vec<f32> = counts
                    .iter()
                    .filter(|((k, _), count)| *k == kind && **count >= min_occurrences)
                    .map(|((_, bucket), _)| *bucket as f32 * EDGE_BUCKET)
                    .collect();
                edges.sort_by(f32::total_cmp);
                self.group_edges(kind, edges)
            })
            .collect();

        let spans: Vec<&TextSpan> = voters
            .iter()
            .flat_map(|r| r.spans.iter().map(|(_, s)| *s))
            .collect();

        // A span running across another edge of the same kind belongs to a
        // heading or a sentence, not to the column.
        let mut columns: Vec<Column> = groups
            .iter()
            .enumerate()
            .filter_map(|(i, group)| {
                spans
                    .iter()
                    .filter(|s| group.supports(s))
                    .filter(|s| {
                        !groups.iter().enumerate().any(|(j, other)| {
                            j != i && other.kind == group.kind && other.is_crossed_by(s)
                        })
                    })
                    .map(|s| Column::of(s))
                    .reduce(|a, b| Column {
                        left: a.left.min(b.left),
                        right: a.right.max(b.right),
                    })
            })
            .collect();
        columns.sort_by(|a, b| a.left.total_cmp(&b.left));

        let mut merged: Vec<Column> = Vec::with_capacity(columns.len());
        for column in columns {
            match merged.last_mut() {
                Some(last) if column.left < last.right => last.right = last.right.max(column.right),
                _ => merged.push(column),
            }
        }

        merged
    }

    /// Edges of one kind closer than `min_column_gap` to the first edge of a
    /// group join that group.
    fn group_edges(&self, kind: Edge, edges: Vec<f32>) -> Vec<EdgeGroup> {
        let mut groups: Vec<EdgeGroup> = Vec::new();
        for edge in edges {
            match groups.last_mut() {
                Some(group) if edge - group.positions[0] < self.config.min_column_gap => {
                    group.positions.push(edge)
                }
                _ => groups.push(EdgeGroup {
                    kind,
                    positions: vec![edge],
                }),
            }
        }
        groups
    }

    /// Find contiguous row runs that form tables.
    ///
    /// A run ends at a row that does not align with the columns, or at a
    /// vertical gap much larger than the text.
    fn find_table_regions(&self, rows: &[SpanRow], columns: &[Column]) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            if i > 0 && is_row_gap(&rows[i - 1], row) {
                self.close_region(start.take(), i - 1, &mut regions);
            }
            if alignment_score(row, columns) >= self.config.min_alignment_ratio {
                start.get_or_insert(i);
            } else if i > 0 {
                self.close_region(start.take(), i - 1, &mut regions);
            }
        }
        if let Some(last) = rows.len().checked_sub(1) {
            self.close_region(start, last, &mut regions);
        }

        regions
    }

    fn close_region(&self, start: Option<usize>, end: usize, regions: &mut Vec<(usize, usize)>) {
        if let Some(s) = start {
            if end + 1 - s >= self.config.min_rows {
                regions.push((s, end));
            }
        }
    }

    /// Turn a region into a table grid.
    fn build_table(&self, page: u32, rows: &[SpanRow], columns: &[Column]) -> Table {
        let region = rows
            .iter()
            .flat_map(|r| r.spans.iter().map(|(_, s)| s.bbox()))
            .reduce(|a, b| a.union(&b))
            .unwrap_or_else(|| BBox::from_corners(0.0, 0.0, 0.0, 0.0));

        let mut table = Table::new(page, region, DetectionMethod::Stream);
        for row in rows {
            let mut cells: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
            for (_, span) in &row.spans {
                let col = find_column(span, columns);
                cells[col].push(span.text.as_str());
            }
            table.add_row(cells.into_iter().map(|parts| parts.join(" ")));
        }

        let first_row_bold = rows
            .first()
            .is_some_and(|r| r.spans.iter().all(|(_, s)| s.is_bold));
        finish_table(table, first_row_bold)
    }
}

fn make_row(mut spans: Vec<(usize, &TextSpan)>) -> SpanRow<'_> {
    spans.sort_by(|(_, a), (_, b)| a.x.total_cmp(&b.x));
    let y = spans.iter().map(|(_, s)| s.y).sum::<f32>() / spans.len() as f32;
    let font_size = spans.iter().map(|(_, s)| s.font_size).fold(0.0, f32::max);
    SpanRow { y, font_size, spans }
}

fn bucket_of(x: f32) -> i32 {
    (x / EDGE_BUCKET).round() as i32
}

fn is_row_gap(above: &SpanRow, below: &SpanRow) -> bool {
    above.y - below.y > ROW_GAP_FACTOR * above.font_size.max(below.font_size)
}

/// Share of a row's spans that sit inside a column.
///
/// A span running across two columns (a heading or a paragraph line) breaks
/// the row's alignment entirely.
fn alignment_score(row: &SpanRow, columns: &[Column]) -> f32 {
    if row.spans.is_empty() || columns.is_empty() {
        return 0.0;
    }

    let straddles = row
        .spans
        .iter()
        .any(|(_, s)| columns.iter().filter(|c| c.overlaps(s)).count() > 1);
    if straddles {
        return 0.0;
    }

    let aligned = row
        .spans
        .iter()
        .filter(|(_, s)| columns.iter().any(|c| c.contains(s)))
        .count();

    aligned as f32 / row.spans.len() as f32
}

/// Column holding the span, else the one nearest its centre.
fn find_column(span: &TextSpan, columns: &[Column]) -> usize {
    if let Some(i) = columns.iter().position(|c| c.contains(span)) {
        return i;
    }

    let centre = span.center_x();
    columns
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.distance(centre).total_cmp(&b.distance(centre)))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Check if rows actually represent a numbered or bulleted list.
///
/// A list like "1. Item" is often split into a marker span and a text span at
/// different X positions, which looks like a two-column table.
fn is_list_pattern(rows: &[SpanRow], columns: &[Column]) -> bool {
    if columns.len() < 2 || rows.is_empty() {
        return false;
    }

    let mut bullets = 0;
    let mut numbers = 0;
    for row in rows {
        if let Some((_, first)) = row.spans.first() {
            let text = first.text.trim();
            if is_bullet_marker(text) {
                bullets += 1;
            } else if is_number_marker(text) {
                numbers += 1;
            }
        }
    }

    let bullet_ratio = bullets as f32 / rows.len() as f32;
    let total_ratio = (bullets + numbers) as f32 / rows.len() as f32;

    // Numbered first columns are common in real tables; only reject narrow ones
    bullet_ratio >= 0.5 || (columns.len() == 2 && total_ratio >= 0.5)
}

/// Check if text is a bullet marker (•, -, etc.).
fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "▹" | "►" | "■" | "●" | "□" | "◆" | "◇" | "▶" | "▷" | "➤" | "➜"
    )
}

/// Check if text is a number-style list marker (1., 2), a., etc.).
///
/// A bare number is a value (a year, a count), not a marker.
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }

    if let Some(pos) = cleaned.find(|c: char| !c.is_ascii_digit()) {
        let (digits, suffix) = cleaned.split_at(pos);
        if !digits.is_empty() && (suffix == "." || suffix == ")") {
            return true;
        }
    }

    // Letter marker: "a.", "B)"
    let mut chars = cleaned.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(letter), Some('.' | ')'), None) if letter.is_alphabetic()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan::new(text, x, y, text.len() as f32 * 6.0, 12.0, "Helvetica")
    }

    fn bold(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan::new(text, x, y, text.len() as f32 * 6.0, 12.0, "Helvetica-Bold")
    }

    /// Span whose right edge sits at `right`.
    fn right_aligned(text: &str, right: f32, y: f32) -> TextSpan {
        span(text, right - text.len() as f32 * 6.0, y)
    }

    fn lefts(columns: &[Column]) -> Vec<f32> {
        columns.iter().map(|c| c.left).collect()
    }

    fn income_statement(rows: &[(&str, &str)]) -> Vec<TextSpan> {
        let mut spans = Vec::new();
        for (i, (label, amount)) in rows.iter().enumerate() {
            let y = 400.0 - i as f32 * 15.0;
            spans.push(span(label, 60.0, y));
            spans.push(right_aligned(amount, 300.0, y));
        }
        spans
    }

    #[test]
    fn test_group_into_rows() {
        let detector = StreamDetector::new();
        let spans = vec![
            span("B1", 60.0, 100.0),
            span("A2", 10.0, 85.0),
            span("A1", 10.0, 101.0),
            span("B2", 60.0, 85.0),
        ];

        let rows = detector.group_into_rows(&spans);
        assert_eq!(rows.len(), 2);
        let first: Vec<&str> = rows[0].spans.iter().map(|(_, s)| s.text.as_str()).collect();
        assert_eq!(first, vec!["A1", "B1"]);
        assert!((rows[0].y - 100.5).abs() < 0.01);
        assert_eq!(rows[0].font_size, 12.0);
    }

    #[test]
    fn test_detect_columns() {
        let detector = StreamDetector::new();
        let spans = vec![
            span("A1", 10.0, 100.0),
            span("B1", 60.0, 100.0),
            span("A2", 10.0, 85.0),
            span("B2", 61.0, 85.0),
            span("A3", 11.0, 70.0),
            span("B3", 60.0, 70.0),
        ];

        let rows = detector.group_into_rows(&spans);
        assert_eq!(lefts(&detector.detect_columns(&rows)), vec![10.0, 60.0]);
    }

    #[test]
    fn test_close_edges_are_merged() {
        let detector = StreamDetector::new();
        let spans = vec![
            span("A1", 10.0, 100.0),
            span("x", 20.0, 100.0),
            span("B1", 80.0, 100.0),
            span("A2", 10.0, 85.0),
            span("y", 20.0, 85.0),
            span("B2", 80.0, 85.0),
        ];

        let rows = detector.group_into_rows(&spans);
        assert_eq!(lefts(&detector.detect_columns(&rows)), vec![10.0, 80.0]);
    }

    #[test]
    fn test_detect_simple_table() {
        let detector = StreamDetector::new();
        let spans = vec![
            bold("Name", 10.0, 100.0),
            bold("Age", 60.0, 100.0),
            span("Alice", 10.0, 85.0),
            span("30", 60.0, 85.0),
            span("Bob", 10.0, 70.0),
            span("25", 60.0, 70.0),
        ];

        let (tables, remaining) = detector.detect(3, spans);
        assert_eq!(tables.len(), 1);
        assert!(remaining.is_empty());

        let table = &tables[0];
        assert_eq!(table.page, 3);
        assert_eq!(table.method, DetectionMethod::Stream);
        assert_eq!(table.rows[0], vec!["Name", "Age"]);
        assert_eq!(table.rows[2], vec!["Bob", "25"]);
        assert_eq!(table.header_rows, 1);
        assert_eq!(table.region.left, 10.0);
        assert!(table.region.top > 100.0);
        assert!(table.region.bottom < 70.0);
    }

    #[test]
    fn test_surrounding_text_is_left_over() {
        let detector = StreamDetector::new();
        let spans = vec![
            span("Quarterly results for the whole group", 10.0, 200.0),
            span("Region", 10.0, 150.0),
            span("Sales", 120.0, 150.0),
            span("North", 10.0, 135.0),
            span("1,200", 120.0, 135.0),
            span("South", 10.0, 120.0),
            span("950", 120.0, 120.0),
        ];

        let (tables, remaining) = detector.detect(1, spans);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].row_count(), 3);
        assert_eq!(remaining.len(), 1);
        assert!(remaining[0].text.starts_with("Quarterly"));
    }

    #[test]
    fn test_spans_in_same_cell_are_joined() {
        let detector = StreamDetector::new();
        let spans = vec![
            span("Item", 10.0, 100.0),
            span("Price", 120.0, 100.0),
            span("Green", 10.0, 85.0),
            span("tea", 45.0, 85.0),
            span("4.00", 120.0, 85.0),
            span("Coffee", 10.0, 70.0),
            span("3.50", 120.0, 70.0),
        ];

        let (tables, _) = detector.detect(1, spans);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows[1], vec!["Green tea", "4.00"]);
    }

    #[test]
    fn test_no_table_single_column() {
        let detector = StreamDetector::new();
        let spans = vec![
            span("Line 1", 10.0, 100.0),
            span("Line 2", 10.0, 85.0),
            span("Line 3", 10.0, 70.0),
            span("Line 4", 10.0, 55.0),
        ];

        let (tables, remaining) = detector.detect(1, spans);
        assert!(tables.is_empty());
        assert_eq!(remaining.len(), 4);
    }

    #[test]
    fn test_numbered_list_not_detected_as_table() {
        let detector = StreamDetector::new();
        let spans = vec![
            span("1.", 50.0, 400.0),
            span("Device settings", 80.0, 400.0),
            span("2.", 50.0, 370.0),
            span("Object management", 80.0, 370.0),
            span("3.", 50.0, 340.0),
            span("Policy and routing", 80.0, 340.0),
            span("4.", 50.0, 310.0),
            span("VPN", 80.0, 310.0),
        ];

        let (tables, remaining) = detector.detect(1, spans);
        assert!(tables.is_empty(), "Numbered list should not be detected as a table");
        assert_eq!(remaining.len(), 8);
    }

    #[test]
    fn test_bullet_list_not_detected_as_table() {
        let detector = StreamDetector::new();
        let spans = vec![
            span("-", 50.0, 400.0),
            span("Management", 80.0, 400.0),
            span("-", 50.0, 370.0),
            span("Interface/Service Option", 80.0, 370.0),
            span("-", 50.0, 340.0),
            span("Firmware", 80.0, 340.0),
        ];

        let (tables, remaining) = detector.detect(1, spans);
        assert!(tables.is_empty(), "Bullet list should not be detected as a table");
        assert_eq!(remaining.len(), 6);
    }

    #[test]
    fn test_too_many_columns_rejected() {
        let detector = StreamDetector::with_config(StreamConfig {
            max_columns: 3,
            ..Default::default()
        });
        let mut spans = Vec::new();
        for (r, y) in [100.0, 85.0, 70.0].into_iter().enumerate() {
            for c in 0..5 {
                spans.push(span(&format!("r{r}c{c}"), 10.0 + c as f32 * 50.0, y));
            }
        }

        let (tables, remaining) = detector.detect(1, spans);
        assert!(tables.is_empty());
        assert_eq!(remaining.len(), 15);
    }

    #[test]
    fn test_find_column() {
        let columns = [
            Column { left: 10.0, right: 40.0 },
            Column { left: 60.0, right: 90.0 },
            Column { left: 110.0, right: 150.0 },
        ];
        assert_eq!(find_column(&span("ab", 10.0, 0.0), &columns), 0);
        // Wider than its column but centred on it
        assert_eq!(find_column(&span("abcdefgh", 50.0, 0.0), &columns), 1);
        assert_eq!(find_column(&span("ab", 140.0, 0.0), &columns), 2);
        assert_eq!(find_column(&span("ab", -30.0, 0.0), &columns), 0);
    }

    #[test]
    fn test_right_aligned_amounts_of_mixed_width() {
        let detector = StreamDetector::new();
        let spans = income_statement(&[
            ("Line item", "Amount"),
            ("Revenue", "480,500"),
            ("Total operating income", "1,250,000"),
            ("Cost of sales", "120,000"),
            ("Tax", "95,000"),
            ("Net income", "674,500"),
        ]);

        let (tables, remaining) = detector.detect(1, spans);
        assert_eq!(tables.len(), 1);
        assert!(remaining.is_empty());

        let table = &tables[0];
        assert_eq!(table.row_count(), 6);
        assert_eq!(table.rows[2], vec!["Total operating income", "1,250,000"]);
        assert_eq!(table.rows[4], vec!["Tax", "95,000"]);
        assert_eq!(table.header_rows, 1);
    }

    #[test]
    fn test_widest_amount_in_first_row() {
        let detector = StreamDetector::new();
        let spans = income_statement(&[
            ("Total assets", "12,480,000"),
            ("Cash", "310"),
            ("Receivables", "45,200"),
            ("Inventory", "9,800"),
        ]);

        let (tables, remaining) = detector.detect(1, spans);
        assert_eq!(tables.len(), 1);
        assert!(remaining.is_empty());
        assert_eq!(tables[0].rows[0], vec!["Total assets", "12,480,000"]);
        assert_eq!(tables[0].rows[1], vec!["Cash", "310"]);
    }

    #[test]
    fn test_right_aligned_columns() {
        let detector = StreamDetector::new();
        let spans = income_statement(&[("a", "10"), ("bb", "2,000"), ("ccc", "300")]);
        let rows = detector.group_into_rows(&spans);

        let columns = detector.detect_columns(&rows);
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[1].right, 300.0);
        assert_eq!(columns[1].left, 300.0 - 5.0 * 6.0);
    }

    #[test]
    fn test_year_column_is_not_a_list() {
        let detector = StreamDetector::new();
        let spans = vec![
            span("Year", 60.0, 400.0),
            span("Revenue", 160.0, 400.0),
            span("2021", 60.0, 385.0),
            span("1,200", 160.0, 385.0),
            span("2022", 60.0, 370.0),
            span("1,450", 160.0, 370.0),
            span("2023", 60.0, 355.0),
            span("1,610", 160.0, 355.0),
        ];

        let (tables, remaining) = detector.detect(1, spans);
        assert_eq!(tables.len(), 1);
        assert!(remaining.is_empty());
        assert_eq!(tables[0].rows[3], vec!["2023", "1,610"]);
        assert_eq!(tables[0].header_rows, 1);
    }

    #[test]
    fn test_large_vertical_gap_splits_tables() {
        let detector = StreamDetector::new();
        let mut spans = Vec::new();
        for top in [700.0, 400.0] {
            for (i, (name, value)) in [("Name", "Score"), ("Ana", "12"), ("Ben", "9")]
                .into_iter()
                .enumerate()
            {
                let y = top - i as f32 * 15.0;
                spans.push(span(name, 60.0, y));
                spans.push(span(value, 200.0, y));
            }
        }

        let (tables, remaining) = detector.detect(1, spans);
        assert_eq!(tables.len(), 2);
        assert!(remaining.is_empty());
        assert!(tables.iter().all(|t| t.row_count() == 3));
    }

    #[test]
    fn test_sentence_does_not_widen_column() {
        let detector = StreamDetector::new();
        let spans = vec![
            span("A long sentence starting on the first column", 10.0, 130.0),
            span("end", 400.0, 130.0),
            span("Key", 10.0, 100.0),
            span("Value", 200.0, 100.0),
            span("k1", 10.0, 85.0),
            span("v1", 200.0, 85.0),
            span("k2", 10.0, 70.0),
            span("v2", 200.0, 70.0),
        ];
        let rows = detector.group_into_rows(&spans);

        let columns = detector.detect_columns(&rows);
        assert_eq!(lefts(&columns), vec![10.0, 200.0]);
        assert!(columns[0].right < 200.0);
    }

    #[test]
    fn test_list_markers() {
        for marker in ["1.", "12.", "1)", "1 .", "a.", "B)"] {
            assert!(is_number_marker(marker), "{marker}");
        }
        for marker in ["-", "•", "*", "–"] {
            assert!(is_bullet_marker(marker), "{marker}");
        }
        for text in ["Name", "Hello World", "Alice", "", "3", "2021"] {
            assert!(!is_number_marker(text) && !is_bullet_marker(text), "{text}");
        }
    }
}
