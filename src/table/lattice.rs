//! Table detection from painted ruling lines (Lattice mode algorithm).
//!
//! Rulings that cross each other are clustered into connected grids; the
//! distinct line positions of a grid give its row and column boundaries.

use crate::model::{BBox, DetectionMethod, Ruling, Table, TextSpan};

use super::cells::finish_table;

/// Lattice detector configuration.
#[derive(Debug, Clone)]
pub struct LatticeConfig {
    /// Distance within which two rulings are considered to touch (points)
    pub line_tolerance: f32,
    /// Line positions closer than this are the same grid line (points)
    pub position_tolerance: f32,
    /// Minimum number of grid rows
    pub min_rows: usize,
    /// Minimum number of grid columns
    pub min_columns: usize,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            line_tolerance: 2.0,
            position_tolerance: 3.0,
            min_rows: 2,
            min_columns: 2,
        }
    }
}

/// Detects ruled tables on a page.
#[derive(Debug, Clone, Default)]
pub struct LatticeDetector {
    config: LatticeConfig,
}

/// Row and column boundaries of one ruled grid.
#[derive(Debug, Clone, PartialEq)]
struct Grid {
    /// Column boundaries, left to right
    xs: Vec<f32>,
    /// Row boundaries, top to bottom
    ys: Vec<f32>,
}

impl Grid {
    fn bbox(&self) -> BBox {
        BBox::from_corners(
            self.xs[0],
            self.ys[self.ys.len() - 1],
            self.xs[self.xs.len() - 1],
            self.ys[0],
        )
    }

    fn rows(&self) -> usize {
        self.ys.len() - 1
    }

    fn columns(&self) -> usize {
        self.xs.len() - 1
    }

    /// Cell holding the point, if it lies inside the grid.
    fn cell_at(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        if !self.bbox().contains(x, y) {
            return None;
        }
        let col = self.xs.partition_point(|&edge| edge <= x).saturating_sub(1);
        let row = self.ys.partition_point(|&edge| edge >= y).saturating_sub(1);
        Some((row.min(self.rows() - 1), col.min(self.columns() - 1)))
    }
}

impl LatticeDetector {
    /// Create a new detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new detector with custom configuration.
    pub fn with_config(config: LatticeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LatticeConfig {
        &self.config
    }

    /// Detect ruled tables on one page.
    ///
    /// Returns the tables and the spans that were NOT placed in any table.
    pub fn detect(
        &self,
        page: u32,
        spans: Vec<TextSpan>,
        rulings: &[Ruling],
    ) -> (Vec<Table>, Vec<TextSpan>) {
        let grids = self.find_grids(rulings);
        log::debug!(
            "LatticeDetector: page {}: {} rulings, {} grids",
            page,
            rulings.len(),
            grids.len()
        );
        if grids.is_empty() {
            return (vec![], spans);
        }

        let mut used = vec![false; spans.len()];
        let mut tables = Vec::new();

        for grid in &grids {
            let mut cells: Vec<Vec<Vec<&TextSpan>>> =
                vec![vec![Vec::new(); grid.columns()]; grid.rows()];
            let mut placed = Vec::new();

            for (i, span) in spans.iter().enumerate() {
                if used[i] {
                    continue;
                }
                if let Some((row, col)) = grid.cell_at(span.center_x(), span.center_y()) {
                    cells[row][col].push(span);
                    placed.push(i);
                }
            }

            if placed.is_empty() {
                log::debug!("LatticeDetector: skipping grid without text at {:?}", grid.bbox());
                continue;
            }
            for i in placed {
                used[i] = true;
            }

            let first_row_bold = {
                let first: Vec<&&TextSpan> = cells[0].iter().flatten().collect();
                !first.is_empty() && first.iter().all(|s| s.is_bold)
            };

            let mut table = Table::new(page, grid.bbox(), DetectionMethod::Lattice);
            for row in cells {
                table.add_row(row.into_iter().map(cell_text));
            }
            tables.push(finish_table(table, first_row_bold));
        }

        let remaining = spans
            .into_iter()
            .zip(used)
            .filter(|(_, used)| !used)
            .map(|(span, _)| span)
            .collect();

        (tables, remaining)
    }

    /// Cluster rulings into connected components and keep the ones that form
    /// a grid large enough to be a table.
    fn find_grids(&self, rulings: &[Ruling]) -> Vec<Grid> {
        let mut sets = DisjointSet::new(rulings.len());
        for (i, a) in rulings.iter().enumerate() {
            for (j, b) in rulings.iter().enumerate().skip(i + 1) {
                if a.intersects(b, self.config.line_tolerance) {
                    sets.union(i, j);
                }
            }
        }

        let mut components: Vec<Vec<&Ruling>> = Vec::new();
        let mut slot_of_root: Vec<Option<usize>> = vec![None; rulings.len()];
        for (i, ruling) in rulings.iter().enumerate() {
            let root = sets.find(i);
            let slot = *slot_of_root[root].get_or_insert_with(|| {
                components.push(Vec::new());
                components.len() - 1
            });
            components[slot].push(ruling);
        }

        components
            .into_iter()
            .filter_map(|component| {
                let xs = cluster(
                    component.iter().filter(|r| r.is_vertical()).map(|r| r.x0),
                    self.config.position_tolerance,
                );
                let mut ys = cluster(
                    component.iter().filter(|r| r.is_horizontal()).map(|r| r.y0),
                    self.config.position_tolerance,
                );
                ys.reverse();

                let big_enough = xs.len() > self.config.min_columns && ys.len() > self.config.min_rows;
                big_enough.then_some(Grid { xs, ys })
            })
            .collect()
    }
}

/// Text of one cell: top line first, left to right within a line.
fn cell_text(mut spans: Vec<&TextSpan>) -> String {
    spans.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));
    spans
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Sort positions and merge the ones within `tolerance` into their mean.
fn cluster(values: impl Iterator<Item = f32>, tolerance: f32) -> Vec<f32> {
    let mut values: Vec<f32> = values.collect();
    values.sort_by(f32::total_cmp);

    let mut groups: Vec<Vec<f32>> = Vec::new();
    for v in values {
        match groups.last_mut() {
            Some(group) if v - group[0] <= tolerance => group.push(v),
            _ => groups.push(vec![v]),
        }
    }

    groups
        .iter()
        .map(|g| g.iter().sum::<f32>() / g.len() as f32)
        .collect()
}

/// Union-find over ruling indices.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}
