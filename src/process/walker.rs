// src/process/walker.rs

use tracing::trace;

use super::RawRow;

/// A row is a category header when the cell at `column` carries `class`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerRule {
    pub column: usize,
    pub class: &'static str,
}

impl MarkerRule {
    pub fn matches(&self, row: &RawRow) -> bool {
        row.cells
            .get(self.column)
            .is_some_and(|cell| cell.has_class(self.class))
    }
}

/// A row is data when it has at least `min_cells` cells and, if `class`
/// is set, the cell at `column` carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataRule {
    pub min_cells: usize,
    pub column: usize,
    pub class: Option<&'static str>,
}

impl DataRule {
    pub fn matches(&self, row: &RawRow) -> bool {
        if row.cells.len() < self.min_cells {
            return false;
        }
        match self.class {
            Some(class) => row
                .cells
                .get(self.column)
                .is_some_and(|cell| cell.has_class(class)),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRules {
    pub marker: Option<MarkerRule>,
    pub data: DataRule,
}

/// A data row stamped with the category in effect when it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedRow {
    pub category: Option<String>,
    pub cells: Vec<String>,
}

/// Running state of one table traversal.
#[derive(Debug, Default)]
struct ExtractionState {
    current_category: Option<String>,
}

impl ExtractionState {
    fn observe(&mut self, row: &RawRow, rules: &RowRules) -> Option<WalkedRow> {
        if let Some(marker) = &rules.marker {
            if marker.matches(row) {
                let label = row
                    .cells
                    .get(marker.column)
                    .map(|c| c.text.clone())
                    .unwrap_or_default();
                trace!(category = %label, "category marker");
                self.current_category = Some(label);
                return None;
            }
        }
        if rules.data.matches(row) {
            return Some(WalkedRow {
                category: self.current_category.clone(),
                cells: row.texts(),
            });
        }
        None
    }
}

/// Classify `rows` in order. Marker rows update the category for every
/// following row and emit nothing; rows matching neither rule are dropped.
/// State starts empty on each call, so categories never leak between
/// tables.
pub fn walk(rows: &[RawRow], rules: &RowRules) -> Vec<WalkedRow> {
    let mut state = ExtractionState::default();
    rows.iter()
        .filter_map(|row| state.observe(row, rules))
        .collect()
}
