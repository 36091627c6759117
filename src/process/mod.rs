// src/process/mod.rs

pub mod normalize;
pub mod table;
pub mod walker;

pub use normalize::{normalize_quantity, repair_text_encoding};
pub use table::parse_data_table;
pub use walker::{walk, DataRule, MarkerRule, RowRules, WalkedRow};

/// One `<td>`: stripped text plus its class tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
    pub text: String,
    pub classes: Vec<String>,
}

impl RawCell {
    pub fn new(text: impl Into<String>, classes: &[&str]) -> Self {
        Self {
            text: text.into(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// One body row of the data table, header already excluded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRow {
    pub cells: Vec<RawCell>,
}

impl RawRow {
    pub fn new(cells: Vec<RawCell>) -> Self {
        Self { cells }
    }

    /// Row whose cells all carry `class`.
    pub fn classed(class: &str, texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| RawCell::new(*t, &[class])).collect())
    }

    pub fn texts(&self) -> Vec<String> {
        self.cells.iter().map(|c| c.text.clone()).collect()
    }
}
