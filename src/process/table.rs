// src/process/table.rs

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

use super::{RawCell, RawRow};

static DATA_TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.tb_base.tb_dados").expect("data table selector should parse"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("row selector should parse"));
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("cell selector should parse"));

/// Text nodes stripped and concatenated, so `<td> 1.234 <b>,5</b></td>`
/// reads as `1.234,5`.
pub fn cell_text(el: &ElementRef<'_>) -> String {
    el.text().map(str::trim).collect()
}

/// Locate the `tb_base tb_dados` table and return its rows after the
/// header row. `None` when the page has no such table.
pub fn parse_data_table(html: &str) -> Option<Vec<RawRow>> {
    let doc = Html::parse_document(html);
    let table = doc.select(&DATA_TABLE).next()?;

    let rows: Vec<RawRow> = table
        .select(&ROW)
        .skip(1)
        .map(|tr| {
            let cells = tr
                .select(&CELL)
                .map(|td| RawCell {
                    text: cell_text(&td),
                    classes: td.value().classes().map(str::to_string).collect(),
                })
                .collect();
            RawRow { cells }
        })
        .collect();

    trace!(rows = rows.len(), "parsed data table");
    if rows.is_empty() {
        debug!("data table has no body rows");
    }
    Some(rows)
}
