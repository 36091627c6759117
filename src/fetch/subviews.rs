// src/fetch/subviews.rs

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::Serialize;
use std::collections::HashSet;
use tracing::trace;

use crate::process::table::cell_text;

static SUBVIEW_BUTTON: Lazy<Selector> =
    Lazy::new(|| Selector::parse("button.btn_sopt").expect("sub-view selector should parse"));

/// One classification slice of a report, e.g. `subopt_01` / `Viníferas`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubView {
    pub value: String,
    pub label: String,
}

/// Collect the `btn_sopt` selector buttons of a report page, in page order.
///
/// Buttons without a value or a visible label are dropped, and a value seen
/// twice keeps its first occurrence. An empty result means the page only
/// has its default table.
pub fn discover(html: &str) -> Vec<SubView> {
    let doc = Html::parse_document(html);
    let mut seen = HashSet::new();

    doc.select(&SUBVIEW_BUTTON)
        .filter_map(|btn| {
            let value = btn.value().attr("value")?.trim();
            let label = cell_text(&btn);
            if value.is_empty() || label.is_empty() {
                trace!(value, label = %label, "ignoring incomplete sub-view button");
                return None;
            }
            Some(SubView {
                value: value.to_string(),
                label,
            })
        })
        .filter(|sv| seen.insert(sv.value.clone()))
        .collect()
}
