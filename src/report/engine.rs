// src/report/engine.rs

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::record::{number, text, OutputRecord};
use super::{ReportConfig, Source, ValueKind};
use crate::error::ScrapeError;
use crate::fetch::{discover, PageFetcher, PageQuery, SubView};
use crate::process::{normalize_quantity, parse_data_table, repair_text_encoding, walk, RawRow, WalkedRow};

/// First-cell text of aggregate rows, compared trimmed and lowercased.
pub const TOTAL_MARKER: &str = "total";

fn is_total_row(row: &WalkedRow) -> bool {
    row.cells
        .first()
        .is_some_and(|c| c.trim().to_lowercase() == TOTAL_MARKER)
}

fn build_record(
    report: &ReportConfig,
    year: i32,
    subview: Option<&SubView>,
    row: WalkedRow,
) -> Option<OutputRecord> {
    let mut record = OutputRecord::new();
    let mut numeric_fields = 0;
    let mut reported = 0;

    for spec in report.fields {
        let value = match spec.source {
            Source::Year => Value::from(year),
            Source::SubView => text(subview.map(|s| repair_text_encoding(&s.label))),
            Source::Category => text(row.category.as_deref().map(repair_text_encoding)),
            Source::Column(idx, ValueKind::Text) => {
                text(row.cells.get(idx).map(|c| repair_text_encoding(c)))
            }
            Source::Column(idx, ValueKind::Quantity | ValueKind::Currency) => {
                numeric_fields += 1;
                let v = row.cells.get(idx).and_then(|c| normalize_quantity(c));
                if v.is_some() {
                    reported += 1;
                }
                number(v)
            }
        };
        record.push(spec.name, value);
    }

    if report.drop_unreported && numeric_fields > 0 && reported == 0 {
        return None;
    }
    Some(record)
}

/// Walk one parsed table and map its data rows to output records.
pub fn records_from_table(
    report: &ReportConfig,
    year: i32,
    subview: Option<&SubView>,
    rows: &[RawRow],
) -> Vec<OutputRecord> {
    walk(rows, &report.rules)
        .into_iter()
        .filter(|row| !is_total_row(row))
        .filter_map(|row| build_record(report, year, subview, row))
        .collect()
}

/// Concatenate per-page record batches, keeping their order.
pub fn assemble(batches: Vec<Vec<OutputRecord>>) -> Vec<OutputRecord> {
    batches.into_iter().flatten().collect()
}

/// Fetch and extract every record of `report` for `year`.
///
/// The base page must load; when it exposes sub-views each one is fetched
/// in turn and a sub-view that fails is skipped. Without sub-views the base
/// page's own table is used and must exist.
#[instrument(level = "info", skip(fetcher, report), fields(report = report.kind.as_str(), code = report.code))]
pub async fn fetch_report<F>(
    fetcher: &F,
    report: &ReportConfig,
    year: i32,
) -> Result<Vec<OutputRecord>, ScrapeError>
where
    F: PageFetcher + ?Sized,
{
    let base = PageQuery::new(report.code, year);
    let page = fetcher.fetch(&base).await.map_err(|e| {
        warn!(error = %e, "base page fetch failed");
        ScrapeError::UpstreamUnavailable {
            status: None,
            detail: e.to_string(),
        }
    })?;
    if !page.is_success() {
        warn!(status = page.status, "base page returned non-success");
        return Err(ScrapeError::upstream_status(page.status));
    }

    let subviews = if report.discovery {
        discover(&page.body)
    } else {
        Vec::new()
    };

    if subviews.is_empty() {
        debug!("no sub-views; reading the default table");
        let rows = parse_data_table(&page.body).ok_or(ScrapeError::TableNotFound)?;
        let records = records_from_table(report, year, None, &rows);
        info!(records = records.len(), "report extracted");
        return Ok(records);
    }

    debug!(count = subviews.len(), "discovered sub-views");
    let mut batches = Vec::with_capacity(subviews.len());
    for sub in &subviews {
        let query = base.with_subview(&sub.value);
        let sub_page = match fetcher.fetch(&query).await {
            Ok(p) if p.is_success() => p,
            Ok(p) => {
                warn!(subview = %sub.label, status = p.status, "skipping sub-view");
                continue;
            }
            Err(e) => {
                warn!(subview = %sub.label, error = %e, "skipping sub-view");
                continue;
            }
        };
        let Some(rows) = parse_data_table(&sub_page.body) else {
            warn!(subview = %sub.label, "sub-view page has no data table");
            continue;
        };
        let records = records_from_table(report, year, Some(sub), &rows);
        debug!(subview = %sub.label, records = records.len(), "sub-view extracted");
        batches.push(records);
    }

    let records = assemble(batches);
    info!(records = records.len(), "report extracted");
    Ok(records)
}
