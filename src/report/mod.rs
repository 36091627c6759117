// src/report/mod.rs

use serde::Serialize;

use crate::process::{DataRule, MarkerRule, RowRules};

pub mod engine;
pub mod record;

pub use engine::{assemble, fetch_report, records_from_table};
pub use record::OutputRecord;

/// How a mapped cell is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Quantity,
    Currency,
}

/// Where an output field takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Column(usize, ValueKind),
    Category,
    SubView,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub source: Source,
}

const fn field(name: &'static str, source: Source) -> FieldSpec {
    FieldSpec { name, source }
}

/// Static description of one upstream report view.
#[derive(Debug, Clone, Copy)]
pub struct ReportConfig {
    pub kind: ReportKind,
    /// Upstream `opcao` value.
    pub code: &'static str,
    /// Whether the page exposes `btn_sopt` sub-views to iterate.
    pub discovery: bool,
    pub rules: RowRules,
    /// Output fields in JSON key order.
    pub fields: &'static [FieldSpec],
    /// Drop rows whose quantity/currency cells are all missing instead of
    /// emitting nulls.
    pub drop_unreported: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Production,
    Processing,
    Commercialization,
    Import,
    Export,
}

const ITEM_RULES: RowRules = RowRules {
    marker: Some(MarkerRule {
        column: 0,
        class: "tb_item",
    }),
    data: DataRule {
        min_cells: 2,
        column: 0,
        class: Some("tb_subitem"),
    },
};

const TRADE_RULES: RowRules = RowRules {
    marker: None,
    data: DataRule {
        min_cells: 3,
        column: 0,
        class: None,
    },
};

const TRADE_FIELDS: &[FieldSpec] = &[
    field("Ano", Source::Year),
    field("Classificacao", Source::SubView),
    field("País", Source::Column(0, ValueKind::Text)),
    field("Quantidade (Kg.)", Source::Column(1, ValueKind::Quantity)),
    field("Valor (US$)", Source::Column(2, ValueKind::Currency)),
];

pub static PRODUCTION: ReportConfig = ReportConfig {
    kind: ReportKind::Production,
    code: "opt_02",
    discovery: false,
    rules: ITEM_RULES,
    fields: &[
        field("Tipo", Source::Category),
        field("Produto", Source::Column(0, ValueKind::Text)),
        field("Quantidade (L.)", Source::Column(1, ValueKind::Quantity)),
        field("Ano", Source::Year),
    ],
    drop_unreported: true,
};

pub static PROCESSING: ReportConfig = ReportConfig {
    kind: ReportKind::Processing,
    code: "opt_03",
    discovery: true,
    rules: ITEM_RULES,
    fields: &[
        field("Ano", Source::Year),
        field("Classificacao", Source::SubView),
        field("Cultivar", Source::Column(0, ValueKind::Text)),
        field("Quantidade (L.)", Source::Column(1, ValueKind::Quantity)),
        field("Tipo", Source::Category),
    ],
    drop_unreported: false,
};

pub static COMMERCIALIZATION: ReportConfig = ReportConfig {
    kind: ReportKind::Commercialization,
    code: "opt_04",
    discovery: false,
    rules: ITEM_RULES,
    fields: &[
        field("Ano", Source::Year),
        field("Produto", Source::Column(0, ValueKind::Text)),
        field("Quantidade (L.)", Source::Column(1, ValueKind::Quantity)),
        field("Tipo", Source::Category),
    ],
    drop_unreported: true,
};

pub static IMPORT: ReportConfig = ReportConfig {
    kind: ReportKind::Import,
    code: "opt_05",
    discovery: true,
    rules: TRADE_RULES,
    fields: TRADE_FIELDS,
    drop_unreported: false,
};

pub static EXPORT: ReportConfig = ReportConfig {
    kind: ReportKind::Export,
    code: "opt_06",
    discovery: true,
    rules: TRADE_RULES,
    fields: TRADE_FIELDS,
    drop_unreported: false,
};

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::Production,
        ReportKind::Processing,
        ReportKind::Commercialization,
        ReportKind::Import,
        ReportKind::Export,
    ];

    pub fn config(&self) -> &'static ReportConfig {
        match self {
            ReportKind::Production => &PRODUCTION,
            ReportKind::Processing => &PROCESSING,
            ReportKind::Commercialization => &COMMERCIALIZATION,
            ReportKind::Import => &IMPORT,
            ReportKind::Export => &EXPORT,
        }
    }

    /// Path segment under `/vitibrasil/`.
    pub fn route(&self) -> &'static str {
        match self {
            ReportKind::Production => "producao",
            ReportKind::Processing => "processamento",
            ReportKind::Commercialization => "comercializacao",
            ReportKind::Import => "importacao",
            ReportKind::Export => "exportacao",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Production => "production",
            ReportKind::Processing => "processing",
            ReportKind::Commercialization => "commercialization",
            ReportKind::Import => "import",
            ReportKind::Export => "export",
        }
    }

    pub fn from_route(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.route() == segment)
    }

    /// Accepts either the English name or the route segment.
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s || k.route() == s)
    }
}

/// Public description of a report, served by the catalogue endpoint.
#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub kind: ReportKind,
    pub route: String,
    pub code: &'static str,
    pub subviews: bool,
    pub fields: Vec<&'static str>,
}

pub fn catalogue() -> Vec<ReportSummary> {
    ReportKind::ALL
        .iter()
        .map(|kind| {
            let cfg = kind.config();
            ReportSummary {
                kind: *kind,
                route: format!("/vitibrasil/{}", kind.route()),
                code: cfg.code,
                subviews: cfg.discovery,
                fields: cfg.fields.iter().map(|f| f.name).collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_distinct() {
        let codes: HashSet<_> = ReportKind::ALL.iter().map(|k| k.config().code).collect();
        assert_eq!(codes.len(), ReportKind::ALL.len());
        assert_eq!(EXPORT.code, "opt_06");
        assert_eq!(IMPORT.code, "opt_05");
    }

    #[test]
    fn test_kind_lookup() {
        assert_eq!(ReportKind::from_route("producao"), Some(ReportKind::Production));
        assert_eq!(ReportKind::from_route("production"), None);
        assert_eq!(ReportKind::from_name("Export"), Some(ReportKind::Export));
        assert_eq!(ReportKind::from_name("importacao"), Some(ReportKind::Import));
        assert_eq!(ReportKind::from_name("wine"), None);
        for kind in ReportKind::ALL {
            assert_eq!(kind.config().kind, kind);
        }
    }

    #[test]
    fn test_every_report_has_year_field() {
        for kind in ReportKind::ALL {
            assert!(kind
                .config()
                .fields
                .iter()
                .any(|f| f.source == Source::Year));
        }
    }

    #[test]
    fn test_catalogue() {
        let cat = catalogue();
        assert_eq!(cat.len(), 5);
        assert_eq!(cat[1].route, "/vitibrasil/processamento");
        assert!(cat[1].subviews);
        assert_eq!(
            cat[0].fields,
            vec!["Tipo", "Produto", "Quantidade (L.)", "Ano"]
        );
    }
}
