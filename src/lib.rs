//! HTTP API over the VitiBrasil grape and wine statistics pages.
//!
//! Each report is fetched from the upstream site, its data table walked row
//! by row and the cells normalized into JSON records.

pub mod config;
pub mod error;
pub mod fetch;
pub mod process;
pub mod report;
pub mod server;

pub use config::{AppConfig, Credentials};
pub use error::ScrapeError;
pub use fetch::{HttpFetcher, PageFetcher, PageQuery};
pub use report::{fetch_report, OutputRecord, ReportKind};
