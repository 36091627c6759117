// src/bin/fetch_report.rs
//
// One-shot extraction: `fetch_report <report> <year>` prints the records as JSON.

use anyhow::{anyhow, Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use vitiscraper::{fetch_report, AppConfig, HttpFetcher, ReportKind};

#[tokio::main]
async fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(env).with_writer(std::io::stderr).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [report, year] = args.as_slice() else {
        return Err(anyhow!(
            "usage: fetch_report <production|processing|commercialization|import|export> <year>"
        ));
    };
    let kind = ReportKind::from_name(report).with_context(|| format!("unknown report '{}'", report))?;
    let year: i32 = year
        .trim()
        .parse()
        .with_context(|| format!("year '{}' is not an integer", year))?;

    let config = AppConfig::from_env()?;
    let fetcher = HttpFetcher::new(config.base_url, config.fetch_timeout)?;

    info!(report = kind.as_str(), year, "fetching");
    let records = fetch_report(&fetcher, kind.config(), year)
        .await
        .map_err(|e| anyhow!("{} {}: {}", kind.as_str(), year, e))?;

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
