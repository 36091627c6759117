use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};
use vitiscraper::{
    server::{self, AppState},
    AppConfig, HttpFetcher, ReportKind,
};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) config ───────────────────────────────────────────────────
    let config = AppConfig::from_env().context("loading configuration")?;

    // ─── 2) init logging ─────────────────────────────────────────────
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(config.log_level.parse().unwrap_or(LevelFilter::INFO.into())),
        )
        .init();

    info!("Starting vitiscraper");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 3) upstream client + shared state ───────────────────────────
    let fetcher = HttpFetcher::new(config.base_url.clone(), config.fetch_timeout)?;
    info!(
        base = %fetcher.base_url(),
        timeout = ?config.fetch_timeout,
        users = config.credentials.len(),
        "upstream configured"
    );
    let state = AppState::new(Arc::new(fetcher), config.credentials.clone());

    // ─── 4) serve ────────────────────────────────────────────────────
    info!("Server starting on port {}", config.port);
    info!("Health check: http://localhost:{}/health", config.port);
    for kind in ReportKind::ALL {
        info!(
            "Report endpoint: GET http://localhost:{}/vitibrasil/{}?year=<year>",
            config.port,
            kind.route()
        );
    }

    warp::serve(server::api(state))
        .run(([0, 0, 0, 0], config.port))
        .await;

    Ok(())
}
