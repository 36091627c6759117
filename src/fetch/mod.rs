// src/fetch/mod.rs

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub mod subviews;

#[cfg(test)]
pub(crate) mod stub;

pub use subviews::{discover, SubView};

const USER_AGENT: &str = "Mozilla/5.0";
/// Used when the response declares no charset.
const LEGACY_CHARSET: &str = "windows-1252";

/// Query protocol of the upstream site: `ano`, `opcao`, optional `subopcao`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageQuery {
    pub code: String,
    pub year: i32,
    pub subview: Option<String>,
}

impl PageQuery {
    pub fn new(code: &str, year: i32) -> Self {
        Self {
            code: code.to_string(),
            year,
            subview: None,
        }
    }

    pub fn with_subview(&self, value: &str) -> Self {
        Self {
            subview: Some(value.to_string()),
            ..self.clone()
        }
    }

    pub fn to_url(&self, base: &Url) -> Result<Url> {
        let year = self.year.to_string();
        let mut params = vec![("ano", year.as_str()), ("opcao", self.code.as_str())];
        if let Some(sub) = &self.subview {
            params.push(("subopcao", sub.as_str()));
        }
        Url::parse_with_params(base.as_str(), &params)
            .with_context(|| format!("building URL from {}", base))
    }
}

/// Status and decoded body of one upstream response.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Source of upstream pages. A non-success status is a normal
/// `FetchedPage`; `Err` is reserved for transport failures.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, query: &PageQuery) -> Result<FetchedPage>;
}

/// Plain-HTTP fetcher against the live site.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: Url,
}

impl HttpFetcher {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, query: &PageQuery) -> Result<FetchedPage> {
        let url = query.to_url(&self.base_url)?;
        debug!("Fetching page {}", url);
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;
        let status = resp.status().as_u16();
        let body = resp
            .text_with_charset(LEGACY_CHARSET)
            .await
            .with_context(|| format!("Reading text from {}", url))?;
        Ok(FetchedPage { status, body })
    }
}
