// src/fetch/stub.rs

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use super::{FetchedPage, PageFetcher, PageQuery};

enum Canned {
    Page(FetchedPage),
    Fail(String),
}

/// Serves canned pages keyed by `(opcao, subopcao)`; unknown queries 404.
#[derive(Default)]
pub(crate) struct StaticFetcher {
    pages: HashMap<(String, Option<String>), Canned>,
    calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, code: &str, subview: Option<&str>, status: u16, body: &str) -> Self {
        self.pages.insert(
            (code.to_string(), subview.map(str::to_string)),
            Canned::Page(FetchedPage {
                status,
                body: body.to_string(),
            }),
        );
        self
    }

    pub fn ok(self, code: &str, subview: Option<&str>, body: &str) -> Self {
        self.page(code, subview, 200, body)
    }

    pub fn fail(mut self, code: &str, subview: Option<&str>, msg: &str) -> Self {
        self.pages.insert(
            (code.to_string(), subview.map(str::to_string)),
            Canned::Fail(msg.to_string()),
        );
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, query: &PageQuery) -> Result<FetchedPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.pages.get(&(query.code.clone(), query.subview.clone())) {
            Some(Canned::Page(page)) => Ok(page.clone()),
            Some(Canned::Fail(msg)) => Err(anyhow!("{}", msg)),
            None => Ok(FetchedPage {
                status: 404,
                body: String::new(),
            }),
        }
    }
}
