//! Canned catalog for tests. Unknown queries return an empty result set.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use super::{BookCatalog, SearchResponse, WorkRecord};

#[derive(Default)]
pub struct StubCatalog {
    titles: HashMap<String, String>,
    terms: HashMap<String, String>,
    records: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    failing: bool,
    calls: AtomicUsize,
}

impl StubCatalog {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    pub fn with_title_results(mut self, title: &str, json: &str) -> Self {
        self.titles.insert(title.to_string(), json.to_string());
        self
    }

    pub fn with_term_results(mut self, term: &str, json: &str) -> Self {
        self.terms.insert(term.to_string(), json.to_string());
        self
    }

    pub fn with_record(mut self, key: &str, json: &str) -> Self {
        self.records.insert(key.to_string(), json.to_string());
        self
    }

    /// Delay the title lookup for `title` by `delay`.
    pub fn with_delay(mut self, title: &str, delay: Duration) -> Self {
        self.delays.insert(title.to_string(), delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn begin_call(&self) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            anyhow::bail!("connection refused");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl BookCatalog for StubCatalog {
    async fn search_by_title(&self, title: &str, _limit: u32) -> anyhow::Result<SearchResponse> {
        self.begin_call()?;
        if let Some(delay) = self.delays.get(title) {
            tokio::time::sleep(*delay).await;
        }
        let json = self.titles.get(title).map(String::as_str).unwrap_or("{}");
        Ok(serde_json::from_str(json)?)
    }

    async fn search(&self, term: &str, _limit: u32) -> anyhow::Result<SearchResponse> {
        self.begin_call()?;
        let json = self.terms.get(term).map(String::as_str).unwrap_or("{}");
        Ok(serde_json::from_str(json)?)
    }

    async fn get_record(&self, key: &str) -> anyhow::Result<WorkRecord> {
        self.begin_call()?;
        match self.records.get(key) {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => anyhow::bail!("404 Not Found for {}", key),
        }
    }
}
