use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use auction_scout::fetch::{FetchError, PageFetcher};

/// Serves canned HTML per URL and records every request it sees.
/// Unknown URLs come back as 404s, registered failures as 500s.
/// Clones share the call log, so tests can hand a clone to a scraper
/// and inspect the original afterwards.
#[derive(Clone, Default)]
pub struct StubFetcher {
    responses: HashMap<String, String>,
    failures: HashSet<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.responses.insert(url.to_string(), html.into());
        self
    }

    pub fn with_failure(mut self, url: &str) -> Self {
        self.failures.insert(url.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());

        if self.failures.contains(url) {
            return Err(FetchError::Status(500));
        }
        self.responses
            .get(url)
            .cloned()
            .ok_or(FetchError::Status(404))
    }
}
