//! Single-listing refresh without a browser.
//!
//! Listing pages are fetched as plain HTML and read for the handful of
//! fields that change while an auction runs. Results are cached in
//! process so dashboards polling the same lot do not hammer the
//! platforms. Covers one platform more than the listing scrapers:
//! RM Sotheby's pages are snapshot-only.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::fetch::{FetchError, HttpFetcher, PageFetcher};
use crate::parse;
use crate::scrapers::markup;

/// How long a cached snapshot stays fresh
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(15 * 60);

/// Platform a snapshot URL belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotSource {
    Bringatrailer,
    Rmsothebys,
    Carsandbids,
    Collectingcars,
    Unknown,
}

impl SnapshotSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotSource::Bringatrailer => "bringatrailer",
            SnapshotSource::Rmsothebys => "rmsothebys",
            SnapshotSource::Carsandbids => "carsandbids",
            SnapshotSource::Collectingcars => "collectingcars",
            SnapshotSource::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome shown on a listing page at snapshot time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnapshotStatus {
    Sold,
    NoSale,
    Active,
    Ended,
}

/// Point-in-time state of a single auction page.
///
/// Every field except `source` and `scraped_at` is optional; a page the
/// extractors cannot read yields an empty snapshot, never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionSnapshot {
    pub current_bid: Option<f64>,
    pub bid_count: Option<u32>,
    pub status: Option<SnapshotStatus>,
    pub title: Option<String>,
    pub end_time: Option<DateTime<Utc>>,
    pub raw_price_text: Option<String>,
    pub scraped_at: DateTime<Utc>,
    pub source: SnapshotSource,
}

impl AuctionSnapshot {
    pub fn empty(source: SnapshotSource) -> Self {
        Self {
            current_bid: None,
            bid_count: None,
            status: None,
            title: None,
            end_time: None,
            raw_price_text: None,
            scraped_at: Utc::now(),
            source,
        }
    }
}

/// Identify the platform behind an auction URL from its host
pub fn detect_platform(url: &str) -> SnapshotSource {
    let host = Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_owned))
        .unwrap_or_default();

    if host.contains("bringatrailer") {
        SnapshotSource::Bringatrailer
    } else if host.contains("rmsothebys") {
        SnapshotSource::Rmsothebys
    } else if host.contains("carsandbids") {
        SnapshotSource::Carsandbids
    } else if host.contains("collectingcars") {
        SnapshotSource::Collectingcars
    } else {
        SnapshotSource::Unknown
    }
}

fn parse_snapshot(html: &str, source: SnapshotSource) -> AuctionSnapshot {
    let document = Html::parse_document(html);
    let mut snapshot = AuctionSnapshot::empty(source);
    snapshot.title = markup::doc_text(&document, "h1");

    match source {
        SnapshotSource::Bringatrailer => {
            // the status line carries both the outcome and the amount,
            // e.g. "Sold for USD $67,500" or "Bid to $85,000"
            if let Some(text) = markup::doc_text(&document, ".listing-sold") {
                snapshot.status = Some(SnapshotStatus::Sold);
                snapshot.current_bid = parse::parse_price(&text);
                snapshot.raw_price_text = Some(text);
            } else if let Some(text) = markup::doc_text(&document, ".listing-available") {
                snapshot.status = Some(SnapshotStatus::Active);
                snapshot.current_bid = parse::parse_price(&text);
                snapshot.raw_price_text = Some(text);
            } else if markup::doc_text(&document, ".listing-ended").is_some() {
                snapshot.status = Some(SnapshotStatus::Ended);
            }
            if snapshot.current_bid.is_none() {
                if let Some(text) = markup::doc_text(&document, ".current-bid") {
                    snapshot.current_bid = parse::parse_price(&text);
                    snapshot.raw_price_text = Some(text);
                }
            }
            snapshot.bid_count = markup::doc_text(&document, ".bid-count")
                .and_then(|text| parse::parse_bid_count(&text));
            snapshot.end_time = markup::doc_attr(&document, "[data-end-time]", "data-end-time")
                .and_then(|stamp| parse::parse_end_time(&stamp));
        }
        SnapshotSource::Rmsothebys => {
            if let Some(text) = markup::doc_text(&document, ".lot-sold") {
                snapshot.status = Some(SnapshotStatus::Sold);
                snapshot.current_bid = parse::parse_price(&text);
                snapshot.raw_price_text = Some(text);
            } else if markup::doc_text(&document, ".lot-not-sold").is_some() {
                snapshot.status = Some(SnapshotStatus::NoSale);
            }
            if snapshot.current_bid.is_none() {
                if let Some(text) = markup::doc_text(&document, ".lot-price") {
                    snapshot.current_bid = parse::parse_price(&text);
                    snapshot.raw_price_text = Some(text);
                }
            }
            // RM pages never show a bid count
        }
        SnapshotSource::Carsandbids => {
            if let Some(text) = markup::doc_text(&document, ".sold-for") {
                snapshot.status = Some(SnapshotStatus::Sold);
                snapshot.current_bid = parse::parse_price(&text);
                snapshot.raw_price_text = Some(text);
            } else if markup::doc_text(&document, ".auction-live").is_some() {
                snapshot.status = Some(SnapshotStatus::Active);
            }
            if snapshot.current_bid.is_none() {
                if let Some(text) = markup::doc_text(&document, ".current-bid") {
                    snapshot.current_bid = parse::parse_price(&text);
                    snapshot.raw_price_text = Some(text);
                }
            }
            snapshot.bid_count = markup::doc_text(&document, ".bid-count")
                .and_then(|text| parse::parse_bid_count(&text));
        }
        SnapshotSource::Collectingcars => {
            if markup::doc_text(&document, ".lot-sold").is_some() {
                snapshot.status = Some(SnapshotStatus::Sold);
            } else if markup::doc_text(&document, ".lot-live").is_some() {
                snapshot.status = Some(SnapshotStatus::Active);
            }
            if let Some(text) = markup::doc_text(&document, ".current-bid") {
                snapshot.current_bid = parse::parse_price(&text);
                snapshot.raw_price_text = Some(text);
            }
            snapshot.bid_count = markup::doc_text(&document, ".bid-count")
                .and_then(|text| parse::parse_bid_count(&text));
        }
        SnapshotSource::Unknown => {
            if let Some(text) = markup::doc_text(&document, ".price") {
                snapshot.current_bid = parse::parse_price(&text);
                snapshot.raw_price_text = Some(text);
            }
        }
    }

    snapshot
}

struct CacheEntry {
    snapshot: AuctionSnapshot,
    inserted: Instant,
}

/// Cache occupancy, for admin endpoints and logs
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub expired: usize,
}

/// Fetches single auction pages and caches the parsed snapshots
pub struct SnapshotScraper<F = HttpFetcher> {
    fetcher: F,
    cache: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl SnapshotScraper<HttpFetcher> {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self::with_fetcher(HttpFetcher::new()?))
    }
}

impl<F: PageFetcher> SnapshotScraper<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self {
            fetcher,
            cache: Mutex::new(HashMap::new()),
            ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Override the cache lifetime
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Snapshot one auction page.
    ///
    /// Serves from cache unless `force_refresh` is set or the entry has
    /// expired. Never errors: a failed fetch yields an empty snapshot,
    /// and failures are not cached so the next call retries.
    pub async fn fetch_auction_data(&self, url: &str, force_refresh: bool) -> AuctionSnapshot {
        let source = detect_platform(url);

        if !force_refresh {
            if let Some(hit) = self.cache_lookup(url) {
                debug!("Snapshot cache hit for {}", url);
                return hit;
            }
        }

        let html = match self.fetcher.fetch(url).await {
            Ok(html) => html,
            Err(err) => {
                warn!("Snapshot fetch failed for {}: {}", url, err);
                return AuctionSnapshot::empty(source);
            }
        };

        let snapshot = parse_snapshot(&html, source);
        self.cache_store(url, snapshot.clone());
        snapshot
    }

    fn cache_lookup(&self, url: &str) -> Option<AuctionSnapshot> {
        let cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        cache
            .get(url)
            .filter(|entry| entry.inserted.elapsed() < self.ttl)
            .map(|entry| entry.snapshot.clone())
    }

    fn cache_store(&self, url: &str, snapshot: AuctionSnapshot) {
        let mut cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.insert(
            url.to_string(),
            CacheEntry {
                snapshot,
                inserted: Instant::now(),
            },
        );
    }

    pub fn cache_stats(&self) -> CacheStats {
        let cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let expired = cache
            .values()
            .filter(|entry| entry.inserted.elapsed() >= self.ttl)
            .count();
        CacheStats {
            entries: cache.len(),
            expired,
        }
    }

    /// Drop expired entries; returns how many were removed
    pub fn clean_cache(&self) -> usize {
        let mut cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = cache.len();
        cache.retain(|_, entry| entry.inserted.elapsed() < self.ttl);
        before - cache.len()
    }

    pub fn clear_cache(&self) {
        let mut cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.clear();
    }
}
