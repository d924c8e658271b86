//! Collector-car auction scraping toolkit.
//!
//! Walks the listing pages of Bring a Trailer, Cars & Bids and
//! Collecting Cars, refreshes individual auction pages through the
//! snapshot module, and derives normalized pricing, location, trim and
//! condition data through the middleware passes.

pub mod fetch;
pub mod middleware;
pub mod models;
pub mod parse;
pub mod scrapers;
pub mod snapshot;

pub use fetch::{FetchError, HttpFetcher, PageFetcher};
pub use middleware::{enrich, EnrichedAuction};
pub use models::{
    OrchestratorResult, Platform, ScrapeOptions, ScrapeResult, ScrapedAuction,
};
pub use scrapers::{Orchestrator, PlatformScraper};
pub use snapshot::{detect_platform, AuctionSnapshot, SnapshotScraper};
