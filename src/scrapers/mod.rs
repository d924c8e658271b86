//! Platform scrapers and the orchestrator that runs them together.

pub mod bring_a_trailer;
pub mod cars_and_bids;
pub mod collecting_cars;
pub(crate) mod markup;
pub mod traits;

pub use bring_a_trailer::BringATrailerScraper;
pub use cars_and_bids::CarsAndBidsScraper;
pub use collecting_cars::CollectingCarsScraper;
pub use traits::PlatformScraper;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use futures::future::join_all;
use thiserror::Error;
use tracing::{info, warn};

use crate::fetch::FetchError;
use crate::models::{OrchestratorResult, Platform, ScrapeOptions, ScrapeSummary, ScrapedAuction};

/// Pause between successive fetches against the same platform
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Unknown platform: {0}")]
    Unknown(String),
    #[error(transparent)]
    Scrape(#[from] anyhow::Error),
}

/// Runs every registered platform scraper and merges their results
pub struct Orchestrator {
    scrapers: Vec<Box<dyn PlatformScraper>>,
}

impl Orchestrator {
    /// Orchestrator over all supported platforms
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self::with_scrapers(vec![
            Box::new(BringATrailerScraper::new()?),
            Box::new(CarsAndBidsScraper::new()?),
            Box::new(CollectingCarsScraper::new()?),
        ]))
    }

    /// Orchestrator over a custom scraper set
    pub fn with_scrapers(scrapers: Vec<Box<dyn PlatformScraper>>) -> Self {
        Self { scrapers }
    }

    /// Scrape every platform concurrently.
    ///
    /// A platform that rejects outright contributes a single error line
    /// and a zero count; it never sinks the other platforms.
    pub async fn scrape_all(&self, options: &ScrapeOptions) -> OrchestratorResult {
        let started = Instant::now();
        info!("Scraping {} platforms concurrently", self.scrapers.len());

        let runs = self.scrapers.iter().map(|scraper| {
            let platform = scraper.platform();
            async move { (platform, scraper.scrape(options).await) }
        });

        let mut auctions = Vec::new();
        let mut errors = Vec::new();
        let mut by_platform = HashMap::new();

        for (platform, outcome) in join_all(runs).await {
            match outcome {
                Ok(result) => {
                    by_platform.insert(platform, result.auctions.len());
                    auctions.extend(result.auctions);
                    errors.extend(result.errors);
                }
                Err(err) => {
                    warn!("{} scrape failed: {}", platform, err);
                    by_platform.insert(platform, 0);
                    errors.push(format!("{}: {}", platform, err));
                }
            }
        }

        let summary = ScrapeSummary {
            total: auctions.len(),
            by_platform,
            duration_ms: started.elapsed().as_millis() as u64,
        };
        info!(
            "Scraped {} auctions across {} platforms in {}ms",
            summary.total,
            self.scrapers.len(),
            summary.duration_ms
        );

        OrchestratorResult {
            auctions,
            errors,
            summary,
        }
    }

    /// Scrape a single platform, resolved from a name or alias such as
    /// `"BAT"` or `"collecting_cars"`
    pub async fn scrape_platform(
        &self,
        name: &str,
        options: &ScrapeOptions,
    ) -> Result<Vec<ScrapedAuction>, PlatformError> {
        let platform = Platform::from_alias(name)
            .ok_or_else(|| PlatformError::Unknown(name.to_string()))?;
        let scraper = self
            .scrapers
            .iter()
            .find(|scraper| scraper.platform() == platform)
            .ok_or_else(|| PlatformError::Unknown(name.to_string()))?;

        let result = scraper.scrape(options).await?;
        Ok(result.auctions)
    }
}
