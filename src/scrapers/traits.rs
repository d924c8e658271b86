use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::models::{Platform, ScrapeOptions, ScrapeResult, ScrapedAuction};

/// Common trait for all platform scrapers
/// This allows easy addition of new auction sources (RM Sotheby's, PCARMARKET, etc)
#[async_trait]
pub trait PlatformScraper: Send + Sync {
    /// Platform this scraper covers
    fn platform(&self) -> Platform;

    /// Walk listing pages and collect auction cards. Per-page problems
    /// are reported in the result's `errors`, not as an `Err`.
    async fn scrape_listings(&self, max_pages: u32) -> ScrapeResult;

    /// Enrich one listing from its detail page. Must always hand the
    /// listing back; on any failure the input is returned unchanged.
    async fn scrape_detail(&self, auction: ScrapedAuction) -> ScrapedAuction;

    /// Full scrape: listings first, then detail enrichment for the
    /// first `max_details` listings when enabled.
    async fn scrape(&self, options: &ScrapeOptions) -> Result<ScrapeResult> {
        let mut result = self.scrape_listings(options.max_pages).await;

        if options.scrape_details && !result.auctions.is_empty() {
            let limit = options.max_details.min(result.auctions.len());
            info!(
                "{}: enriching {} of {} listings from detail pages",
                self.platform(),
                limit,
                result.auctions.len()
            );
            for i in 0..limit {
                let auction = result.auctions[i].clone();
                result.auctions[i] = self.scrape_detail(auction).await;
            }
        }

        Ok(result)
    }
}
