use auction_scout::middleware::{enrich, EnrichedAuction};
use auction_scout::models::ScrapeOptions;
use auction_scout::scrapers::Orchestrator;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🏁 Auction Scout - Collector Car Auction Scraper");
    info!("================================================");
    info!("");

    let options = ScrapeOptions::default();
    let orchestrator = Orchestrator::new()?;

    // An optional first argument limits the run to one platform,
    // e.g. `auction-scout BAT` or `auction-scout collecting_cars`
    let auctions = match std::env::args().nth(1) {
        Some(platform) => {
            info!("Scraping single platform: {}", platform);
            orchestrator.scrape_platform(&platform, &options).await?
        }
        None => {
            info!("Scraping all platforms...");
            let result = orchestrator.scrape_all(&options).await;

            for error in &result.errors {
                warn!("{}", error);
            }
            info!(
                "✅ {} auctions in {}ms",
                result.summary.total, result.summary.duration_ms
            );
            for (platform, count) in &result.summary.by_platform {
                info!("   {}: {}", platform, count);
            }

            result.auctions
        }
    };

    let enriched: Vec<EnrichedAuction> = auctions.into_iter().map(enrich).collect();

    // Display results
    for (i, entry) in enriched.iter().enumerate() {
        let auction = &entry.auction;
        println!("{}. {} [{}]", i + 1, auction.title, auction.platform.label());
        if let Some(bid) = auction.current_bid {
            println!("   Current bid: ${:.0} ({} bids)", bid, auction.bid_count.unwrap_or(0));
        }
        if let Some(usd) = entry.price.price_usd {
            println!("   Normalized: ${:.2} USD", usd);
        }
        if let Some(country) = &entry.country_code {
            println!("   Country: {}", country);
        }
        println!("   ID: {}", auction.external_id);
        println!("   URL: {}", auction.url);
        println!();
    }

    // Save to JSON file
    let json = serde_json::to_string_pretty(&enriched)?;
    tokio::fs::write("scraped_auctions.json", json).await?;
    info!("💾 Saved {} auctions to scraped_auctions.json", enriched.len());

    Ok(())
}
