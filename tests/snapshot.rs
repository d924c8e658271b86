mod common;

use std::time::Duration;

use auction_scout::snapshot::{SnapshotScraper, SnapshotSource, SnapshotStatus};
use chrono::Utc;
use common::StubFetcher;

const BAT_URL: &str = "https://bringatrailer.com/listing/cache-test";

const BAT_SOLD_PAGE: &str = r#"<html><body>
    <h1>1990 Porsche 911 Carrera 4</h1>
    <span class="listing-sold">Sold for USD $67,500</span>
    <span class="bid-count">42 bids</span>
    <span data-end-time="2025-06-15T18:00:00Z"></span>
</body></html>"#;

#[tokio::test]
async fn snapshots_a_sold_listing_end_to_end() {
    let fetcher = StubFetcher::new().with_page(BAT_URL, BAT_SOLD_PAGE);
    let scraper = SnapshotScraper::with_fetcher(fetcher);

    let snapshot = scraper.fetch_auction_data(BAT_URL, true).await;

    assert_eq!(snapshot.source, SnapshotSource::Bringatrailer);
    assert_eq!(snapshot.current_bid, Some(67500.0));
    assert_eq!(snapshot.bid_count, Some(42));
    assert_eq!(snapshot.status, Some(SnapshotStatus::Sold));
    assert_eq!(snapshot.title.as_deref(), Some("1990 Porsche 911 Carrera 4"));
    assert_eq!(
        snapshot.end_time,
        Some("2025-06-15T18:00:00Z".parse().unwrap())
    );
}

#[tokio::test]
async fn serves_cached_snapshots_until_refreshed() {
    let fetcher = StubFetcher::new().with_page(BAT_URL, BAT_SOLD_PAGE);
    let scraper = SnapshotScraper::with_fetcher(fetcher.clone());

    let first = scraper.fetch_auction_data(BAT_URL, true).await;
    let second = scraper.fetch_auction_data(BAT_URL, false).await;

    assert_eq!(fetcher.call_count(), 1);
    assert_eq!(second.current_bid, first.current_bid);
    assert_eq!(second.scraped_at, first.scraped_at);
}

#[tokio::test]
async fn force_refresh_bypasses_the_cache() {
    let fetcher = StubFetcher::new().with_page(BAT_URL, BAT_SOLD_PAGE);
    let scraper = SnapshotScraper::with_fetcher(fetcher.clone());

    scraper.fetch_auction_data(BAT_URL, true).await;
    scraper.fetch_auction_data(BAT_URL, true).await;

    assert_eq!(fetcher.call_count(), 2);
}

#[tokio::test]
async fn expired_entries_are_refetched() {
    let fetcher = StubFetcher::new().with_page(BAT_URL, BAT_SOLD_PAGE);
    let scraper = SnapshotScraper::with_fetcher(fetcher.clone()).cache_ttl(Duration::ZERO);

    scraper.fetch_auction_data(BAT_URL, true).await;
    scraper.fetch_auction_data(BAT_URL, false).await;

    assert_eq!(fetcher.call_count(), 2);
}

#[tokio::test]
async fn fetch_failures_yield_empty_snapshots_and_are_not_cached() {
    let url = "https://bringatrailer.com/listing/blocked";
    let fetcher = StubFetcher::new().with_failure(url);
    let scraper = SnapshotScraper::with_fetcher(fetcher.clone());

    let snapshot = scraper.fetch_auction_data(url, false).await;
    assert_eq!(snapshot.source, SnapshotSource::Bringatrailer);
    assert_eq!(snapshot.current_bid, None);
    assert_eq!(snapshot.status, None);

    // a second call retries instead of serving the failure from cache
    scraper.fetch_auction_data(url, false).await;
    assert_eq!(fetcher.call_count(), 2);
}

#[tokio::test]
async fn unregistered_pages_read_as_empty_snapshots() {
    let fetcher = StubFetcher::new();
    let scraper = SnapshotScraper::with_fetcher(fetcher);

    let snapshot = scraper
        .fetch_auction_data("https://example.com/listing/404", false)
        .await;

    assert_eq!(snapshot.source, SnapshotSource::Unknown);
    assert_eq!(snapshot.current_bid, None);
    assert_eq!(snapshot.title, None);
}

#[tokio::test]
async fn generic_extractor_covers_unknown_platforms() {
    let url = "https://example.com/car/1";
    let fetcher = StubFetcher::new().with_page(
        url,
        r#"<html><body><div class="price">$99,000</div><h1>Some Car</h1></body></html>"#,
    );
    let scraper = SnapshotScraper::with_fetcher(fetcher);

    let snapshot = scraper.fetch_auction_data(url, true).await;

    assert_eq!(snapshot.source, SnapshotSource::Unknown);
    assert_eq!(snapshot.current_bid, Some(99000.0));
    assert_eq!(snapshot.title.as_deref(), Some("Some Car"));
}

#[tokio::test]
async fn stamps_scraped_at_between_call_boundaries() {
    let fetcher = StubFetcher::new().with_page(BAT_URL, BAT_SOLD_PAGE);
    let scraper = SnapshotScraper::with_fetcher(fetcher);

    let before = Utc::now();
    let snapshot = scraper.fetch_auction_data(BAT_URL, true).await;
    let after = Utc::now();

    assert!(snapshot.scraped_at >= before);
    assert!(snapshot.scraped_at <= after);
}

#[tokio::test]
async fn cache_admin_reports_and_cleans_expired_entries() {
    let fetcher = StubFetcher::new().with_page(BAT_URL, BAT_SOLD_PAGE);
    let scraper = SnapshotScraper::with_fetcher(fetcher).cache_ttl(Duration::ZERO);

    scraper.fetch_auction_data(BAT_URL, true).await;

    let stats = scraper.cache_stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.expired, 1);

    assert_eq!(scraper.clean_cache(), 1);
    assert_eq!(scraper.cache_stats().entries, 0);
}

#[tokio::test]
async fn clear_cache_drops_everything() {
    let fetcher = StubFetcher::new().with_page(BAT_URL, BAT_SOLD_PAGE);
    let scraper = SnapshotScraper::with_fetcher(fetcher.clone());

    scraper.fetch_auction_data(BAT_URL, true).await;
    assert_eq!(scraper.cache_stats().entries, 1);

    scraper.clear_cache();
    assert_eq!(scraper.cache_stats().entries, 0);

    // next read goes back to the network
    scraper.fetch_auction_data(BAT_URL, false).await;
    assert_eq!(fetcher.call_count(), 2);
}
