use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::fetch::{FetchError, HttpFetcher, PageFetcher};
use crate::models::{Platform, ScrapeResult, ScrapedAuction};
use crate::parse;
use crate::scrapers::markup;
use crate::scrapers::traits::PlatformScraper;
use crate::scrapers::DEFAULT_PAGE_DELAY;

const LISTING_URL: &str = "https://carsandbids.com/auctions";
const LISTING_SEGMENTS: &[&str] = &["/auctions/"];

/// Cars & Bids scraper
pub struct CarsAndBidsScraper<F = HttpFetcher> {
    fetcher: F,
    page_delay: Duration,
}

impl CarsAndBidsScraper<HttpFetcher> {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self::with_fetcher(HttpFetcher::new()?))
    }
}

impl<F: PageFetcher> CarsAndBidsScraper<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self {
            fetcher,
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }

    pub fn page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    fn page_url(page: u32) -> String {
        if page <= 1 {
            LISTING_URL.to_string()
        } else {
            format!("{}?page={}", LISTING_URL, page)
        }
    }

    fn parse_listing_page(html: &str) -> Vec<ScrapedAuction> {
        let document = Html::parse_document(html);

        let cards = Selector::parse("div.auction-card").unwrap();
        let mut auctions: Vec<ScrapedAuction> = document
            .select(&cards)
            .filter_map(Self::parse_card)
            .collect();

        if auctions.is_empty() {
            let links = Selector::parse(r#"a[href*="/auctions/"]"#).unwrap();
            auctions = document
                .select(&links)
                .filter_map(Self::parse_link_card)
                .collect();
        }

        auctions
    }

    fn parse_card(card: ElementRef<'_>) -> Option<ScrapedAuction> {
        let link_selector = Selector::parse(r#"a[href*="/auctions/"]"#).unwrap();
        let link = card.select(&link_selector).next()?;
        let href = link.value().attr("href")?;
        parse::listing_slug(href, LISTING_SEGMENTS)?;

        let title = markup::child_text(card, ".auction-title")
            .or_else(|| Some(markup::element_text(link)).filter(|text| !text.is_empty()))?;
        if parse::is_section_header(&title) {
            return None;
        }

        let mut auction = Self::new_auction(href, title);

        if let Some(price_text) = markup::child_text(card, ".current-bid") {
            auction.current_bid = parse::parse_price(&price_text);
            auction.raw_price_text = Some(price_text);
        }
        if let Some(count_text) = markup::child_text(card, ".bid-count") {
            auction.bid_count = parse::parse_bid_count(&count_text);
        }
        // mileage sits in the card stats line, e.g. "15,000 miles"
        if let Some(stats) = markup::child_text(card, ".stats") {
            if let Some((mileage, unit)) = parse::parse_mileage_with_unit(&stats) {
                auction.mileage = Some(mileage);
                auction.mileage_unit = unit;
            }
        }
        auction.end_time = markup::child_attr(card, "time[datetime]", "datetime")
            .and_then(|stamp| parse::parse_end_time(&stamp));
        auction.image_url = markup::child_attr(card, "img", "src")
            .map(|src| parse::absolute_url(Platform::CarsAndBids.base_url(), &src));

        Some(auction)
    }

    fn parse_link_card(link: ElementRef<'_>) -> Option<ScrapedAuction> {
        let href = link.value().attr("href")?;
        parse::listing_slug(href, LISTING_SEGMENTS)?;

        let title = markup::element_text(link);
        if title.is_empty() || parse::is_section_header(&title) {
            return None;
        }

        let mut auction = Self::new_auction(href, title);

        if let Some(item) = link.parent().and_then(ElementRef::wrap) {
            if let Some(price_text) = markup::child_text(item, ".current-bid") {
                auction.current_bid = parse::parse_price(&price_text);
                auction.raw_price_text = Some(price_text);
            }
            if let Some(count_text) = markup::child_text(item, ".bid-count") {
                auction.bid_count = parse::parse_bid_count(&count_text);
            }
        }

        Some(auction)
    }

    fn new_auction(href: &str, title: String) -> ScrapedAuction {
        let platform = Platform::CarsAndBids;
        let url = parse::absolute_url(platform.base_url(), href);
        let external_id = parse::external_id(&url, platform.id_prefix(), LISTING_SEGMENTS);
        let mut auction = ScrapedAuction::new(platform, external_id, title, url);

        let components = parse::parse_title_components(&auction.title);
        auction.year = components.year;
        auction.make = components.make;
        auction.model = components.model;
        auction
    }

    fn apply_detail(auction: &mut ScrapedAuction, html: &str) {
        let document = Html::parse_document(html);

        if let Some(description) = markup::doc_text(&document, ".auction-description") {
            auction.description = Some(description);
        }
        for (label, value) in markup::colon_pairs(&document, "ul.quick-facts li") {
            markup::apply_labeled_field(auction, &label, &value);
        }
        // newer detail pages render specs as a definition list instead
        for (label, value) in markup::sibling_pairs(&document, "dl dt") {
            markup::apply_labeled_field(auction, &label, &value);
        }
        if let Some(price_text) = markup::doc_text(&document, ".current-bid") {
            auction.current_bid = parse::parse_price(&price_text).or(auction.current_bid);
            auction.raw_price_text = Some(price_text);
        }
        if let Some(count) =
            markup::doc_text(&document, ".bid-count").and_then(|text| parse::parse_bid_count(&text))
        {
            auction.bid_count = Some(count);
        }
        let images = markup::image_urls(&document, ".gallery img", Platform::CarsAndBids.base_url());
        if !images.is_empty() {
            if auction.image_url.is_none() {
                auction.image_url = images.first().cloned();
            }
            auction.images = images;
        }
    }
}

#[async_trait]
impl<F: PageFetcher> PlatformScraper for CarsAndBidsScraper<F> {
    fn platform(&self) -> Platform {
        Platform::CarsAndBids
    }

    async fn scrape_listings(&self, max_pages: u32) -> ScrapeResult {
        let mut result = ScrapeResult::default();

        info!("Starting Cars & Bids scrape ({} pages max)", max_pages);

        for page in 1..=max_pages {
            if page > 1 {
                sleep(self.page_delay).await;
            }

            let url = Self::page_url(page);
            let html = match self.fetcher.fetch(&url).await {
                Ok(html) => html,
                Err(err) => {
                    warn!("Cars & Bids page {} failed: {}", page, err);
                    result
                        .errors
                        .push(format!("Error scraping page {}: {}", page, err));
                    break;
                }
            };

            let auctions = Self::parse_listing_page(&html);
            if auctions.is_empty() {
                result
                    .errors
                    .push(format!("No auction cards found on page {}", page));
                break;
            }

            debug!("Parsed {} auction cards from page {}", auctions.len(), page);
            result.auctions.extend(auctions);
        }

        info!(
            "Cars & Bids: {} auctions, {} errors",
            result.auctions.len(),
            result.errors.len()
        );
        result
    }

    async fn scrape_detail(&self, auction: ScrapedAuction) -> ScrapedAuction {
        sleep(self.page_delay).await;

        let html = match self.fetcher.fetch(&auction.url).await {
            Ok(html) => html,
            Err(err) => {
                warn!("Detail fetch failed for {}: {}", auction.url, err);
                return auction;
            }
        };

        let mut auction = auction;
        Self::apply_detail(&mut auction, &html);
        auction
    }
}
