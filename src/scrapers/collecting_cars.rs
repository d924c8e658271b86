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

const LISTING_URL: &str = "https://collectingcars.com/search";
const LISTING_SEGMENTS: &[&str] = &["/cars/", "/lots/"];

/// Collecting Cars scraper. UK-based, so prices are pounds and
/// odometers usually kilometres.
pub struct CollectingCarsScraper<F = HttpFetcher> {
    fetcher: F,
    page_delay: Duration,
}

impl CollectingCarsScraper<HttpFetcher> {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self::with_fetcher(HttpFetcher::new()?))
    }
}

impl<F: PageFetcher> CollectingCarsScraper<F> {
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

        let cards = Selector::parse("div.lot-card").unwrap();
        let mut auctions: Vec<ScrapedAuction> = document
            .select(&cards)
            .filter_map(Self::parse_card)
            .collect();

        if auctions.is_empty() {
            let links = Selector::parse(r#"a[href*="/cars/"]"#).unwrap();
            auctions = document
                .select(&links)
                .filter_map(Self::parse_link_card)
                .collect();
        }

        auctions
    }

    fn parse_card(card: ElementRef<'_>) -> Option<ScrapedAuction> {
        let link_selector = Selector::parse(r#"a[href*="/cars/"], a[href*="/lots/"]"#).unwrap();
        let link = card.select(&link_selector).next()?;
        let href = link.value().attr("href")?;
        parse::listing_slug(href, LISTING_SEGMENTS)?;

        let title = markup::child_text(card, ".lot-title")
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
        if let Some(location) = markup::child_text(card, "span.lot-location") {
            auction.location = Some(location);
        }
        if let Some(stats) = markup::child_text(card, ".stats") {
            if let Some((mileage, unit)) = parse::parse_mileage_with_unit(&stats) {
                auction.mileage = Some(mileage);
                auction.mileage_unit = unit;
            }
        }
        auction.end_time = markup::child_attr(card, "time[datetime]", "datetime")
            .and_then(|stamp| parse::parse_end_time(&stamp));
        auction.image_url = markup::child_attr(card, "img", "src")
            .map(|src| parse::absolute_url(Platform::CollectingCars.base_url(), &src));

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
        let platform = Platform::CollectingCars;
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

        if let Some(description) = markup::doc_text(&document, ".lot-description") {
            auction.description = Some(description);
        }
        for (label, value) in markup::colon_pairs(&document, "ul.lot-details li") {
            markup::apply_labeled_field(auction, &label, &value);
        }
        for (label, value) in markup::sibling_pairs(&document, ".spec-label") {
            markup::apply_labeled_field(auction, &label, &value);
        }
        if let Some(notes) = markup::doc_text(&document, ".seller-notes") {
            auction.seller_notes = Some(notes);
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
        let images = markup::image_urls(
            &document,
            ".lot-gallery img, .gallery img",
            Platform::CollectingCars.base_url(),
        );
        if !images.is_empty() {
            if auction.image_url.is_none() {
                auction.image_url = images.first().cloned();
            }
            auction.images = images;
        }
    }
}

#[async_trait]
impl<F: PageFetcher> PlatformScraper for CollectingCarsScraper<F> {
    fn platform(&self) -> Platform {
        Platform::CollectingCars
    }

    async fn scrape_listings(&self, max_pages: u32) -> ScrapeResult {
        let mut result = ScrapeResult::default();

        info!("Starting Collecting Cars scrape ({} pages max)", max_pages);

        for page in 1..=max_pages {
            if page > 1 {
                sleep(self.page_delay).await;
            }

            let url = Self::page_url(page);
            let html = match self.fetcher.fetch(&url).await {
                Ok(html) => html,
                Err(err) => {
                    warn!("Collecting Cars page {} failed: {}", page, err);
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
            "Collecting Cars: {} auctions, {} errors",
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MileageUnit;

    type Scraper = CollectingCarsScraper<HttpFetcher>;

    fn card(slug: &str, title: &str, price: &str, location: &str, stats: &str) -> String {
        format!(
            r#"<div class="lot-card">
                <a href="/cars/{slug}">
                    <img src="/img/{slug}.jpg" />
                </a>
                <h2 class="lot-title">{title}</h2>
                <div class="current-bid">{price}</div>
                <div class="bid-count">9 bids</div>
                <span class="lot-location">{location}</span>
                <div class="stats">{stats}</div>
                <time datetime="2025-08-10T17:30:00Z">Aug 10</time>
            </div>"#
        )
    }

    #[test]
    fn search_pagination_uses_a_query_parameter() {
        assert_eq!(Scraper::page_url(1), "https://collectingcars.com/search");
        assert_eq!(
            Scraper::page_url(2),
            "https://collectingcars.com/search?page=2"
        );
    }

    #[test]
    fn parses_lot_cards_with_location_and_km() {
        let page = format!(
            "<html><body>{}</body></html>",
            card(
                "porsche-911-993-turbo",
                "Porsche 911 (993) Turbo - 1996",
                "£195,000",
                "London, United Kingdom",
                "25,000 km"
            )
        );
        let auctions = Scraper::parse_listing_page(&page);

        assert_eq!(auctions.len(), 1);
        let auction = &auctions[0];
        assert_eq!(auction.external_id, "cc-porsche-911-993-turbo");
        assert_eq!(auction.platform, Platform::CollectingCars);
        assert_eq!(auction.year, 1996);
        assert_eq!(auction.make, "Porsche");
        assert_eq!(auction.model, "911 (993) Turbo");
        assert_eq!(auction.current_bid, Some(195000.0));
        assert_eq!(auction.raw_price_text.as_deref(), Some("£195,000"));
        assert_eq!(auction.location.as_deref(), Some("London, United Kingdom"));
        assert_eq!(auction.mileage, Some(25000));
        assert_eq!(auction.mileage_unit, MileageUnit::Km);
        assert_eq!(
            auction.image_url.as_deref(),
            Some("https://collectingcars.com/img/porsche-911-993-turbo.jpg")
        );
    }

    #[test]
    fn accepts_lots_links_in_cards() {
        let page = r#"<html><body>
            <div class="lot-card">
                <a href="/lots/lancia-delta-integrale">
                    <h2 class="lot-title">Lancia Delta HF Integrale - 1992</h2>
                </a>
            </div>
        </body></html>"#;
        let auctions = Scraper::parse_listing_page(page);

        assert_eq!(auctions.len(), 1);
        assert_eq!(auctions[0].external_id, "cc-lancia-delta-integrale");
    }

    #[test]
    fn falls_back_to_car_links() {
        let page = r#"<html><body>
            <li>
                <a href="/cars/bmw-e30-m3">BMW M3 (E30) - 1989</a>
                <div class="current-bid">£85,000</div>
                <div class="bid-count">14 bids</div>
            </li>
        </body></html>"#;
        let auctions = Scraper::parse_listing_page(page);

        assert_eq!(auctions.len(), 1);
        assert_eq!(auctions[0].title, "BMW M3 (E30) - 1989");
        assert_eq!(auctions[0].year, 1989);
        assert_eq!(auctions[0].current_bid, Some(85000.0));
        assert_eq!(auctions[0].bid_count, Some(14));
    }

    #[test]
    fn detail_page_reads_spec_pairs_and_seller_notes() {
        let mut auction =
            Scraper::new_auction("/cars/detail-test", "Ferrari F355 Berlinetta - 1997".into());

        let detail = r#"<html><body>
            <div class="lot-description">A collector grade F355.</div>
            <ul class="lot-details">
                <li>Odometer: 31,200 km</li>
                <li>Chassis: ZFFXR41B000104321</li>
            </ul>
            <div class="specs">
                <span class="spec-label">Transmission</span>
                <span class="spec-value">Gated 6-Speed</span>
                <span class="spec-label">Paint</span>
                <span class="spec-value">Rosso Corsa</span>
            </div>
            <div class="seller-notes">Cambelt service completed in 2024.</div>
            <div class="current-bid">£98,500</div>
        </body></html>"#;
        Scraper::apply_detail(&mut auction, detail);

        assert_eq!(auction.description.as_deref(), Some("A collector grade F355."));
        assert_eq!(auction.mileage, Some(31200));
        assert_eq!(auction.mileage_unit, MileageUnit::Km);
        assert_eq!(auction.vin.as_deref(), Some("ZFFXR41B000104321"));
        assert_eq!(auction.transmission.as_deref(), Some("Gated 6-Speed"));
        assert_eq!(auction.exterior_color.as_deref(), Some("Rosso Corsa"));
        assert_eq!(
            auction.seller_notes.as_deref(),
            Some("Cambelt service completed in 2024.")
        );
        assert_eq!(auction.current_bid, Some(98500.0));
        assert_eq!(auction.raw_price_text.as_deref(), Some("£98,500"));
    }

    #[test]
    fn detail_gallery_prefers_the_lot_gallery() {
        let mut auction = Scraper::new_auction("/cars/gallery-test", "Jaguar E-Type - 1964".into());

        let detail = r#"<html><body>
            <div class="lot-gallery">
                <img src="/img/etype-front.jpg" />
                <img src="/img/etype-rear.jpg" />
            </div>
        </body></html>"#;
        Scraper::apply_detail(&mut auction, detail);

        assert_eq!(auction.images.len(), 2);
        assert_eq!(
            auction.image_url.as_deref(),
            Some("https://collectingcars.com/img/etype-front.jpg")
        );
    }
}
