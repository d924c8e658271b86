use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Auction platform a listing was scraped from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    BringATrailer,
    CarsAndBids,
    CollectingCars,
}

impl Platform {
    pub const ALL: [Platform; 3] = [
        Platform::BringATrailer,
        Platform::CarsAndBids,
        Platform::CollectingCars,
    ];

    /// Canonical identifier used in summary keys and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::BringATrailer => "BRING_A_TRAILER",
            Platform::CarsAndBids => "CARS_AND_BIDS",
            Platform::CollectingCars => "COLLECTING_CARS",
        }
    }

    /// Human-readable platform name
    pub fn label(&self) -> &'static str {
        match self {
            Platform::BringATrailer => "Bring a Trailer",
            Platform::CarsAndBids => "Cars & Bids",
            Platform::CollectingCars => "Collecting Cars",
        }
    }

    /// Prefix for externally visible listing ids, e.g. `bat-` or `cc-`
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Platform::BringATrailer => "bat",
            Platform::CarsAndBids => "cab",
            Platform::CollectingCars => "cc",
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Platform::BringATrailer => "https://bringatrailer.com",
            Platform::CarsAndBids => "https://carsandbids.com",
            Platform::CollectingCars => "https://collectingcars.com",
        }
    }

    /// Resolve a user-supplied platform name. Accepts canonical names,
    /// short codes and spelling variants, case-insensitively.
    pub fn from_alias(name: &str) -> Option<Platform> {
        let normalized: String = name
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_uppercase();
        match normalized.as_str() {
            "BAT" | "BRINGATRAILER" => Some(Platform::BringATrailer),
            "CAB" | "CARSANDBIDS" => Some(Platform::CarsAndBids),
            "CC" | "COLLECTINGCARS" => Some(Platform::CollectingCars),
            _ => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Odometer unit as displayed by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MileageUnit {
    Miles,
    Km,
}

impl fmt::Display for MileageUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MileageUnit::Miles => f.write_str("miles"),
            MileageUnit::Km => f.write_str("km"),
        }
    }
}

/// Lifecycle state of a listing at scrape time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuctionStatus {
    Active,
    Ended,
    Sold,
}

impl AuctionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionStatus::Active => "active",
            AuctionStatus::Ended => "ended",
            AuctionStatus::Sold => "sold",
        }
    }
}

/// Core auction listing data model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedAuction {
    pub external_id: String,
    pub platform: Platform,
    pub title: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub mileage: Option<u32>,
    pub mileage_unit: MileageUnit,
    pub vin: Option<String>,
    pub transmission: Option<String>,
    pub engine: Option<String>,
    pub exterior_color: Option<String>,
    pub interior_color: Option<String>,
    pub location: Option<String>,
    pub current_bid: Option<f64>,
    pub raw_price_text: Option<String>,
    pub bid_count: Option<u32>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: AuctionStatus,
    pub url: String,
    pub image_url: Option<String>,
    pub images: Vec<String>,
    pub description: Option<String>,
    pub seller_notes: Option<String>,
}

impl ScrapedAuction {
    /// New listing with identity fields set and everything else unknown.
    /// Card and detail parsers fill in the rest as markup allows.
    pub fn new(platform: Platform, external_id: String, title: String, url: String) -> Self {
        Self {
            external_id,
            platform,
            title,
            make: String::new(),
            model: String::new(),
            year: 0,
            mileage: None,
            mileage_unit: MileageUnit::Miles,
            vin: None,
            transmission: None,
            engine: None,
            exterior_color: None,
            interior_color: None,
            location: None,
            current_bid: None,
            raw_price_text: None,
            bid_count: None,
            end_time: None,
            status: AuctionStatus::Active,
            url,
            image_url: None,
            images: Vec::new(),
            description: None,
            seller_notes: None,
        }
    }
}

/// Tuning knobs for a scrape run
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Listing pages to walk per platform
    pub max_pages: u32,
    /// Whether to follow listing URLs for detail enrichment
    pub scrape_details: bool,
    /// Cap on detail pages fetched per platform
    pub max_details: usize,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            max_pages: 2,
            scrape_details: false,
            max_details: 5,
        }
    }
}

/// Outcome of scraping a single platform. Errors are collected as
/// human-readable strings rather than aborting the run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScrapeResult {
    pub auctions: Vec<ScrapedAuction>,
    pub errors: Vec<String>,
}

/// Per-run statistics reported alongside the merged listings
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeSummary {
    pub total: usize,
    pub by_platform: HashMap<Platform, usize>,
    pub duration_ms: u64,
}

/// Merged outcome of a full multi-platform run
#[derive(Debug, Clone, Serialize)]
pub struct OrchestratorResult {
    pub auctions: Vec<ScrapedAuction>,
    pub errors: Vec<String>,
    pub summary: ScrapeSummary,
}
