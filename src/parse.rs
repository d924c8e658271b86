//! Field-level parsers shared by all platform scrapers.
//!
//! Everything in here is forgiving: listing markup varies between pages
//! and over time, so parsers return `Option` instead of failing the scrape.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use url::Url;

use crate::models::MileageUnit;

/// Makes whose names span two words. Checked before falling back to
/// the first whitespace-separated token. Hyphenated makes such as
/// Mercedes-Benz are a single token and need no entry here.
const MULTI_WORD_MAKES: [&str; 5] = [
    "Alfa Romeo",
    "Aston Martin",
    "De Tomaso",
    "Land Rover",
    "Range Rover",
];

static PRICE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d[\d,]*(?:\.\d+)?)").unwrap());
static INTEGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d[\d,]*)").unwrap());
static BID_COUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)").unwrap());
static LEADING_YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})\s+(.+)$").unwrap());
static TRAILING_YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+?)\s*-\s*(\d{4})$").unwrap());
static SECTION_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(past|current|featured)").unwrap());

/// Extract a monetary amount from display text such as `"Bid to $12,500"`
/// or `"€45,000.50"`. Currency symbols and thousands separators are
/// ignored; the first number wins.
pub fn parse_price(text: &str) -> Option<f64> {
    let caps = PRICE_RE.captures(text)?;
    caps[1].replace(',', "").parse().ok()
}

/// Extract an odometer reading from text such as `"45,230 Miles"` or
/// `"~500 km"`. Unit suffixes are handled by [`parse_mileage_with_unit`].
pub fn parse_mileage(text: &str) -> Option<u32> {
    let caps = INTEGER_RE.captures(text)?;
    caps[1].replace(',', "").parse().ok()
}

/// Mileage plus its display unit. Any `km` marker in the text selects
/// kilometres; everything else defaults to miles.
pub fn parse_mileage_with_unit(text: &str) -> Option<(u32, MileageUnit)> {
    let mileage = parse_mileage(text)?;
    let unit = if text.to_lowercase().contains("km") {
        MileageUnit::Km
    } else {
        MileageUnit::Miles
    };
    Some((mileage, unit))
}

/// Extract a bid count from text such as `"42 bids"` or `"1 bid"`
pub fn parse_bid_count(text: &str) -> Option<u32> {
    let caps = BID_COUNT_RE.captures(text)?;
    caps[1].parse().ok()
}

/// Year, make and model decomposed from a listing title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleComponents {
    pub year: i32,
    pub make: String,
    pub model: String,
}

/// Decompose a listing title into year, make and model.
///
/// Handles the `"1985 Ferrari 308 GTS"` form used by US platforms and the
/// trailing-year `"Porsche 911 (993) Turbo - 1996"` form used by Collecting
/// Cars. Titles without a recognizable year get year 0; unknown parts are
/// empty strings, never a failure.
pub fn parse_title_components(title: &str) -> TitleComponents {
    let title = title.trim();
    if title.is_empty() {
        return TitleComponents {
            year: 0,
            make: String::new(),
            model: String::new(),
        };
    }

    if let Some(caps) = LEADING_YEAR_RE.captures(title) {
        let year = caps[1].parse().unwrap_or(0);
        let (make, model) = split_make_model(caps[2].trim());
        return TitleComponents { year, make, model };
    }

    if let Some(caps) = TRAILING_YEAR_RE.captures(title) {
        let year = caps[2].parse().unwrap_or(0);
        let (make, model) = split_make_model(caps[1].trim());
        return TitleComponents { year, make, model };
    }

    let (make, model) = split_make_model(title);
    TitleComponents {
        year: 0,
        make,
        model,
    }
}

fn split_make_model(rest: &str) -> (String, String) {
    for make in MULTI_WORD_MAKES {
        if let Some(stripped) = rest.strip_prefix(make) {
            if stripped.is_empty() || stripped.starts_with(' ') {
                return (make.to_string(), stripped.trim_start().to_string());
            }
        }
    }
    match rest.split_once(' ') {
        Some((make, model)) => (make.to_string(), model.trim().to_string()),
        None => (rest.to_string(), String::new()),
    }
}

/// Slug of a listing URL, if the URL points at a listing page.
///
/// `segments` are the path markers that precede the slug, e.g.
/// `"/listing/"` or `"/cars/"`. Returns `None` for URLs whose tail is not
/// a plain slug, which filters out pagination and section links like
/// `/auctions/?page=2`.
pub fn listing_slug<'a>(url: &'a str, segments: &[&str]) -> Option<&'a str> {
    for segment in segments {
        if let Some(pos) = url.find(segment) {
            let tail = url[pos + segment.len()..].trim_end_matches('/');
            if !tail.is_empty()
                && tail
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Some(tail);
            }
        }
    }
    None
}

/// Stable external id for a listing URL: `<prefix>-<slug>` when the URL
/// carries a listing slug, otherwise `<prefix>-<hash>` so the same URL
/// always maps to the same id.
pub fn external_id(url: &str, prefix: &str, segments: &[&str]) -> String {
    match listing_slug(url, segments) {
        Some(slug) => format!("{}-{}", prefix, slug),
        None => format!("{}-{}", prefix, url_hash(url)),
    }
}

fn url_hash(url: &str) -> u64 {
    let digest = Sha256::digest(url.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

/// True for card titles that are section headers rather than listings,
/// e.g. "Past Auctions"
pub fn is_section_header(title: &str) -> bool {
    SECTION_HEADER_RE.is_match(title)
}

/// Resolve a possibly relative href against the platform base URL
pub fn absolute_url(base: &str, href: &str) -> String {
    match Url::parse(href) {
        Ok(url) => url.to_string(),
        Err(_) => Url::parse(base)
            .and_then(|base| base.join(href))
            .map(|url| url.to_string())
            .unwrap_or_else(|_| href.to_string()),
    }
}

/// Parse an auction end time from a `datetime` attribute. Listing markup
/// uses RFC 3339 stamps; anything else is treated as no end time.
pub fn parse_end_time(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text.trim())
        .ok()
        .map(|stamp| stamp.with_timezone(&Utc))
}
