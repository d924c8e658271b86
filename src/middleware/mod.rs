//! Enrichment passes applied to scraped listings. Each pass derives one
//! field family from the raw record and never mutates it.

pub mod buyers_premium;
pub mod condition;
pub mod currency;
pub mod location;
pub mod sale_date;
pub mod trim;

pub use buyers_premium::buyers_premium_percent;
pub use condition::{classify_condition, ConditionClass};
pub use currency::{
    detect_currency, normalize_price, Currency, ExchangeRates, MultiCurrencyPrice, DEFAULT_RATES,
};
pub use location::extract_country_code;
pub use sale_date::derive_sale_date;
pub use trim::{extract_trim_and_body_style, TrimInfo};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::ScrapedAuction;

/// A scraped listing plus everything the enrichment passes derive from it
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedAuction {
    #[serde(flatten)]
    pub auction: ScrapedAuction,
    pub price: MultiCurrencyPrice,
    pub country_code: Option<String>,
    pub sale_date: Option<DateTime<Utc>>,
    pub buyers_premium_percent: f64,
    pub trim: Option<String>,
    pub body_style: Option<String>,
    pub condition: ConditionClass,
}

/// Run every enrichment pass over a scraped listing
pub fn enrich(auction: ScrapedAuction) -> EnrichedAuction {
    let currency = detect_currency(auction.platform, auction.raw_price_text.as_deref());
    let price = normalize_price(auction.current_bid, currency, None);
    let country_code = auction
        .location
        .as_deref()
        .and_then(extract_country_code)
        .map(str::to_string);
    let sale_date = derive_sale_date(auction.end_time, Some(auction.status.as_str()));
    let premium = buyers_premium_percent(auction.platform);
    let TrimInfo { trim, body_style } =
        extract_trim_and_body_style(&auction.title, auction.description.as_deref());
    let condition = classify_condition(auction.description.as_deref());

    EnrichedAuction {
        price,
        country_code,
        sale_date,
        buyers_premium_percent: premium,
        trim: trim.map(str::to_string),
        body_style: body_style.map(str::to_string),
        condition,
        auction,
    }
}
