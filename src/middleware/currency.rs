use serde::{Deserialize, Serialize};

use crate::models::Platform;

/// Currencies the platforms list prices in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd = 0,
    Eur = 1,
    Gbp = 2,
}

/// Conversion rates indexed `[from][to]` in `Currency` declaration order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeRates(pub [[f64; 3]; 3]);

/// Static snapshot rates. Good enough for comparison across platforms;
/// not a market feed.
pub const DEFAULT_RATES: ExchangeRates = ExchangeRates([
    [1.0, 0.92, 0.79],
    [1.09, 1.0, 0.86],
    [1.27, 1.16, 1.0],
]);

impl ExchangeRates {
    fn rate(&self, from: Currency, to: Currency) -> f64 {
        self.0[from as usize][to as usize]
    }
}

/// A price expressed in all three supported currencies
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MultiCurrencyPrice {
    pub price_usd: Option<f64>,
    pub price_eur: Option<f64>,
    pub price_gbp: Option<f64>,
    pub original_currency: Currency,
}

/// Currency of a listing. A symbol in the raw price text wins over the
/// platform default; Collecting Cars defaults to GBP, the US platforms
/// to USD.
pub fn detect_currency(platform: Platform, raw_price_text: Option<&str>) -> Currency {
    if let Some(raw) = raw_price_text {
        if raw.contains('\u{00A3}') {
            return Currency::Gbp;
        }
        if raw.contains('\u{20AC}') || raw.to_uppercase().contains("EUR") {
            return Currency::Eur;
        }
        if raw.contains('$') {
            return Currency::Usd;
        }
    }
    if platform == Platform::CollectingCars {
        return Currency::Gbp;
    }
    Currency::Usd
}

/// Convert an amount into all three currencies, rounded to cents.
/// `None` amounts pass through as all-`None` while preserving the
/// detected currency.
pub fn normalize_price(
    amount: Option<f64>,
    currency: Currency,
    rates: Option<&ExchangeRates>,
) -> MultiCurrencyPrice {
    let rates = rates.unwrap_or(&DEFAULT_RATES);
    let Some(amount) = amount else {
        return MultiCurrencyPrice {
            price_usd: None,
            price_eur: None,
            price_gbp: None,
            original_currency: currency,
        };
    };
    MultiCurrencyPrice {
        price_usd: Some(round_cents(amount * rates.rate(currency, Currency::Usd))),
        price_eur: Some(round_cents(amount * rates.rate(currency, Currency::Eur))),
        price_gbp: Some(round_cents(amount * rates.rate(currency, Currency::Gbp))),
        original_currency: currency,
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
