use chrono::{DateTime, Utc};

/// Sale date of a concluded auction: the end time when the listing is
/// SOLD or ENDED (any casing), `None` while bidding is still open or
/// when either input is missing.
pub fn derive_sale_date(
    end_time: Option<DateTime<Utc>>,
    status: Option<&str>,
) -> Option<DateTime<Utc>> {
    let end_time = end_time?;
    let status = status?;
    match status.to_uppercase().as_str() {
        "SOLD" | "ENDED" => Some(end_time),
        _ => None,
    }
}
