//! Small helpers for reading listing and detail-page markup.

use scraper::{ElementRef, Html, Selector};

use crate::models::ScrapedAuction;
use crate::parse;

/// Concatenated text of an element with whitespace collapsed
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first child matching `selector`, `None` when missing or empty
pub(crate) fn child_text(element: ElementRef<'_>, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).unwrap();
    let text = element.select(&selector).next().map(element_text)?;
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Attribute of the first child matching `selector`
pub(crate) fn child_attr(element: ElementRef<'_>, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).unwrap();
    element
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string)
}

/// Text of the first document node matching `selector`
pub(crate) fn doc_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).unwrap();
    let text = document.select(&selector).next().map(element_text)?;
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Attribute of the first document node matching `selector`
pub(crate) fn doc_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).unwrap();
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string)
}

/// `(label, value)` pairs from rows whose text reads `"Label: Value"`,
/// e.g. `<li>Miles: 50,000</li>`. Rows without a colon are skipped.
pub(crate) fn colon_pairs(document: &Html, row_selector: &str) -> Vec<(String, String)> {
    let selector = Selector::parse(row_selector).unwrap();
    document
        .select(&selector)
        .filter_map(|row| {
            let text = element_text(row);
            let (label, value) = text.split_once(':')?;
            Some((label.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

/// `(label, value)` pairs where the value is the label's next element
/// sibling, covering `<dt>/<dd>` lists and label/value span pairs
pub(crate) fn sibling_pairs(document: &Html, label_selector: &str) -> Vec<(String, String)> {
    let selector = Selector::parse(label_selector).unwrap();
    let mut pairs = Vec::new();
    for label in document.select(&selector) {
        let mut node = label.next_sibling();
        while let Some(current) = node {
            if let Some(value) = ElementRef::wrap(current) {
                pairs.push((element_text(label), element_text(value)));
                break;
            }
            node = current.next_sibling();
        }
    }
    pairs
}

/// Absolute image URLs for every `selector` match with a `src`
pub(crate) fn image_urls(document: &Html, selector: &str, base: &str) -> Vec<String> {
    let selector = Selector::parse(selector).unwrap();
    document
        .select(&selector)
        .filter_map(|img| img.value().attr("src"))
        .map(|src| parse::absolute_url(base, src))
        .collect()
}

/// Fold one labeled value from a detail-page spec table into the listing.
/// Labels are matched loosely so platform wording ("Miles", "Mileage",
/// "Odometer Reading", "Exterior Colour", "Chassis") all land on the
/// right field; unrecognized labels are ignored.
pub(crate) fn apply_labeled_field(auction: &mut ScrapedAuction, label: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    let label = label.trim().trim_end_matches(':').to_lowercase();

    if label.contains("mile") || label.contains("odometer") {
        if let Some((mileage, unit)) = parse::parse_mileage_with_unit(value) {
            auction.mileage = Some(mileage);
            auction.mileage_unit = unit;
        }
    } else if label.contains("transmission") || label.contains("gearbox") {
        auction.transmission = Some(value.to_string());
    } else if label.contains("engine") {
        auction.engine = Some(value.to_string());
    } else if label.contains("exterior") || label == "color" || label == "colour" || label == "paint"
    {
        auction.exterior_color = Some(value.to_string());
    } else if label.contains("interior") {
        auction.interior_color = Some(value.to_string());
    } else if label.contains("location") {
        auction.location = Some(value.to_string());
    } else if label.contains("vin") || label.contains("chassis") {
        auction.vin = Some(value.to_string());
    } else if label.contains("seller note") {
        auction.seller_notes = Some(value.to_string());
    }
}
