use once_cell::sync::Lazy;
use regex::Regex;

static US_STATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i),\s*(AL|AK|AZ|AR|CA|CO|CT|DE|FL|GA|HI|ID|IL|IN|IA|KS|KY|LA|ME|MD|MA|MI|MN|MS|MO|MT|NE|NV|NH|NJ|NM|NY|NC|ND|OH|OK|OR|PA|RI|SC|SD|TN|TX|UT|VT|VA|WA|WV|WI|WY|DC)\s*$",
    )
    .unwrap()
});

static CA_PROVINCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i),\s*(ON|QC|BC|AB|MB|SK|NS|NB|NL|PE|NT|YT|NU)\s*$").unwrap()
});

static SHORT_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i),\s*(\w{2})\s*$").unwrap());

/// Country names and local spellings as they show up in listing
/// locations, in match-priority order
const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("united states", "US"),
    ("usa", "US"),
    ("united kingdom", "GB"),
    ("england", "GB"),
    ("scotland", "GB"),
    ("wales", "GB"),
    ("germany", "DE"),
    ("deutschland", "DE"),
    ("france", "FR"),
    ("italy", "IT"),
    ("italia", "IT"),
    ("spain", "ES"),
    ("netherlands", "NL"),
    ("holland", "NL"),
    ("belgium", "BE"),
    ("switzerland", "CH"),
    ("austria", "AT"),
    ("sweden", "SE"),
    ("norway", "NO"),
    ("denmark", "DK"),
    ("japan", "JP"),
    ("australia", "AU"),
    ("canada", "CA"),
    ("portugal", "PT"),
    ("ireland", "IE"),
    ("monaco", "MC"),
    ("luxembourg", "LU"),
    ("uae", "AE"),
    ("united arab emirates", "AE"),
    ("qatar", "QA"),
    ("singapore", "SG"),
    ("new zealand", "NZ"),
    ("south africa", "ZA"),
    ("brazil", "BR"),
    ("mexico", "MX"),
    ("china", "CN"),
    ("south korea", "KR"),
];

static COUNTRY_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    COUNTRY_NAMES
        .iter()
        .map(|(name, code)| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(name));
            (Regex::new(&pattern).unwrap(), *code)
        })
        .collect()
});

/// ISO 3166-1 alpha-2 country code for a free-form listing location.
///
/// Tries US state abbreviations, then Canadian provinces, then country
/// names, then the `", UK"` / `", US"` short codes. Returns `None` when
/// nothing matches rather than guessing.
pub fn extract_country_code(location: &str) -> Option<&'static str> {
    if location.trim().is_empty() {
        return None;
    }

    if US_STATE_RE.is_match(location) {
        return Some("US");
    }

    if CA_PROVINCE_RE.is_match(location) {
        return Some("CA");
    }

    for (pattern, code) in COUNTRY_PATTERNS.iter() {
        if pattern.is_match(location) {
            return Some(code);
        }
    }

    if let Some(caps) = SHORT_CODE_RE.captures(location) {
        match caps[1].to_lowercase().as_str() {
            "uk" => return Some("GB"),
            "us" => return Some("US"),
            _ => {}
        }
    }

    None
}
