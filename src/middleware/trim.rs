use once_cell::sync::Lazy;
use regex::Regex;

/// Body styles in match-priority order. Multi-word styles come first so
/// "Shooting Brake" wins over any later single word.
const BODY_STYLES: &[&str] = &[
    "Shooting Brake",
    "Cabriolet",
    "Convertible",
    "Roadster",
    "Targa",
    "Speedster",
    "Spyder",
    "Spider",
    "Berlinetta",
    "Sedan",
    "Coupe",
    "Coupé",
    "Wagon",
    "Estate",
    "Hatchback",
    "SUV",
    "Truck",
    "Van",
    "Pickup",
];

/// Trim designations in match-priority order. Longer variants precede
/// their prefixes ("Carrera 4S" before "Carrera S" before "Carrera") so
/// the most specific designation wins.
const TRIM_KEYWORDS: &[&str] = &[
    "GT3 RS",
    "GT2 RS",
    "GT3",
    "GT2",
    "GT4",
    "GTS",
    "Turbo S",
    "Turbo",
    "Carrera 4S",
    "Carrera 4",
    "Carrera S",
    "Carrera",
    "Competition",
    "CSL",
    "CS",
    "AMG",
    "M Sport",
    "S-Line",
    "R-Line",
    "Superleggera",
    "Stradale",
    "Speciale",
    "Pista",
    "Scuderia",
    "Wildtrak",
    "Raptor",
    "TRD Pro",
    "Trail Boss",
    "RS",
    "S",
    "R",
    "Touring",
    "Sport",
    "Limited",
    "Premium",
    "Luxury",
];

static BODY_STYLE_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    BODY_STYLES
        .iter()
        .map(|style| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(style));
            (Regex::new(&pattern).unwrap(), *style)
        })
        .collect()
});

static TRIM_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    TRIM_KEYWORDS
        .iter()
        .map(|keyword| {
            // any run of whitespace may separate the words of a keyword
            let escaped = regex::escape(keyword).replace(' ', r"\s+");
            let pattern = format!(r"(?i)\b{}\b", escaped);
            (Regex::new(&pattern).unwrap(), *keyword)
        })
        .collect()
});

/// Trim and body style recognized in a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrimInfo {
    pub trim: Option<&'static str>,
    pub body_style: Option<&'static str>,
}

/// Keyword-match trim and body style. Trim is only trusted from the
/// title; body style may also come from the description. Matches return
/// the canonical casing from the keyword tables.
pub fn extract_trim_and_body_style(title: &str, description: Option<&str>) -> TrimInfo {
    let combined = match description {
        Some(description) => format!("{} {}", title, description),
        None => title.to_string(),
    };

    let body_style = BODY_STYLE_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(&combined))
        .map(|(_, style)| *style);

    let trim = TRIM_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(title))
        .map(|(_, keyword)| *keyword);

    TrimInfo { trim, body_style }
}
