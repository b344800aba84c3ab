//! Extraction of structured values from free-text profile fields.
//!
//! Every helper returns `None` instead of failing so that a malformed field only zeroes the
//! sub-score that depends on it.

use once_cell::sync::Lazy;
use regex::Regex;

/// `<number> years` narrative pattern, also accepting the Portuguese `anos`.
static EXPERIENCE_YEARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*\+?\s*(?:years?|yrs?|anos?)\b").expect("invalid experience regex")
});

/// First numeric run of a currency string, digits with `.` grouping and an optional `,` decimal.
static CURRENCY_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d[\d.]*(?:,\d+)?").expect("invalid currency regex"));

/// Extract the number of years of experience from a narrative such as "7 years in backend".
pub fn parse_experience_years(narrative: &str) -> Option<u32> {
    EXPERIENCE_YEARS
        .captures(narrative)
        .and_then(|captures| captures.get(1))
        .and_then(|years| years.as_str().parse().ok())
}

/// Parse a currency formatted amount ("R$ 8.500,00" -> 8500.0). The first number wins for ranges.
pub fn parse_currency(raw: &str) -> Option<f64> {
    let amount = CURRENCY_AMOUNT.find(raw)?;
    let normalized = amount
        .as_str()
        .trim_end_matches('.')
        .replace('.', "")
        .replace(',', ".");
    normalized.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Split a requirements text on commas and whitespace, keeping tokens longer than two characters.
pub fn tokenize_requirements(requirements: &str) -> Vec<String> {
    requirements
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|token| token.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

/// Case-insensitive substring overlap in either direction.
pub fn overlaps(left: &str, right: &str) -> bool {
    let left = left.trim().to_lowercase();
    let right = right.trim().to_lowercase();
    if left.is_empty() || right.is_empty() {
        return false;
    }
    left.contains(&right) || right.contains(&left)
}
