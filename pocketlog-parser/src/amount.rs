//! Amount extraction from free text.
//!
//! Accepted: an optional currency symbol, digits, and an optional fraction of
//! one or two digits ("$45.50", "30", "€7.5"). Each numeric run is judged as
//! a whole, so "45.555" is rejected rather than read as 45.55, and scanning
//! moves on to the next run. Zero is not an amount.

use regex::Regex;
use std::sync::LazyLock;

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[$€£¥]?(?P<int>\d+)(?:\.(?P<frac>\d+))?").expect("amount pattern compiles")
});

/// An amount found in a message, with the exact text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct AmountMatch {
    pub value: f64,
    pub text: String,
}

/// First valid amount in `input`, if any.
pub fn extract_amount(input: &str) -> Option<f64> {
    find_amount(input).map(|m| m.value)
}

pub fn find_amount(input: &str) -> Option<AmountMatch> {
    for caps in AMOUNT_RE.captures_iter(input) {
        let int = &caps["int"];
        let number = match caps.name("frac") {
            Some(frac) if frac.as_str().len() > 2 => continue,
            Some(frac) => format!("{int}.{}", frac.as_str()),
            None => int.to_string(),
        };

        let Ok(value) = number.parse::<f64>() else { continue };
        if value <= 0.0 || !value.is_finite() {
            continue;
        }

        return Some(AmountMatch {
            value,
            text: caps[0].to_string(),
        });
    }
    None
}
