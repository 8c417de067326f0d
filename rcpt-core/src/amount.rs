//! Total amount parsing.
//!
//! Accepted shapes:
//!   123.45
//!   $17,830.81
//!   USD 99
//!
//! Every comma is read as a thousands separator.

use once_cell::sync::Lazy;
use regex::Regex;

static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:[$€£¥₹]|[A-Z]{3})?\s*",
        r"(?P<num>\d[\d,]*(?:\.\d+)?|\.\d+)$"
    ))
    .expect("amount regex")
});

/// Parse a total after stripping one leading currency symbol/code and
/// thousands separators. Returns `None` for anything that is not a finite,
/// non-negative decimal.
pub fn parse_amount(value: &str) -> Option<f64> {
    let caps = AMOUNT_RE.captures(value.trim())?;
    let digits = caps["num"].replace(',', "");
    let amount: f64 = digits.parse().ok()?;
    amount.is_finite().then_some(amount)
}
