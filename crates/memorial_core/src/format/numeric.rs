//! Lenient numeric parsing for user-typed and imported values.
//!
//! Malformed numbers degrade to `0.0` instead of failing: a cell such as
//! `10,5 m` or `abc` never rejects the surrounding row.

use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("valid number regex")
});

/// Parses the longest numeric prefix of `value` after leading whitespace.
///
/// Returns `0.0` when there is no numeric prefix or the result is not finite.
pub fn parse_lenient_f64(value: &str) -> f64 {
    LEADING_NUMBER_RE
        .find(value.trim_start())
        .and_then(|found| found.as_str().parse::<f64>().ok())
        .filter(|number| number.is_finite())
        .unwrap_or(0.0)
}

/// Like [`parse_lenient_f64`], but negative results also degrade to `0.0`.
pub fn parse_lenient_non_negative(value: &str) -> f64 {
    let number = parse_lenient_f64(value);
    if number < 0.0 {
        0.0
    } else {
        number
    }
}

/// True when `value` starts with something [`parse_lenient_f64`] would read.
pub fn has_numeric_prefix(value: &str) -> bool {
    LEADING_NUMBER_RE.is_match(value.trim_start())
}
