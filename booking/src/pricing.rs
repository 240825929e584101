//! Price extraction from free-form price text.
//!
//! Event and extra prices are authored as text ("₹200", "Free",
//! "200/person"). The amount is the first run of ASCII digits; anything that
//! cannot be read degrades to zero instead of failing.

use crate::money::Rupees;
use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)] // literal pattern
static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[0-9]+").expect("digit pattern is valid"));

/// Reads a whole-rupee amount out of price text.
///
/// - absent, empty, or "free" in any case → 0
/// - otherwise the first contiguous run of ASCII digits
/// - no digits, or a run too large for `u64` → 0
///
/// Separators end the run, so `"$1,500"` reads as 1.
#[must_use]
pub fn extract_price(text: Option<&str>) -> Rupees {
    let Some(text) = text else {
        return Rupees::ZERO;
    };

    if text.is_empty() || text.eq_ignore_ascii_case("free") {
        return Rupees::ZERO;
    }

    DIGIT_RUN
        .find(text)
        .and_then(|run| run.as_str().parse::<u64>().ok())
        .map_or(Rupees::ZERO, Rupees::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(text: &str) -> u64 {
        extract_price(Some(text)).get()
    }

    #[test]
    fn free_and_missing_are_zero() {
        assert_eq!(price("Free"), 0);
        assert_eq!(price("free"), 0);
        assert_eq!(price("FREE"), 0);
        assert_eq!(price(""), 0);
        assert_eq!(extract_price(None).get(), 0);
    }

    #[test]
    fn reads_first_digit_run() {
        assert_eq!(price("₹250"), 250);
        assert_eq!(price("200/person"), 200);
        assert_eq!(price("Rs. 99 only, 2 for 150"), 99);
        assert_eq!(price("1500"), 1_500);
    }

    #[test]
    fn no_digits_is_zero() {
        assert_eq!(price("no digits here"), 0);
        assert_eq!(price("free entry"), 0);
    }

    #[test]
    fn grouping_separators_cut_the_amount() {
        // Lossy by design: the comma ends the first digit run
        assert_eq!(price("$1,500"), 1);
        assert_eq!(price("₹15,000"), 15);
    }

    #[test]
    fn oversized_runs_degrade_to_zero() {
        assert_eq!(price("99999999999999999999999"), 0);
    }

    #[test]
    fn non_ascii_digits_are_ignored() {
        // Devanagari digits are not read as an amount
        assert_eq!(price("₹२००"), 0);
    }
}
