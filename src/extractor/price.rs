//! Price parsing for the raw price text of a listing page

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

static CURRENCY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\d+)").expect("currency pattern is a valid regex"));

/// Parse the first `$<digits>` substring of `raw` as a price.
///
/// Later amounts in the same text are ignored. No match means no price.
#[must_use]
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let digits = CURRENCY_PATTERN.captures(raw)?.get(1)?.as_str();
    Decimal::from_str(digits).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_amount() {
        assert_eq!(parse_price("$30"), Some(Decimal::from(30)));
    }

    #[test]
    fn first_amount_wins() {
        assert_eq!(parse_price("Was $80 Now $45"), Some(Decimal::from(80)));
        assert_eq!(parse_price("$45 $80"), Some(Decimal::from(45)));
    }

    #[test]
    fn surrounding_text_is_ignored() {
        assert_eq!(parse_price("Price: $120 + shipping"), Some(Decimal::from(120)));
    }

    #[test]
    fn no_currency_means_absent() {
        assert_eq!(parse_price("Not for sale"), None);
        assert_eq!(parse_price("$"), None);
        assert_eq!(parse_price(""), None);
    }
}
