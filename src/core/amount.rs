//! Amount input validation and conversion rounding

use anyhow::anyhow;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Text typed into the amount field: empty, or ASCII digits only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountInput(String);

impl AmountInput {
    /// Accepts the raw text if it is empty or a non-negative integer string.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.chars().all(|c| c.is_ascii_digit()) {
            Some(AmountInput(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0.chars().any(|c| c != '0')
    }

    /// Numeric value of the input; empty text counts as zero.
    pub fn value(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        // Digit-only strings always parse, very long ones saturate to infinity.
        self.0.parse().unwrap_or(f64::INFINITY)
    }
}

impl FromStr for AmountInput {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AmountInput::parse(s).ok_or_else(|| anyhow!("Invalid amount: {}", s))
    }
}

impl Display for AmountInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Multiplies `amount` by `rate` and renders the product with two decimals.
///
/// Rounding works on the exact binary value of the product, so `1.005`
/// (stored as 1.00499...) becomes `1.00`. Products outside the decimal range
/// fall back to float formatting.
pub fn convert(rate: f64, amount: &AmountInput) -> String {
    let product = rate * amount.value();
    match Decimal::from_f64_retain(product) {
        Some(d) => {
            let rounded = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            format!("{rounded:.2}")
        }
        None => format!("{product:.2}"),
    }
}

/// Formats a converted value the way the result panel shows it.
pub fn format_converted(value: impl Display, target: impl Display) -> String {
    format!("{value} {target}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_validation() {
        for accepted in ["", "0", "7", "100", "0042", "123456789012345678901234567890"] {
            let amount = AmountInput::parse(accepted);
            assert_eq!(amount.map(|a| a.0), Some(accepted.to_string()));
        }

        for rejected in ["-1", "1.5", "1e3", " 12", "12 ", "abc", "+5", "١٢"] {
            assert!(AmountInput::parse(rejected).is_none(), "{rejected:?} accepted");
        }
    }

    #[test]
    fn test_amount_value() {
        assert!(!AmountInput::default().is_positive());
        assert_eq!(AmountInput::default().value(), 0.0);
        assert!(!AmountInput::parse("000").unwrap().is_positive());
        assert!(AmountInput::parse("010").unwrap().is_positive());
        assert_eq!(AmountInput::parse("010").unwrap().value(), 10.0);
    }

    #[test]
    fn test_convert_rounds_to_two_places() {
        let hundred = AmountInput::parse("100").unwrap();
        assert_eq!(format_converted(convert(84.1234, &hundred), "NPR"), "8412.34 NPR");

        let three = AmountInput::parse("3").unwrap();
        assert_eq!(format_converted(convert(0.25, &three), "USD"), "0.75 USD");

        let five = AmountInput::parse("5").unwrap();
        assert_eq!(format_converted(convert(2.0, &five), "EUR"), "10.00 EUR");
    }

    #[test]
    fn test_convert_rounds_binary_value() {
        let one = AmountInput::parse("1").unwrap();
        // 1.005 is stored just below the midpoint.
        assert_eq!(convert(1.005, &one), "1.00");
        // 0.125 is an exact tie and rounds away from zero.
        assert_eq!(convert(0.125, &one), "0.13");
    }

    #[test]
    fn test_convert_empty_amount_is_zero() {
        assert_eq!(format_converted(convert(88.5, &AmountInput::default()), "NPR"), "0.00 NPR");
    }

    #[test]
    fn test_convert_beyond_decimal_range() {
        let big = AmountInput::parse("100000000000000000000000000000").unwrap();
        let converted = convert(1.0, &big);
        assert!(converted.ends_with(".00"), "got {converted}");
        assert!(converted.len() >= 32, "got {converted}");

        let huge = AmountInput::parse(&"9".repeat(400)).unwrap();
        assert_eq!(convert(1.5, &huge), "inf");
    }
}
