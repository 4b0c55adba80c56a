//! Display formatting for money and percentages

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places shown for money (cents)
const MONEY_DECIMAL_PLACES: u32 = 2;

/// Decimal places shown for percentages
const PERCENT_DECIMAL_PLACES: u32 = 1;

/// Format an amount as dollars with thousands separators
///
/// Rounds half away from zero to cents: `1234567.891` becomes `$1,234,567.89`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round_to(amount, MONEY_DECIMAL_PLACES);
    let digits = rounded.abs().to_string();

    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!("{}${}.{}", sign, group_thousands(int_part), frac_part)
}

/// Format a percentage with one decimal place (e.g. `42.5%`)
pub fn format_percent(percent: Decimal) -> String {
    format!("{}%", round_to(percent, PERCENT_DECIMAL_PLACES))
}

/// Round to `places` and pin the scale so trailing zeros are printed
fn round_to(value: Decimal, places: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(places);
    rounded
}

/// Insert a comma between every group of three integer digits
fn group_thousands(int_part: &str) -> String {
    let len = int_part.len();
    let mut grouped = String::with_capacity(len + len / 3);

    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_currency_small_values() {
        assert_eq!(format_currency(Decimal::ZERO), "$0.00");
        assert_eq!(format_currency(dec("5")), "$5.00");
        assert_eq!(format_currency(dec("75.5")), "$75.50");
        assert_eq!(format_currency(dec("999.99")), "$999.99");
    }

    #[test]
    fn test_format_currency_thousands_separators() {
        assert_eq!(format_currency(dec("1000")), "$1,000.00");
        assert_eq!(format_currency(dec("1234.5")), "$1,234.50");
        assert_eq!(format_currency(dec("1234567.891")), "$1,234,567.89");
        assert_eq!(format_currency(dec("100000")), "$100,000.00");
    }

    #[test]
    fn test_format_currency_rounds_half_away_from_zero() {
        assert_eq!(format_currency(dec("0.005")), "$0.01");
        assert_eq!(format_currency(dec("2.675")), "$2.68");
        assert_eq!(format_currency(dec("999.995")), "$1,000.00");
        assert_eq!(format_currency(dec("33.3333333")), "$33.33");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(dec("-1")), "-$1.00");
        assert_eq!(format_currency(dec("-1234.5")), "-$1,234.50");
        // Rounds to zero, so no sign
        assert_eq!(format_currency(dec("-0.001")), "$0.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec("42.44")), "42.4%");
        assert_eq!(format_percent(dec("42.45")), "42.5%");
        assert_eq!(format_percent(Decimal::ZERO), "0.0%");
        assert_eq!(format_percent(dec("100")), "100.0%");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("123456"), "123,456");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }
}
