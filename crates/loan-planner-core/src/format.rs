//! Presentation helpers for currency amounts, payment months and payoff
//! durations. Pure string formatting; nothing here feeds back into the model.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::Money;

const CURRENCY_SYMBOL: &str = "$";

/// Whole currency units with thousands separators: `$300,000`.
pub fn format_currency(amount: Money) -> String {
    format_money(amount, 0)
}

/// Two decimal places with thousands separators: `$1,896.20`.
pub fn format_currency_cents(amount: Money) -> String {
    format_money(amount, 2)
}

/// Abbreviated month and year: `Jan 2025`.
pub fn format_month_year(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// Render a month count as years and months.
///
/// Under a year reads `7 months`, whole years read `15 years`, anything else
/// is compact: `12y 4m`.
pub fn format_duration(months: u32) -> String {
    let years = months / 12;
    let rem = months % 12;
    match (years, rem) {
        (0, 1) => "1 month".to_string(),
        (0, m) => format!("{} months", m),
        (1, 0) => "1 year".to_string(),
        (y, 0) => format!("{} years", y),
        (y, m) => format!("{}y {}m", y, m),
    }
}

fn format_money(amount: Money, dp: u32) -> String {
    let rounded = amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.*}", dp as usize, rounded.abs());

    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(f) => format!("{}{}{}.{}", sign, CURRENCY_SYMBOL, grouped, f),
        None => format!("{}{}{}", sign, CURRENCY_SYMBOL, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_whole_units() {
        assert_eq!(format_currency(dec!(300000)), "$300,000");
        assert_eq!(format_currency(dec!(1896.2040)), "$1,896");
        assert_eq!(format_currency(dec!(999.5)), "$1,000");
        assert_eq!(format_currency(dec!(12)), "$12");
        assert_eq!(format_currency(Decimal::ZERO), "$0");
    }

    #[test]
    fn test_currency_cents() {
        assert_eq!(format_currency_cents(dec!(1896.2040)), "$1,896.20");
        assert_eq!(format_currency_cents(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_currency_cents(dec!(5)), "$5.00");
    }

    #[test]
    fn test_currency_negative() {
        assert_eq!(format_currency(dec!(-1234.4)), "-$1,234");
        assert_eq!(format_currency_cents(dec!(-0.5)), "-$0.50");
    }

    #[test]
    fn test_negative_rounding_to_zero_has_no_sign() {
        assert_eq!(format_currency(dec!(-0.2)), "$0");
    }

    #[test]
    fn test_month_year() {
        let d = NaiveDate::from_ymd_opt(2031, 9, 1).unwrap();
        assert_eq!(format_month_year(d), "Sep 2031");
    }

    #[test]
    fn test_duration() {
        assert_eq!(format_duration(0), "0 months");
        assert_eq!(format_duration(1), "1 month");
        assert_eq!(format_duration(7), "7 months");
        assert_eq!(format_duration(12), "1 year");
        assert_eq!(format_duration(360), "30 years");
        assert_eq!(format_duration(148), "12y 4m");
        assert_eq!(format_duration(13), "1y 1m");
    }
}
