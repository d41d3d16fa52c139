use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::types::{Money, Percent, Rate};

const PERCENT_DIVISOR: Decimal = dec!(100);
const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Monthly periodic rate from a nominal annual percentage (6.5 -> 0.0054166...).
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / PERCENT_DIVISOR / MONTHS_PER_YEAR
}

/// Level monthly payment that fully amortizes `principal` over `term_months`
/// equal payments at a nominal annual rate of `annual_rate_percent`.
///
/// A zero rate falls back to straight-line repayment, since the annuity
/// formula `P * r(1+r)^N / ((1+r)^N - 1)` has a removable singularity there.
///
/// Inputs are assumed validated by the caller. A zero term is treated as a
/// single period rather than dividing by zero.
pub fn level_payment(principal: Money, annual_rate_percent: Percent, term_months: u32) -> Money {
    let term_months = term_months.max(1);
    let periods = Decimal::from(term_months);
    let rate = monthly_rate(annual_rate_percent);

    if rate.is_zero() {
        return principal / periods;
    }

    // Growth factor overflows only for absurd rate/term combinations, where the
    // payment converges to interest-only on the full principal.
    let growth = match (Decimal::ONE + rate).checked_powu(u64::from(term_months)) {
        Some(g) => g,
        None => return principal.checked_mul(rate).unwrap_or(Decimal::MAX),
    };

    // r / (1 - (1+r)^-N) is at most 1 + r, so scaling the principal last
    // keeps every intermediate in range.
    let discounted = Decimal::ONE - Decimal::ONE / growth;
    if discounted.is_zero() {
        return principal / periods;
    }

    principal
        .checked_mul(rate / discounted)
        .unwrap_or(Decimal::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_rate_from_percent() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
        assert_eq!(monthly_rate(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_level_payment_thirty_year_mortgage() {
        let payment = level_payment(dec!(300_000), dec!(6.5), 360);
        // Standard 30y fixed at 6.5%: 1,896.20 per month
        assert!(
            (payment - dec!(1896.20)).abs() < dec!(0.01),
            "Expected ~1896.20, got {}",
            payment
        );
    }

    #[test]
    fn test_level_payment_zero_rate_is_straight_line() {
        let payment = level_payment(dec!(120_000), Decimal::ZERO, 240);
        assert_eq!(payment, dec!(500));
    }

    #[test]
    fn test_level_payment_single_period_repays_with_interest() {
        // One period at 12%/yr: principal plus one month of interest
        let payment = level_payment(dec!(1000), dec!(12), 1);
        assert!((payment - dec!(1010)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_level_payment_zero_term_treated_as_single_period() {
        assert_eq!(level_payment(dec!(500), Decimal::ZERO, 0), dec!(500));
    }

    #[test]
    fn test_level_payment_covers_principal() {
        for (principal, rate, term) in [
            (dec!(250_000), dec!(3.25), 180u32),
            (dec!(18_500), dec!(9.9), 60),
            (dec!(1_000_000), dec!(0.125), 480),
        ] {
            let payment = level_payment(principal, rate, term);
            assert!(
                payment * Decimal::from(term) >= principal,
                "{} x {} should cover {}",
                payment,
                term,
                principal
            );
        }
    }

    #[test]
    fn test_level_payment_zero_principal() {
        assert_eq!(level_payment(Decimal::ZERO, dec!(5), 360), Decimal::ZERO);
    }

    #[test]
    fn test_level_payment_steep_rate_long_term() {
        // (1 + 100%/12)^600 is ~1e21; a multi-billion principal must not overflow
        let principal = dec!(2_000_000_000);
        let payment = level_payment(principal, dec!(100), 600);
        let interest_only = principal * monthly_rate(dec!(100));
        assert!(payment >= interest_only);
        assert!(payment - interest_only < dec!(0.01), "got {}", payment);
    }

    #[test]
    fn test_level_payment_rate_above_hundred_percent() {
        let payment = level_payment(dec!(300_000), dec!(250), 300);
        let interest_only = dec!(300_000) * monthly_rate(dec!(250));
        assert!(payment >= interest_only);
        assert!(payment - interest_only < dec!(0.01));
    }
}
