//! Month-by-month amortization ledger.
//!
//! A single forward pass over the term. Extra principal is clamped row by row
//! so an oversized lump sum pays the loan off instead of driving the balance
//! negative. Nothing is rounded to cents; rows carry full decimal precision.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::loan::{LoanParameters, ScenarioOverride};
use crate::time_value::{level_payment, monthly_rate};
use crate::types::Money;

/// Balance at or below which the loan is considered fully paid.
pub const BALANCE_EPSILON: Decimal = dec!(0.01);

/// One elapsed payment period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRow {
    /// 1-based, contiguous.
    pub period: u32,
    pub date: NaiveDate,
    /// Level principal and interest payment, constant across the schedule.
    pub base_payment: Money,
    /// Extra principal actually absorbed this period, after clamping.
    pub extra_payment: Money,
    /// `base_payment + extra_payment + fixed_monthly_add_on`.
    pub total_payment: Money,
    pub principal_paid: Money,
    pub interest_paid: Money,
    /// Balance after this payment, never negative.
    pub remaining_balance: Money,
}

/// Ordered payment rows, at most `term_months` long.
pub type Schedule = Vec<PaymentRow>;

/// Generate the amortization schedule for `loan`, optionally with extra
/// principal from `overrides`.
///
/// Stops at the end of the term or as soon as the balance falls to
/// [`BALANCE_EPSILON`], whichever comes first.
pub fn generate_schedule(loan: &LoanParameters, overrides: Option<&ScenarioOverride>) -> Schedule {
    let base_payment = level_payment(loan.principal, loan.annual_rate_percent, loan.term_months);
    let rate = monthly_rate(loan.annual_rate_percent);

    let mut schedule: Schedule = Vec::with_capacity(loan.term_months as usize);
    let mut balance = loan.principal;

    for period in 1..=loan.term_months {
        if balance <= BALANCE_EPSILON {
            break;
        }

        let interest_paid = balance * rate;
        let scheduled_principal = base_payment - interest_paid;
        let requested_extra = overrides
            .map(|o| o.requested_extra(period))
            .unwrap_or(Decimal::ZERO);

        // Never pay more principal than is outstanding
        let principal_paid = (scheduled_principal + requested_extra).min(balance);
        let extra_payment = principal_paid - scheduled_principal;

        balance -= principal_paid;
        let remaining_balance = balance.max(Decimal::ZERO);

        schedule.push(PaymentRow {
            period,
            date: payment_date(loan.start_date, period),
            base_payment,
            extra_payment,
            total_payment: base_payment + extra_payment + loan.fixed_monthly_add_on,
            principal_paid,
            interest_paid,
            remaining_balance,
        });
    }

    if (schedule.len() as u32) < loan.term_months {
        log::debug!(
            "schedule paid off after {} of {} periods",
            schedule.len(),
            loan.term_months
        );
    }

    schedule
}

/// Calendar date of `period`: the start date advanced by `period - 1` months,
/// clamped to the end of shorter months.
pub fn payment_date(start: NaiveDate, period: u32) -> NaiveDate {
    start
        .checked_add_months(Months::new(period.saturating_sub(1)))
        .unwrap_or(NaiveDate::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
