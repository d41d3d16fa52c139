use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::schedule::PaymentRow;
use crate::types::Money;

/// Payoff statistics for one schedule, optionally relative to a baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub total_interest_paid: Money,
    /// All cash paid, including extras and escrow add-ons.
    pub total_paid: Money,
    pub months_to_payoff: u32,
    /// Date of the final payment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
    /// Baseline interest minus this schedule's interest. Negative when worse.
    pub interest_saved: Money,
    /// Baseline length minus this schedule's length. Negative when longer.
    pub months_saved: i64,
}

/// Reduce a schedule to payoff statistics.
///
/// Savings are measured against `baseline` when given; without one the
/// schedule is its own baseline and both savings figures are zero.
pub fn summarize(schedule: &[PaymentRow], baseline: Option<&[PaymentRow]>) -> ScenarioSummary {
    let total_interest_paid = total_interest(schedule);
    let total_paid: Money = schedule.iter().map(|r| r.total_payment).sum();
    let months_to_payoff = schedule.len() as u32;

    let (interest_saved, months_saved) = match baseline {
        Some(base) => (
            total_interest(base) - total_interest_paid,
            base.len() as i64 - schedule.len() as i64,
        ),
        None => (Decimal::ZERO, 0),
    };

    ScenarioSummary {
        total_interest_paid,
        total_paid,
        months_to_payoff,
        payoff_date: schedule.last().map(|r| r.date),
        interest_saved,
        months_saved,
    }
}

fn total_interest(schedule: &[PaymentRow]) -> Money {
    schedule.iter().map(|r| r.interest_paid).sum()
}
