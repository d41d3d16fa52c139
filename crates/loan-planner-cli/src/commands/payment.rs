use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use loan_planner_core::amortization::loan::LoanParameters;
use loan_planner_core::amortization::scenarios::validate_loan;
use loan_planner_core::persistence::state::current_month;
use loan_planner_core::time_value::level_payment;

/// Arguments for the level payment calculation
#[derive(Args)]
pub struct PaymentArgs {
    /// Amount borrowed
    #[arg(long)]
    pub principal: Decimal,

    /// Nominal annual rate in percent (e.g. 6.5 for 6.5%)
    #[arg(long)]
    pub rate: Decimal,

    /// Term in months
    #[arg(long)]
    pub term: u32,

    /// Fixed monthly add-on such as property tax and insurance
    #[arg(long, default_value = "0")]
    pub add_on: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
struct PaymentOutput {
    monthly_payment: Decimal,
    fixed_monthly_add_on: Decimal,
    total_monthly_payment: Decimal,
    total_of_payments: Decimal,
    total_interest: Decimal,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = LoanParameters {
        principal: args.principal,
        annual_rate_percent: args.rate,
        term_months: args.term,
        start_date: current_month(),
        fixed_monthly_add_on: args.add_on,
    };
    validate_loan(&loan)?;

    let monthly_payment = level_payment(loan.principal, loan.annual_rate_percent, loan.term_months);
    let total_of_payments = monthly_payment * Decimal::from(loan.term_months);

    let output = PaymentOutput {
        monthly_payment: monthly_payment.round_dp(2),
        fixed_monthly_add_on: loan.fixed_monthly_add_on,
        total_monthly_payment: (monthly_payment + loan.fixed_monthly_add_on).round_dp(2),
        total_of_payments: total_of_payments.round_dp(2),
        total_interest: (total_of_payments - loan.principal).round_dp(2),
    };
    Ok(serde_json::to_value(output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn args(principal: Decimal, rate: Decimal, term: u32) -> PaymentArgs {
        PaymentArgs {
            principal,
            rate,
            term,
            add_on: Decimal::ZERO,
        }
    }

    #[test]
    fn test_thirty_year_payment() {
        let value = run_payment(args(dec!(300_000), dec!(6.5), 360)).unwrap();
        assert_eq!(value["monthly_payment"], serde_json::json!("1896.20"));
    }

    #[test]
    fn test_rejects_rate_and_term_beyond_limits() {
        assert!(run_payment(args(dec!(300_000), dec!(250), 300)).is_err());
        assert!(run_payment(args(dec!(300_000), dec!(6.5), 601)).is_err());
        assert!(run_payment(args(dec!(300_000), dec!(6.5), 0)).is_err());
        assert!(run_payment(args(Decimal::ZERO, dec!(6.5), 360)).is_err());
    }

    #[test]
    fn test_steepest_accepted_terms() {
        let value = run_payment(args(dec!(2_000_000_000), dec!(100), 600)).unwrap();
        assert!(value["monthly_payment"].is_string());
    }
}
