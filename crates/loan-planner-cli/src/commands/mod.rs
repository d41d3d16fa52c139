pub mod compare;
pub mod payment;
pub mod schedule;
pub mod state;

use clap::Args;
use rust_decimal::Decimal;

use loan_planner_core::amortization::loan::{LoanParameters, LumpSum, ScenarioOverride};
use loan_planner_core::amortization::scenarios::Scenario;
use loan_planner_core::persistence::state::{current_month, parse_start_month};

/// Name given to a scenario built from `--extra` / `--lump` flags.
pub const CUSTOM_SCENARIO_NAME: &str = "Custom";

/// Loan terms given as flags
#[derive(Args, Debug, Clone, Default)]
pub struct LoanFlags {
    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Nominal annual rate in percent (e.g. 6.5 for 6.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months (e.g. 360 for 30 years)
    #[arg(long)]
    pub term: Option<u32>,

    /// Month of the first payment, YYYY-MM (defaults to the current month)
    #[arg(long)]
    pub start: Option<String>,

    /// Fixed monthly add-on such as property tax and insurance
    #[arg(long)]
    pub add_on: Option<Decimal>,
}

impl LoanFlags {
    pub fn to_parameters(&self) -> Result<LoanParameters, Box<dyn std::error::Error>> {
        let start_date = match self.start {
            Some(ref raw) => parse_start_month(raw)?,
            None => current_month(),
        };
        Ok(LoanParameters {
            principal: self
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: self.rate.ok_or("--rate is required (or provide --input)")?,
            term_months: self.term.ok_or("--term is required (or provide --input)")?,
            start_date,
            fixed_monthly_add_on: self.add_on.unwrap_or(Decimal::ZERO),
        })
    }

    /// `loan` with every flag that was given applied on top.
    pub fn apply_to(&self, loan: &LoanParameters) -> Result<LoanParameters, Box<dyn std::error::Error>> {
        let start_date = match self.start {
            Some(ref raw) => parse_start_month(raw)?,
            None => loan.start_date,
        };
        Ok(LoanParameters {
            principal: self.principal.unwrap_or(loan.principal),
            annual_rate_percent: self.rate.unwrap_or(loan.annual_rate_percent),
            term_months: self.term.unwrap_or(loan.term_months),
            start_date,
            fixed_monthly_add_on: self.add_on.unwrap_or(loan.fixed_monthly_add_on),
        })
    }
}

/// Extra principal given as flags
#[derive(Args, Debug, Clone, Default)]
pub struct ExtraFlags {
    /// Extra principal paid every month
    #[arg(long)]
    pub extra: Option<Decimal>,

    /// One-time extra principal as PERIOD:AMOUNT (repeatable, e.g. --lump 12:5000)
    #[arg(long = "lump", value_parser = parse_lump_sum)]
    pub lump_sums: Vec<LumpSum>,
}

impl ExtraFlags {
    pub fn is_empty(&self) -> bool {
        self.extra.is_none() && self.lump_sums.is_empty()
    }

    pub fn to_override(&self) -> Result<ScenarioOverride, Box<dyn std::error::Error>> {
        Ok(ScenarioOverride::from_lump_sums(
            self.extra.unwrap_or(Decimal::ZERO),
            self.lump_sums.clone(),
        )?)
    }
}

/// A named scenario given as flags
#[derive(Args, Debug, Clone)]
pub struct ScenarioFlags {
    /// Scenario name
    #[arg(long)]
    pub name: String,

    #[command(flatten)]
    pub extras: ExtraFlags,
}

impl ScenarioFlags {
    pub fn to_scenario(&self) -> Result<Scenario, Box<dyn std::error::Error>> {
        Ok(Scenario::new(self.name.clone(), self.extras.to_override()?))
    }
}

/// Parse `PERIOD:AMOUNT`.
pub fn parse_lump_sum(raw: &str) -> Result<LumpSum, String> {
    let (period, amount) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected PERIOD:AMOUNT, got '{}'", raw))?;
    let period: u32 = period
        .trim()
        .parse()
        .map_err(|e| format!("invalid period '{}': {}", period, e))?;
    let amount: Decimal = amount
        .trim()
        .parse()
        .map_err(|e| format!("invalid amount '{}': {}", amount, e))?;
    Ok(LumpSum { period, amount })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_lump_sum() {
        let lump = parse_lump_sum("12:5000.50").unwrap();
        assert_eq!(lump.period, 12);
        assert_eq!(lump.amount, dec!(5000.50));
        assert!(parse_lump_sum("12").is_err());
        assert!(parse_lump_sum("x:5").is_err());
        assert!(parse_lump_sum("3:abc").is_err());
    }

    #[test]
    fn test_flags_merge_over_saved_loan() {
        let saved = LoanFlags {
            principal: Some(dec!(200_000)),
            rate: Some(dec!(5)),
            term: Some(360),
            start: Some("2025-02".into()),
            add_on: None,
        }
        .to_parameters()
        .unwrap();

        let edited = LoanFlags {
            rate: Some(dec!(4.5)),
            ..Default::default()
        }
        .apply_to(&saved)
        .unwrap();

        assert_eq!(edited.annual_rate_percent, dec!(4.5));
        assert_eq!(edited.principal, dec!(200_000));
        assert_eq!(edited.start_date, saved.start_date);
    }

    #[test]
    fn test_missing_required_flag() {
        let err = LoanFlags {
            principal: Some(dec!(1000)),
            ..Default::default()
        }
        .to_parameters()
        .unwrap_err();
        assert!(err.to_string().contains("--rate"));
    }
}
