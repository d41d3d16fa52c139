//! Persisted planner state: the loan terms and the user's scenario list,
//! stored as one JSON blob under [`STATE_KEY`].
//!
//! The start month is kept as a `YYYY-MM` string so a hand-edited or stale
//! blob still loads; an unparseable month falls back to the current month.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::loan::LoanParameters;
use crate::amortization::scenarios::{
    validate_loan, validate_scenario, LoanAnalysisInput, ScenarioBook,
};
use crate::error::LoanPlannerError;
use crate::persistence::store::KeyValueStore;
use crate::types::{Money, Percent};
use crate::LoanPlannerResult;

/// Storage key for the planner blob.
pub const STATE_KEY: &str = "loan-planner-state";

const DEFAULT_PRINCIPAL: Money = dec!(300_000);
const DEFAULT_RATE_PERCENT: Percent = dec!(6.5);
const DEFAULT_TERM_MONTHS: u32 = 360;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Loan terms as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredLoan {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub term_months: u32,
    /// Month of the first payment, `YYYY-MM`.
    pub start_month: String,
    #[serde(default)]
    pub fixed_monthly_add_on: Money,
}

impl StoredLoan {
    pub fn from_parameters(loan: &LoanParameters) -> Self {
        Self {
            principal: loan.principal,
            annual_rate_percent: loan.annual_rate_percent,
            term_months: loan.term_months,
            start_month: loan.start_date.format("%Y-%m").to_string(),
            fixed_monthly_add_on: loan.fixed_monthly_add_on,
        }
    }

    /// Loan parameters, using `fallback_start` when the stored month is unreadable.
    pub fn to_parameters(&self, fallback_start: NaiveDate) -> LoanParameters {
        let start_date = match parse_start_month(&self.start_month) {
            Ok(date) => date,
            Err(e) => {
                log::warn!("{}; starting from {} instead", e, fallback_start);
                fallback_start
            }
        };
        LoanParameters {
            principal: self.principal,
            annual_rate_percent: self.annual_rate_percent,
            term_months: self.term_months,
            start_date,
            fixed_monthly_add_on: self.fixed_monthly_add_on,
        }
    }
}

/// Everything the planner persists between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerState {
    pub loan: StoredLoan,
    #[serde(default)]
    pub scenarios: ScenarioBook,
}

impl Default for PlannerState {
    fn default() -> Self {
        Self {
            loan: StoredLoan {
                principal: DEFAULT_PRINCIPAL,
                annual_rate_percent: DEFAULT_RATE_PERCENT,
                term_months: DEFAULT_TERM_MONTHS,
                start_month: current_month().format("%Y-%m").to_string(),
                fixed_monthly_add_on: Decimal::ZERO,
            },
            scenarios: ScenarioBook::new(),
        }
    }
}

impl PlannerState {
    pub fn with_loan(&self, loan: &LoanParameters) -> Self {
        Self {
            loan: StoredLoan::from_parameters(loan),
            scenarios: self.scenarios.clone(),
        }
    }

    pub fn with_scenarios(&self, scenarios: ScenarioBook) -> Self {
        Self {
            loan: self.loan.clone(),
            scenarios,
        }
    }

    /// Loan parameters, defaulting an unreadable start month to this month.
    pub fn loan_parameters(&self) -> LoanParameters {
        self.loan.to_parameters(current_month())
    }

    /// Reject loan terms or scenarios that analysis would refuse.
    pub fn validate(&self) -> LoanPlannerResult<()> {
        validate_loan(&self.loan_parameters())?;
        for (index, scenario) in self.scenarios.iter().enumerate() {
            validate_scenario(index, scenario)?;
        }
        Ok(())
    }

    pub fn analysis_input(&self, include_schedules: bool) -> LoanAnalysisInput {
        LoanAnalysisInput {
            loan: self.loan_parameters(),
            scenarios: self.scenarios.clone(),
            include_schedules,
        }
    }
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Load the planner blob, or the default state when none has been saved.
pub fn load_state<S: KeyValueStore + ?Sized>(store: &S) -> LoanPlannerResult<PlannerState> {
    match store.fetch(STATE_KEY)? {
        Some(blob) => Ok(serde_json::from_str(&blob)?),
        None => {
            log::debug!("no saved state under '{}', using defaults", STATE_KEY);
            Ok(PlannerState::default())
        }
    }
}

/// Persist `state`, leaving the stored blob untouched if it fails validation.
pub fn save_state<S: KeyValueStore + ?Sized>(
    store: &mut S,
    state: &PlannerState,
) -> LoanPlannerResult<()> {
    state.validate()?;
    let blob = serde_json::to_string(state)?;
    store.store(STATE_KEY, &blob)
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Parse a stored start month. Accepts `YYYY-MM` or a full `YYYY-MM-DD`,
/// normalized to the first of the month.
pub fn parse_start_month(raw: &str) -> LoanPlannerResult<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map(first_of_month))
        .map_err(|e| LoanPlannerError::DateError(format!("Invalid start month '{}': {}", raw, e)))
}

/// First day of the current UTC month.
pub fn current_month() -> NaiveDate {
    first_of_month(Utc::now().date_naive())
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::loan::{LumpSum, ScenarioOverride};
    use crate::amortization::scenarios::Scenario;
    use crate::persistence::store::MemoryStore;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_start_month_formats() {
        let march = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(parse_start_month("2026-03").unwrap(), march);
        assert_eq!(parse_start_month(" 2026-03 ").unwrap(), march);
        assert_eq!(parse_start_month("2026-03-17").unwrap(), march);
        assert!(matches!(
            parse_start_month("March 2026"),
            Err(LoanPlannerError::DateError(_))
        ));
    }

    #[test]
    fn test_unreadable_start_month_falls_back() {
        let stored = StoredLoan {
            principal: dec!(200_000),
            annual_rate_percent: dec!(5),
            term_months: 180,
            start_month: "not-a-date".into(),
            fixed_monthly_add_on: Decimal::ZERO,
        };
        let fallback = NaiveDate::from_ymd_opt(2027, 6, 1).unwrap();
        assert_eq!(stored.to_parameters(fallback).start_date, fallback);
    }

    #[test]
    fn test_default_state_when_nothing_saved() {
        let store = MemoryStore::new();
        let state = load_state(&store).unwrap();
        assert_eq!(state.loan.principal, DEFAULT_PRINCIPAL);
        assert_eq!(state.loan.term_months, 360);
        assert!(state.scenarios.is_empty());
        assert_eq!(state.loan_parameters().start_date.day(), 1);
    }

    #[test]
    fn test_save_then_load() {
        let loan = LoanParameters {
            principal: dec!(410_000),
            annual_rate_percent: dec!(5.875),
            term_months: 300,
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            fixed_monthly_add_on: dec!(512.40),
        };
        let scenarios = ScenarioBook::new().appended(Scenario::new(
            "Tax refund",
            ScenarioOverride::from_lump_sums(
                dec!(150),
                vec![
                    LumpSum { period: 16, amount: dec!(3000) },
                    LumpSum { period: 4, amount: dec!(2500) },
                ],
            )
            .unwrap(),
        ));
        let state = PlannerState::default()
            .with_loan(&loan)
            .with_scenarios(scenarios);

        let mut store = MemoryStore::new();
        save_state(&mut store, &state).unwrap();
        let loaded = load_state(&store).unwrap();

        assert_eq!(loaded, state);
        assert_eq!(loaded.loan_parameters(), loan);
    }

    #[test]
    fn test_stored_blob_shape() {
        let state = PlannerState::default().with_scenarios(ScenarioBook::new().appended(
            Scenario::new(
                "Bonus",
                ScenarioOverride::from_lump_sums(
                    Decimal::ZERO,
                    vec![
                        LumpSum { period: 24, amount: dec!(1000) },
                        LumpSum { period: 12, amount: dec!(1000) },
                    ],
                )
                .unwrap(),
            ),
        ));
        let mut store = MemoryStore::new();
        save_state(&mut store, &state).unwrap();

        let blob: serde_json::Value =
            serde_json::from_str(&store.fetch(STATE_KEY).unwrap().unwrap()).unwrap();
        let lumps = &blob["scenarios"][0]["overrides"]["lump_sums"];
        assert_eq!(lumps[0]["period"], 12);
        assert_eq!(lumps[1]["period"], 24);
    }

    #[test]
    fn test_invalid_scenario_not_saved() {
        let mut store = MemoryStore::new();
        let extra = Scenario::new("Extra", ScenarioOverride::recurring(dec!(100)));
        let good = PlannerState::default().with_scenarios(ScenarioBook::new().appended(extra));
        save_state(&mut store, &good).unwrap();
        let before = store.fetch(STATE_KEY).unwrap();

        for bad in [
            Scenario::new("   ", ScenarioOverride::recurring(dec!(50))),
            Scenario::new("Skip", ScenarioOverride::recurring(dec!(-50))),
            Scenario::new(
                "Withdraw",
                ScenarioOverride::from_lump_sums(
                    Decimal::ZERO,
                    vec![LumpSum { period: 3, amount: dec!(-500) }],
                )
                .unwrap(),
            ),
        ] {
            let edited = good.with_scenarios(good.scenarios.appended(bad));
            assert!(matches!(
                save_state(&mut store, &edited),
                Err(LoanPlannerError::InvalidInput { .. })
            ));
        }
        assert_eq!(store.fetch(STATE_KEY).unwrap(), before);
        assert_eq!(load_state(&store).unwrap(), good);
    }

    #[test]
    fn test_invalid_loan_not_saved() {
        let mut store = MemoryStore::new();
        let mut state = PlannerState::default();
        state.loan.term_months = 0;
        assert!(save_state(&mut store, &state).is_err());
        assert!(store.fetch(STATE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_blob_is_an_error() {
        let mut store = MemoryStore::new();
        store.store(STATE_KEY, "{ not json").unwrap();
        assert!(matches!(
            load_state(&store),
            Err(LoanPlannerError::SerializationError(_))
        ));
    }
}
