//! What-if scenario analysis.
//!
//! Validates loan terms and scenarios, runs the base schedule once, then runs
//! and summarizes every scenario against it. Scenarios are independent of one
//! another; each gets its own schedule.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::loan::{LoanParameters, ScenarioOverride};
use crate::amortization::schedule::{generate_schedule, Schedule};
use crate::amortization::summary::{summarize, ScenarioSummary};
use crate::error::LoanPlannerError;
use crate::time_value::level_payment;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::LoanPlannerResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Longest supported term: 50 years of monthly payments.
pub const MAX_TERM_MONTHS: u32 = 600;

pub const MAX_RATE_PERCENT: Decimal = dec!(100);

/// Ceiling for principal, add-on and extra payment amounts. Keeps a full term
/// of cash totals far inside `Decimal` range.
pub const MAX_AMOUNT: Money = dec!(1_000_000_000_000_000);

/// Name reported for the no-extras schedule.
pub const BASE_SCENARIO_NAME: &str = "Base";

// ---------------------------------------------------------------------------
// Scenario collection
// ---------------------------------------------------------------------------

/// A named what-if configuration compared against the base schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub overrides: ScenarioOverride,
}

impl Scenario {
    pub fn new(name: impl Into<String>, overrides: ScenarioOverride) -> Self {
        Self {
            name: name.into(),
            overrides,
        }
    }
}

/// Ordered list of user scenarios.
///
/// Updates never mutate in place: `appended`, `with_replaced` and `without`
/// return a new book and leave the receiver as it was.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioBook {
    scenarios: Vec<Scenario>,
}

impl ScenarioBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Scenario> {
        self.scenarios.get(index)
    }

    /// First scenario with the given name.
    pub fn find(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scenario> {
        self.scenarios.iter()
    }

    pub fn appended(&self, scenario: Scenario) -> Self {
        let mut scenarios = self.scenarios.clone();
        scenarios.push(scenario);
        Self { scenarios }
    }

    pub fn with_replaced(&self, index: usize, scenario: Scenario) -> LoanPlannerResult<Self> {
        self.check_index(index)?;
        let mut scenarios = self.scenarios.clone();
        scenarios[index] = scenario;
        Ok(Self { scenarios })
    }

    pub fn without(&self, index: usize) -> LoanPlannerResult<Self> {
        self.check_index(index)?;
        let mut scenarios = self.scenarios.clone();
        scenarios.remove(index);
        Ok(Self { scenarios })
    }

    fn check_index(&self, index: usize) -> LoanPlannerResult<()> {
        if index >= self.scenarios.len() {
            return Err(LoanPlannerError::IndexOutOfRange {
                index,
                len: self.scenarios.len(),
            });
        }
        Ok(())
    }
}

impl FromIterator<Scenario> for ScenarioBook {
    fn from_iter<I: IntoIterator<Item = Scenario>>(iter: I) -> Self {
        Self {
            scenarios: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ScenarioBook {
    type Item = &'a Scenario;
    type IntoIter = std::slice::Iter<'a, Scenario>;

    fn into_iter(self) -> Self::IntoIter {
        self.scenarios.iter()
    }
}

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

/// Input for comparing scenarios against the base schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanAnalysisInput {
    pub loan: LoanParameters,
    #[serde(default)]
    pub scenarios: ScenarioBook,
    /// Attach the full payment ledger to every result.
    #[serde(default)]
    pub include_schedules: bool,
}

/// Output of a scenario comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanAnalysisOutput {
    /// Level principal and interest payment.
    pub monthly_payment: Money,
    /// Level payment plus the fixed add-on.
    pub monthly_payment_with_add_on: Money,
    pub base: ScenarioResult,
    pub scenarios: Vec<ScenarioResult>,
}

/// Summary (and optionally the ledger) for one scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub summary: ScenarioSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
}

/// Output of a single schedule run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub scenario: String,
    pub monthly_payment: Money,
    /// Measured against the base schedule when a scenario is given.
    pub summary: ScenarioSummary,
    pub schedule: Schedule,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compare every scenario in the input against the base schedule.
pub fn analyze_loan(
    input: &LoanAnalysisInput,
) -> LoanPlannerResult<ComputationOutput<LoanAnalysisOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_loan(&input.loan)?;
    for (index, scenario) in input.scenarios.iter().enumerate() {
        validate_scenario(index, scenario)?;
    }

    let loan = &input.loan;
    let monthly_payment = level_payment(loan.principal, loan.annual_rate_percent, loan.term_months);

    let base_schedule = generate_schedule(loan, None);
    let base = ScenarioResult {
        name: BASE_SCENARIO_NAME.to_string(),
        summary: summarize(&base_schedule, None),
        schedule: input.include_schedules.then(|| base_schedule.clone()),
    };

    let mut scenarios = Vec::with_capacity(input.scenarios.len());
    for scenario in &input.scenarios {
        let schedule = generate_schedule(loan, Some(&scenario.overrides));
        let summary = summarize(&schedule, Some(base_schedule.as_slice()));
        collect_scenario_warnings(scenario, &summary, loan.term_months, &mut warnings);

        scenarios.push(ScenarioResult {
            name: scenario.name.clone(),
            summary,
            schedule: input.include_schedules.then_some(schedule),
        });
    }

    let output = LoanAnalysisOutput {
        monthly_payment,
        monthly_payment_with_add_on: monthly_payment + loan.fixed_monthly_add_on,
        base,
        scenarios,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortization with clamped extra principal, scenarios vs base",
        &serde_json::json!({
            "principal": loan.principal.to_string(),
            "annual_rate_percent": loan.annual_rate_percent.to_string(),
            "term_months": loan.term_months,
            "start_date": loan.start_date.to_string(),
            "fixed_monthly_add_on": loan.fixed_monthly_add_on.to_string(),
            "scenario_count": input.scenarios.len(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Full ledger for the base schedule, or for `scenario` measured against it.
pub fn build_schedule(
    loan: &LoanParameters,
    scenario: Option<&Scenario>,
) -> LoanPlannerResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_loan(loan)?;
    if let Some(s) = scenario {
        validate_scenario(0, s)?;
    }

    let monthly_payment = level_payment(loan.principal, loan.annual_rate_percent, loan.term_months);
    let base_schedule = generate_schedule(loan, None);

    let (name, summary, schedule) = match scenario {
        Some(s) => {
            let schedule = generate_schedule(loan, Some(&s.overrides));
            let summary = summarize(&schedule, Some(base_schedule.as_slice()));
            collect_scenario_warnings(s, &summary, loan.term_months, &mut warnings);
            (s.name.clone(), summary, schedule)
        }
        None => {
            let summary = summarize(&base_schedule, None);
            (BASE_SCENARIO_NAME.to_string(), summary, base_schedule)
        }
    };

    let output = ScheduleOutput {
        scenario: name,
        monthly_payment,
        summary,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortization schedule",
        &serde_json::json!({
            "principal": loan.principal.to_string(),
            "annual_rate_percent": loan.annual_rate_percent.to_string(),
            "term_months": loan.term_months,
            "scenario": output.scenario,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_loan(loan: &LoanParameters) -> LoanPlannerResult<()> {
    if loan.principal <= Decimal::ZERO {
        return Err(LoanPlannerError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if loan.principal > MAX_AMOUNT {
        return Err(LoanPlannerError::InvalidInput {
            field: "principal".into(),
            reason: format!("Principal cannot exceed {}", MAX_AMOUNT),
        });
    }
    if loan.annual_rate_percent < Decimal::ZERO || loan.annual_rate_percent > MAX_RATE_PERCENT {
        return Err(LoanPlannerError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Annual rate must be between 0 and 100 percent".into(),
        });
    }
    if loan.term_months == 0 || loan.term_months > MAX_TERM_MONTHS {
        return Err(LoanPlannerError::InvalidInput {
            field: "term_months".into(),
            reason: format!("Term must be between 1 and {} months", MAX_TERM_MONTHS),
        });
    }
    if loan.fixed_monthly_add_on < Decimal::ZERO || loan.fixed_monthly_add_on > MAX_AMOUNT {
        return Err(LoanPlannerError::InvalidInput {
            field: "fixed_monthly_add_on".into(),
            reason: format!("Monthly add-on must be between 0 and {}", MAX_AMOUNT),
        });
    }
    Ok(())
}

/// Check one scenario; `index` locates it in error field paths.
pub fn validate_scenario(index: usize, scenario: &Scenario) -> LoanPlannerResult<()> {
    if scenario.name.trim().is_empty() {
        return Err(LoanPlannerError::InvalidInput {
            field: format!("scenarios[{}].name", index),
            reason: "Scenario name cannot be empty".into(),
        });
    }
    let extra = scenario.overrides.extra_monthly_principal;
    if extra < Decimal::ZERO {
        return Err(LoanPlannerError::InvalidInput {
            field: format!("scenarios[{}].extra_monthly_principal", index),
            reason: "Extra monthly principal cannot be negative".into(),
        });
    }
    if extra > MAX_AMOUNT {
        return Err(LoanPlannerError::InvalidInput {
            field: format!("scenarios[{}].extra_monthly_principal", index),
            reason: format!("Extra monthly principal cannot exceed {}", MAX_AMOUNT),
        });
    }
    if let Some(lump) = scenario
        .overrides
        .lump_sums()
        .find(|l| l.amount < Decimal::ZERO)
    {
        return Err(LoanPlannerError::InvalidInput {
            field: format!("scenarios[{}].lump_sums", index),
            reason: format!("Lump sum in period {} cannot be negative", lump.period),
        });
    }
    if let Some(lump) = scenario.overrides.lump_sums().find(|l| l.amount > MAX_AMOUNT) {
        return Err(LoanPlannerError::InvalidInput {
            field: format!("scenarios[{}].lump_sums", index),
            reason: format!("Lump sum in period {} cannot exceed {}", lump.period, MAX_AMOUNT),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn collect_scenario_warnings(
    scenario: &Scenario,
    summary: &ScenarioSummary,
    term_months: u32,
    warnings: &mut Vec<String>,
) {
    if scenario.overrides.is_empty() {
        warnings.push(format!(
            "Scenario '{}' adds no extra principal; it matches the base schedule",
            scenario.name
        ));
    }

    for lump in scenario.overrides.lump_sums() {
        if lump.period > term_months {
            warnings.push(format!(
                "Scenario '{}': lump sum in period {} is beyond the {}-month term and is never applied",
                scenario.name, lump.period, term_months
            ));
        } else if lump.period > summary.months_to_payoff {
            warnings.push(format!(
                "Scenario '{}': lump sum in period {} falls after payoff in month {} and is never applied",
                scenario.name, lump.period, summary.months_to_payoff
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
