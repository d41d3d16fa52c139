use clap::Args;
use serde_json::{json, Value};

use loan_planner_core::amortization::scenarios::{self, LoanAnalysisInput, Scenario, ScheduleOutput};
use loan_planner_core::format::{format_currency_cents, format_month_year};

use super::{ExtraFlags, LoanFlags, CUSTOM_SCENARIO_NAME};
use crate::input;
use crate::OutputFormat;

/// Arguments for printing a full amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON input file ({loan, scenarios}); overrides individual flags
    #[arg(long)]
    pub input: Option<String>,

    /// Scenario from the input file to schedule (defaults to the base schedule)
    #[arg(long)]
    pub scenario: Option<String>,

    #[command(flatten)]
    pub loan: LoanFlags,

    #[command(flatten)]
    pub extras: ExtraFlags,
}

pub fn run_schedule(args: ScheduleArgs, format: &OutputFormat) -> Result<Value, Box<dyn std::error::Error>> {
    let (loan, scenario) = match input::read_input::<LoanAnalysisInput>(args.input.as_deref())? {
        Some(from_file) => {
            let scenario = match args.scenario {
                Some(ref name) => Some(
                    from_file
                        .scenarios
                        .find(name)
                        .cloned()
                        .ok_or_else(|| format!("No scenario named '{}' in input", name))?,
                ),
                None => None,
            };
            (from_file.loan, scenario)
        }
        None => {
            let scenario = if args.extras.is_empty() {
                None
            } else {
                Some(Scenario::new(
                    args.scenario.as_deref().unwrap_or(CUSTOM_SCENARIO_NAME),
                    args.extras.to_override()?,
                ))
            };
            (args.loan.to_parameters()?, scenario)
        }
    };

    let result = scenarios::build_schedule(&loan, scenario.as_ref())?;
    match format {
        OutputFormat::Table | OutputFormat::Csv => {
            for warning in &result.warnings {
                log::warn!("{}", warning);
            }
            Ok(ledger_rows(&result.result))
        }
        OutputFormat::Json | OutputFormat::Minimal => Ok(serde_json::to_value(result)?),
    }
}

fn ledger_rows(out: &ScheduleOutput) -> Value {
    let rows = out
        .schedule
        .iter()
        .map(|row| {
            json!({
                "period": row.period,
                "month": format_month_year(row.date),
                "payment": format_currency_cents(row.total_payment),
                "principal": format_currency_cents(row.principal_paid),
                "interest": format_currency_cents(row.interest_paid),
                "extra": format_currency_cents(row.extra_payment),
                "balance": format_currency_cents(row.remaining_balance),
            })
        })
        .collect();
    Value::Array(rows)
}
