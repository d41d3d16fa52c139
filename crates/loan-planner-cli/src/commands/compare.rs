use clap::Args;
use serde_json::{json, Value};

use loan_planner_core::amortization::scenarios::{
    self, LoanAnalysisInput, LoanAnalysisOutput, Scenario, ScenarioBook,
};
use loan_planner_core::format::{
    format_currency, format_currency_cents, format_duration, format_month_year,
};
use loan_planner_core::ComputationOutput;

use super::{ExtraFlags, LoanFlags, CUSTOM_SCENARIO_NAME};
use crate::input;
use crate::OutputFormat;

/// Arguments for comparing scenarios against the base schedule
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON input file ({loan, scenarios}); overrides individual flags
    #[arg(long)]
    pub input: Option<String>,

    /// Attach full payment ledgers to the JSON output
    #[arg(long)]
    pub include_schedules: bool,

    #[command(flatten)]
    pub loan: LoanFlags,

    #[command(flatten)]
    pub extras: ExtraFlags,
}

pub fn run_compare(args: CompareArgs, format: &OutputFormat) -> Result<Value, Box<dyn std::error::Error>> {
    let analysis_input = match input::read_input::<LoanAnalysisInput>(args.input.as_deref())? {
        Some(mut from_file) => {
            from_file.include_schedules |= args.include_schedules;
            from_file
        }
        None => {
            let scenarios = if args.extras.is_empty() {
                ScenarioBook::new()
            } else {
                ScenarioBook::new().appended(Scenario::new(
                    CUSTOM_SCENARIO_NAME,
                    args.extras.to_override()?,
                ))
            };
            LoanAnalysisInput {
                loan: args.loan.to_parameters()?,
                scenarios,
                include_schedules: args.include_schedules,
            }
        }
    };

    let result = scenarios::analyze_loan(&analysis_input)?;
    render(result, format)
}

/// JSON envelope, or one formatted row per scenario for table and CSV output.
pub fn render(
    result: ComputationOutput<LoanAnalysisOutput>,
    format: &OutputFormat,
) -> Result<Value, Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Table | OutputFormat::Csv => {
            for warning in &result.warnings {
                log::warn!("{}", warning);
            }
            Ok(comparison_rows(&result.result))
        }
        OutputFormat::Json | OutputFormat::Minimal => Ok(serde_json::to_value(result)?),
    }
}

fn comparison_rows(out: &LoanAnalysisOutput) -> Value {
    let payment = format_currency_cents(out.monthly_payment_with_add_on);
    let rows = std::iter::once(&out.base)
        .chain(out.scenarios.iter())
        .map(|r| {
            json!({
                "scenario": r.name,
                "monthly_payment": payment,
                "payoff": format_duration(r.summary.months_to_payoff),
                "payoff_date": r.summary.payoff_date.map(format_month_year).unwrap_or_default(),
                "total_interest": format_currency(r.summary.total_interest_paid),
                "total_paid": format_currency(r.summary.total_paid),
                "interest_saved": format_currency(r.summary.interest_saved),
                "time_saved": signed_duration(r.summary.months_saved),
            })
        })
        .collect();
    Value::Array(rows)
}

fn signed_duration(months: i64) -> String {
    let magnitude = format_duration(u32::try_from(months.unsigned_abs()).unwrap_or(u32::MAX));
    if months < 0 {
        format!("-{}", magnitude)
    } else {
        magnitude
    }
}
