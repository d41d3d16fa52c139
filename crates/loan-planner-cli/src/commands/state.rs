use clap::{Args, Subcommand};
use serde_json::Value;
use std::path::Path;

use loan_planner_core::amortization::scenarios::{analyze_loan, LoanAnalysisInput};
use loan_planner_core::persistence::state::{load_state, save_state, PlannerState};
use loan_planner_core::persistence::store::FileStore;

use super::{compare, LoanFlags, ScenarioFlags};
use crate::input;
use crate::OutputFormat;

/// Arguments for working with saved planner state
#[derive(Args)]
pub struct StateArgs {
    #[command(subcommand)]
    pub action: StateAction,
}

#[derive(Subcommand)]
pub enum StateAction {
    /// Print the saved loan and scenarios
    Show,
    /// Replace saved state from a JSON file or stdin ({loan, scenarios})
    Save {
        #[arg(long)]
        input: Option<String>,
    },
    /// Update saved loan terms; omitted flags keep their saved values
    SetLoan(LoanFlags),
    /// Append a scenario
    AddScenario(ScenarioFlags),
    /// Replace the scenario at INDEX (0-based)
    SetScenario {
        index: usize,
        #[command(flatten)]
        scenario: ScenarioFlags,
    },
    /// Remove the scenario at INDEX (0-based)
    RemoveScenario { index: usize },
    /// Compare saved scenarios against the base schedule
    Compare {
        /// Attach full payment ledgers to the JSON output
        #[arg(long)]
        include_schedules: bool,
    },
}

pub fn run_state(
    args: StateArgs,
    store_dir: &Path,
    format: &OutputFormat,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut store = FileStore::new(store_dir);
    let state = load_state(&store)?;

    let updated = match args.action {
        StateAction::Show => return Ok(serde_json::to_value(&state)?),
        StateAction::Compare { include_schedules } => {
            let result = analyze_loan(&state.analysis_input(include_schedules))?;
            return compare::render(result, format);
        }
        StateAction::Save { input: path } => {
            let from_file: LoanAnalysisInput = input::read_input(path.as_deref())?
                .ok_or("--input <file.json> or stdin required to save state")?;
            PlannerState::default()
                .with_loan(&from_file.loan)
                .with_scenarios(from_file.scenarios)
        }
        StateAction::SetLoan(flags) => {
            let loan = flags.apply_to(&state.loan_parameters())?;
            state.with_loan(&loan)
        }
        StateAction::AddScenario(flags) => {
            state.with_scenarios(state.scenarios.appended(flags.to_scenario()?))
        }
        StateAction::SetScenario { index, scenario } => state.with_scenarios(
            state
                .scenarios
                .with_replaced(index, scenario.to_scenario()?)?,
        ),
        StateAction::RemoveScenario { index } => {
            state.with_scenarios(state.scenarios.without(index)?)
        }
    };

    // Rejects invalid loans and scenarios before anything is written
    save_state(&mut store, &updated)?;
    log::info!("saved planner state under {}", store.root().display());
    Ok(serde_json::to_value(&updated)?)
}
