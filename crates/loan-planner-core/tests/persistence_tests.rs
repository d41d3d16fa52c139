use loan_planner_core::amortization::loan::{LumpSum, ScenarioOverride};
use loan_planner_core::amortization::scenarios::{analyze_loan, Scenario};
use loan_planner_core::persistence::state::{load_state, save_state, PlannerState, STATE_KEY};
use loan_planner_core::persistence::store::{FileStore, KeyValueStore};
use loan_planner_core::LoanPlannerError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// File-backed planner state
// ===========================================================================

#[test]
fn test_edit_scenarios_across_sessions() {
    let dir = tempfile::tempdir().unwrap();

    // Session 1: add two scenarios
    let mut store = FileStore::new(dir.path());
    let state = load_state(&store).unwrap();
    let state = state.with_scenarios(
        state
            .scenarios
            .appended(Scenario::new("Extra $250", ScenarioOverride::recurring(dec!(250))))
            .appended(Scenario::new(
                "Windfall",
                ScenarioOverride::from_lump_sums(
                    Decimal::ZERO,
                    vec![LumpSum { period: 36, amount: dec!(40_000) }],
                )
                .unwrap(),
            )),
    );
    save_state(&mut store, &state).unwrap();

    // Session 2: replace the first, drop the second
    let mut store = FileStore::new(dir.path());
    let loaded = load_state(&store).unwrap();
    assert_eq!(loaded, state);

    let edited = loaded.with_scenarios(
        loaded
            .scenarios
            .with_replaced(0, Scenario::new("Extra $500", ScenarioOverride::recurring(dec!(500))))
            .unwrap()
            .without(1)
            .unwrap(),
    );
    save_state(&mut store, &edited).unwrap();

    let reloaded = load_state(&FileStore::new(dir.path())).unwrap();
    assert_eq!(reloaded.scenarios.len(), 1);
    assert_eq!(reloaded.scenarios.get(0).unwrap().name, "Extra $500");

    let analysis = analyze_loan(&reloaded.analysis_input(false)).unwrap();
    assert!(analysis.result.scenarios[0].summary.months_saved > 0);
}

#[test]
fn test_bad_start_month_still_loads() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path());
    store
        .store(
            STATE_KEY,
            r#"{"loan": {"principal": "150000", "annual_rate_percent": "4.25",
                         "term_months": 180, "start_month": "13/2025"},
                "scenarios": []}"#,
        )
        .unwrap();

    let state: PlannerState = load_state(&store).unwrap();
    let loan = state.loan_parameters();
    assert_eq!(loan.principal, dec!(150000));
    assert_eq!(loan.fixed_monthly_add_on, Decimal::ZERO);
    assert!(analyze_loan(&state.analysis_input(false)).is_ok());
}

#[test]
fn test_duplicate_lump_sum_periods_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path());
    store
        .store(
            STATE_KEY,
            r#"{"loan": {"principal": 1000, "annual_rate_percent": 1,
                         "term_months": 12, "start_month": "2025-01"},
                "scenarios": [{"name": "dup", "overrides": {"lump_sums": [
                    {"period": 3, "amount": 10}, {"period": 3, "amount": 20}]}}]}"#,
        )
        .unwrap();

    assert!(matches!(
        load_state(&store),
        Err(LoanPlannerError::SerializationError(_))
    ));
}
