//! End-to-end checks through the public API

use approx::assert_relative_eq;
use invested::projection::{CashflowSchedule, ContributionPlan, Frequency};
use invested::ranking::{default_universe, rank_instruments, Horizon, RiskProfile};
use invested::{project, BudgetPlanner, ProfileStore, ScenarioRunner};

#[test]
fn monthly_plan_end_to_end() {
    let plan = ContributionPlan::new(10_000.0, 0.07, 20.0, 500.0, Frequency::Monthly);
    let result = project(&plan);

    assert_eq!(result.period_count, 240);
    assert_eq!(result.series.len(), 241);
    assert_relative_eq!(result.final_value, 300_850.7184, epsilon = 1e-3);
    assert_relative_eq!(*result.series.last().unwrap(), result.final_value, max_relative = 1e-12);

    // Monthly compounding at 7% nominal is 7.229% effective
    let irr = result.implied_irr.expect("IRR should be bracketed");
    assert_relative_eq!(irr, (1.0_f64 + 0.07 / 12.0).powi(12) - 1.0, epsilon = 1e-6);

    // Discounting the plan's own cash flows at the IRR nets to ~0
    let npv = CashflowSchedule::from_plan(&plan).net_present_value(irr);
    assert!(npv.abs() < 1e-6, "npv = {}", npv);

    let mut csv = Vec::new();
    result.write_series_csv(&mut csv).unwrap();
    let text = String::from_utf8(csv).unwrap();
    assert!(text.starts_with("period,years,balance\n0,0.0000,10000.00\n"));
    assert_eq!(text.lines().count(), 242);
}

#[test]
fn every_frequency_is_consistent() {
    for frequency in Frequency::ALL {
        let plan = ContributionPlan::new(2_500.0, 0.05, 7.5, 100.0, frequency);
        let result = project(&plan);
        assert_eq!(result.series[0], 2_500.0);
        assert_relative_eq!(*result.series.last().unwrap(), result.final_value, max_relative = 1e-12);
        assert!(result.series.windows(2).all(|w| w[1] >= w[0]));
    }
}

#[test]
fn rankings_cover_every_scenario() {
    let catalog = default_universe();
    for horizon in Horizon::ALL {
        for risk in RiskProfile::ALL {
            let ranked = rank_instruments(&catalog, horizon, risk);
            assert_eq!(ranked.len(), catalog.len());
            assert!(ranked.iter().all(|r| (1..=5).contains(&r.stars)));
            assert_eq!(ranked[0].stars, 5);
            assert!(ranked.windows(2).all(|w| w[0].stars >= w[1].stars));

            let mean: f64 = ranked.iter().map(|r| r.composite).sum::<f64>() / ranked.len() as f64;
            assert!(mean.abs() < 1e-9);
        }
    }

    let runner = ScenarioRunner::new();
    assert_eq!(runner.ranking_grid().len(), 9);
}

#[test]
fn budget_saves_into_profile() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProfileStore::new(dir.path().join("stats.json"));

    let mut planner = BudgetPlanner::new(5_000.0);
    planner.add_item("Car payment", 450.0, invested::Bucket::Needs);
    assert!(planner.is_over(invested::Bucket::Needs));

    store
        .set_stats_uploaded(planner.to_profile_stats(None))
        .unwrap();

    let stored = store.load().unwrap();
    assert!(stored.has_uploaded_stats);
    let stats = stored.stats.unwrap();
    assert_eq!(stats.income, Some(5_000.0));
    assert_eq!(stats.expenses, Some(2_500.0 + 450.0 + 1_500.0));
    assert_eq!(stats.savings, Some(1_000.0));

    store.reset_stats().unwrap();
    assert!(!store.load().unwrap().has_uploaded_stats);
}
