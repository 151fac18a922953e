//! Closed-form compound growth with periodic contributions

use super::irr::solve_implied_irr;
use super::plan::ContributionPlan;
use super::result::ProjectionResult;
use serde::{Deserialize, Serialize};

/// Per-period rates smaller than this are treated as zero
pub const RATE_EPSILON: f64 = 1e-12;

/// Final balance and the number of whole periods it covers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FutureValue {
    pub final_value: f64,
    pub period_count: u32,
}

/// Balance after `k` periods of growth at per-period rate `rate`
///
/// Lump sum compounded plus an ordinary annuity of `contribution`. As the rate
/// goes to zero the annuity term tends to `contribution * k`, which is used
/// directly below `RATE_EPSILON` instead of dividing by a vanishing rate.
pub fn balance_after(starting_balance: f64, contribution: f64, rate: f64, k: u32) -> f64 {
    let growth = (1.0 + rate).powf(k as f64);
    let annuity = if rate.abs() < RATE_EPSILON {
        contribution * k as f64
    } else {
        contribution * (growth - 1.0) / rate
    };
    starting_balance * growth + annuity
}

/// Future value of the plan at the end of its horizon
pub fn project_future_value(plan: &ContributionPlan) -> FutureValue {
    let plan = plan.normalized();
    let n = plan.period_count();
    FutureValue {
        final_value: balance_after(
            plan.starting_balance,
            plan.periodic_contribution,
            plan.periodic_rate(),
            n,
        ),
        period_count: n,
    }
}

/// Balance at every period boundary from 0 to n inclusive, for charting
///
/// Always contains at least two points, even when the horizon rounds to zero
/// periods.
pub fn build_series(plan: &ContributionPlan) -> Vec<f64> {
    let plan = plan.normalized();
    let n = plan.schedule_periods();
    let rate = plan.periodic_rate();

    (0..=n)
        .map(|k| balance_after(plan.starting_balance, plan.periodic_contribution, rate, k))
        .collect()
}

/// Run the whole projection: final value, chart series and implied IRR
pub fn project(plan: &ContributionPlan) -> ProjectionResult {
    let normalized = plan.normalized();
    let fv = project_future_value(&normalized);
    let series = build_series(&normalized);
    let implied_irr = solve_implied_irr(&normalized);

    ProjectionResult::new(normalized, fv, series, implied_irr)
}
