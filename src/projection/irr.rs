//! Internal Rate of Return (IRR) of a contribution plan
//!
//! The plan is turned into a dated cash-flow schedule (money paid in is
//! negative, the final balance is the single inflow) and the annualized rate
//! that zeroes its net present value is found by bisection.

use super::engine::project_future_value;
use super::plan::ContributionPlan;
use log::debug;
use serde::{Deserialize, Serialize};

/// Lower edge of the search interval (-99% a year)
pub const IRR_LOWER_BOUND: f64 = -0.99;

/// Upper edge of the search interval (+500% a year)
pub const IRR_UPPER_BOUND: f64 = 5.0;

/// Bisection stops once |NPV| falls below this
pub const NPV_TOLERANCE: f64 = 1e-8;

pub const MAX_ITERATIONS: usize = 100;

/// One dated cash flow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cashflow {
    /// Time since the first flow, in years
    pub elapsed_years: f64,
    /// Positive = inflow, negative = outflow
    pub amount: f64,
}

/// Ordered list of dated cash flows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashflowSchedule {
    pub flows: Vec<Cashflow>,
}

impl CashflowSchedule {
    pub fn new() -> Self {
        Self { flows: Vec::new() }
    }

    pub fn push(&mut self, elapsed_years: f64, amount: f64) {
        self.flows.push(Cashflow {
            elapsed_years,
            amount,
        });
    }

    /// Schedule implied by a plan
    ///
    /// Starting balance paid at t = 0, one contribution at each period
    /// boundary, and the projected final value received at the last boundary.
    pub fn from_plan(plan: &ContributionPlan) -> Self {
        let plan = plan.normalized();
        let n = plan.schedule_periods();
        let per_year = plan.periods_per_year() as f64;

        let mut schedule = Self::new();
        schedule.push(0.0, -plan.starting_balance);
        for i in 1..=n {
            schedule.push(i as f64 / per_year, -plan.periodic_contribution);
        }

        let final_value = project_future_value(&plan).final_value;
        schedule.push(n as f64 / per_year, final_value);
        schedule
    }

    /// Sum of every flow discounted at an annual rate
    pub fn net_present_value(&self, rate: f64) -> f64 {
        self.flows
            .iter()
            .map(|cf| cf.amount / (1.0 + rate).powf(cf.elapsed_years))
            .sum()
    }

    pub fn is_all_zero(&self) -> bool {
        self.flows.iter().all(|cf| cf.amount == 0.0)
    }
}

/// Annualized rate at which the schedule's NPV is zero
///
/// Returns `None` when the root is not bracketed by the search interval, or
/// when every flow is zero and any rate would do. Callers must read `None` as
/// "cannot estimate", never as 0%.
pub fn solve_irr(schedule: &CashflowSchedule) -> Option<f64> {
    if schedule.flows.is_empty() || schedule.is_all_zero() {
        return None;
    }

    let mut high = IRR_UPPER_BOUND;
    let npv_high = schedule.net_present_value(high);
    if !npv_high.is_finite() {
        debug!("IRR not bracketed: npv({})={}", high, npv_high);
        return None;
    }

    let mut low = lowest_defined_rate(schedule, IRR_LOWER_BOUND, high);
    let npv_low = schedule.net_present_value(low);

    // Check that we have a root in this interval
    if npv_low.is_nan() || npv_low * npv_high > 0.0 {
        debug!(
            "IRR not bracketed: npv({})={:.6}, npv({})={:.6}",
            low, npv_low, high, npv_high
        );
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = schedule.net_present_value(mid);

        if npv_mid.abs() < NPV_TOLERANCE {
            return Some(mid);
        }

        // Compare against the high end: its NPV is always finite
        if (npv_mid > 0.0) == (npv_high > 0.0) {
            high = mid;
        } else {
            low = mid;
        }
    }

    Some((low + high) / 2.0)
}

/// Smallest rate in `[low, high]` whose NPV is not NaN
///
/// Long schedules overflow near -100%: contributions discount to `-inf` and
/// the final value to `+inf`. The undefined region is a prefix of the
/// interval, so its edge is found by bisection. `high` must be defined.
fn lowest_defined_rate(schedule: &CashflowSchedule, low: f64, high: f64) -> f64 {
    if !schedule.net_present_value(low).is_nan() {
        return low;
    }

    let (mut undefined, mut defined) = (low, high);
    for _ in 0..MAX_ITERATIONS {
        let mid = (undefined + defined) / 2.0;
        if schedule.net_present_value(mid).is_nan() {
            undefined = mid;
        } else {
            defined = mid;
        }
    }
    defined
}

/// Implied annual IRR of a contribution plan
pub fn solve_implied_irr(plan: &ContributionPlan) -> Option<f64> {
    solve_irr(&CashflowSchedule::from_plan(plan))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Frequency;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_simple_irr() {
        // Invest $1000, get $1100 back after one year
        let mut schedule = CashflowSchedule::new();
        schedule.push(0.0, -1000.0);
        schedule.push(1.0, 1100.0);

        let irr = solve_irr(&schedule).unwrap();
        assert_abs_diff_eq!(irr, 0.10, epsilon = 1e-9);
    }

    #[test]
    fn test_monthly_plan_irr_is_effective_annual_rate() {
        let plan = ContributionPlan::new(10_000.0, 0.07, 20.0, 500.0, Frequency::Monthly);
        let irr = solve_implied_irr(&plan).unwrap();

        // Monthly compounding at 7%/12 is (1 + 0.07/12)^12 - 1 effective
        let effective = (1.0 + 0.07 / 12.0_f64).powi(12) - 1.0;
        assert_abs_diff_eq!(irr, effective, epsilon = 1e-9);
    }

    #[test]
    fn test_irr_round_trip_zeroes_npv() {
        for frequency in Frequency::ALL {
            for rate in [0.01, 0.045, 0.09, 0.2] {
                let plan = ContributionPlan::new(3_000.0, rate, 12.0, 150.0, frequency);
                let schedule = CashflowSchedule::from_plan(&plan);
                let irr = solve_irr(&schedule).expect("positive-rate plan must bracket");
                assert_abs_diff_eq!(schedule.net_present_value(irr), 0.0, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_zero_rate_plan_has_zero_irr() {
        let plan = ContributionPlan::new(1_000.0, 0.0, 5.0, 100.0, Frequency::Yearly);
        let irr = solve_implied_irr(&plan).unwrap();
        assert_abs_diff_eq!(irr, 0.0, epsilon = 1e-8);
    }

    #[test]
    fn test_all_outflows_has_no_solution() {
        let mut schedule = CashflowSchedule::new();
        schedule.push(0.0, -1000.0);
        schedule.push(1.0, -500.0);
        schedule.push(2.0, -250.0);
        assert_eq!(solve_irr(&schedule), None);
    }

    #[test]
    fn test_return_beyond_interval_has_no_solution() {
        // 10x in one year is +900%, outside the search interval
        let mut schedule = CashflowSchedule::new();
        schedule.push(0.0, -100.0);
        schedule.push(1.0, 1_000.0);
        assert_eq!(solve_irr(&schedule), None);
    }

    #[test]
    fn test_empty_plan_cannot_be_estimated() {
        let plan = ContributionPlan::new(0.0, 0.05, 10.0, 0.0, Frequency::Monthly);
        assert_eq!(solve_implied_irr(&plan), None);
    }

    #[test]
    fn test_long_horizon_overflowing_lower_bound() {
        // 200 years: NPV at -99% is inf - inf
        let plan = ContributionPlan::new(1_000.0, 0.05, 200.0, 10.0, Frequency::Yearly);
        let schedule = CashflowSchedule::from_plan(&plan);
        assert!(schedule.net_present_value(IRR_LOWER_BOUND).is_nan());

        let irr = solve_irr(&schedule).expect("root is bracketed");
        assert_abs_diff_eq!(irr, 0.05, epsilon = 1e-9);
        assert_abs_diff_eq!(schedule.net_present_value(irr), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_schedule_shape() {
        let plan = ContributionPlan::new(100.0, 0.05, 1.0, 10.0, Frequency::Quarterly);
        let schedule = CashflowSchedule::from_plan(&plan);

        // t0 outflow, 4 contributions, terminal inflow
        assert_eq!(schedule.flows.len(), 6);
        assert_eq!(schedule.flows[0].amount, -100.0);
        assert_abs_diff_eq!(schedule.flows[2].elapsed_years, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(schedule.flows[5].elapsed_years, 1.0, epsilon = 1e-12);
        assert!(schedule.flows[5].amount > 140.0);
    }
}
