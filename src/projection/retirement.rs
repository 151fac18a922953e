//! Retirement target and Coast-FIRE check
//!
//! The FI number is annual spending divided by a safe withdrawal rate. The
//! coast amount is the lump sum that grows to the FI number by retirement
//! with no further contributions.

use super::engine::balance_after;
use serde::{Deserialize, Serialize};

/// Smallest safe withdrawal rate accepted, in percent
const MIN_SWR_PCT: f64 = 0.1;

/// Retirement planner inputs
///
/// Rates are in percent as typed into the form (7.0 = 7%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetirementInputs {
    pub current_age: u32,
    pub retirement_age: u32,
    pub current_portfolio: f64,
    pub monthly_contribution: f64,
    pub monthly_expenses: f64,
    pub safe_withdrawal_rate_pct: f64,
    pub expected_return_pct: f64,
}

impl Default for RetirementInputs {
    fn default() -> Self {
        Self {
            current_age: 22,
            retirement_age: 60,
            current_portfolio: 5_000.0,
            monthly_contribution: 500.0,
            monthly_expenses: 2_000.0,
            safe_withdrawal_rate_pct: 4.0,
            expected_return_pct: 7.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetirementOutlook {
    pub years_to_retire: u32,
    /// Portfolio needed to fund spending at the safe withdrawal rate
    pub fi_number: f64,
    /// Lump sum needed today to coast to the FI number
    pub coast_needed_now: f64,
    /// Portfolio at retirement with contributions continuing yearly
    pub projected_at_retirement: f64,
    pub on_track: bool,
    pub coast_met: bool,
}

/// Evaluate the retirement plan
pub fn retirement_outlook(inputs: &RetirementInputs) -> RetirementOutlook {
    let years_to_retire = inputs.retirement_age.saturating_sub(inputs.current_age);
    let swr = inputs.safe_withdrawal_rate_pct.max(MIN_SWR_PCT) / 100.0;
    let r = inputs.expected_return_pct / 100.0;

    let fi_number = inputs.monthly_expenses.max(0.0) * 12.0 / swr;
    let coast_needed_now = fi_number / (1.0 + r).powf(years_to_retire as f64);

    // Contributions are rolled up into one deposit per year
    let portfolio = inputs.current_portfolio.max(0.0);
    let projected_at_retirement = balance_after(
        portfolio,
        inputs.monthly_contribution.max(0.0) * 12.0,
        r,
        years_to_retire,
    );

    RetirementOutlook {
        years_to_retire,
        fi_number,
        coast_needed_now,
        projected_at_retirement,
        on_track: projected_at_retirement >= fi_number,
        coast_met: portfolio >= coast_needed_now,
    }
}
