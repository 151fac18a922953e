//! Contribution plan input for a projection

use crate::error::{InvestedError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How often contributions are made and interest is compounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Yearly,
    Quarterly,
    Monthly,
    Weekly,
}

impl Frequency {
    pub const ALL: [Frequency; 4] = [
        Frequency::Yearly,
        Frequency::Quarterly,
        Frequency::Monthly,
        Frequency::Weekly,
    ];

    /// Compounding periods per year
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Yearly => 1,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
            Frequency::Weekly => 52,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Yearly => "yearly",
            Frequency::Quarterly => "quarterly",
            Frequency::Monthly => "monthly",
            Frequency::Weekly => "weekly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = InvestedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yearly" | "annual" | "1" => Ok(Frequency::Yearly),
            "quarterly" | "4" => Ok(Frequency::Quarterly),
            "monthly" | "12" => Ok(Frequency::Monthly),
            "weekly" | "52" => Ok(Frequency::Weekly),
            other => Err(InvestedError::unknown("frequency", other)),
        }
    }
}

/// A savings plan: lump sum now plus a level contribution every period
///
/// Built fresh from form state each time a projection is requested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContributionPlan {
    /// Balance at time zero
    pub starting_balance: f64,

    /// Expected annual return as a decimal (0.07 = 7%), may be negative
    pub annual_rate: f64,

    /// Length of the plan in years (fractional allowed)
    pub horizon_years: f64,

    /// Amount added at the end of every period
    pub periodic_contribution: f64,

    /// Contribution and compounding frequency
    pub frequency: Frequency,
}

/// Longest horizon a plan can cover; longer horizons are clamped to this
pub const MAX_HORIZON_YEARS: f64 = 1_000.0;

impl ContributionPlan {
    pub fn new(
        starting_balance: f64,
        annual_rate: f64,
        horizon_years: f64,
        periodic_contribution: f64,
        frequency: Frequency,
    ) -> Self {
        Self {
            starting_balance,
            annual_rate,
            horizon_years,
            periodic_contribution,
            frequency,
        }
    }

    /// Copy of the plan with negative or non-finite amounts clamped to zero
    ///
    /// The consuming form normalizes bad input instead of rejecting it.
    /// The horizon is also capped at `MAX_HORIZON_YEARS`.
    pub fn normalized(&self) -> Self {
        Self {
            starting_balance: non_negative(self.starting_balance),
            annual_rate: if self.annual_rate.is_finite() { self.annual_rate } else { 0.0 },
            horizon_years: horizon(self.horizon_years),
            periodic_contribution: non_negative(self.periodic_contribution),
            frequency: self.frequency,
        }
    }

    pub fn periods_per_year(&self) -> u32 {
        self.frequency.periods_per_year()
    }

    /// Per-period rate: annual rate split evenly over the periods
    pub fn periodic_rate(&self) -> f64 {
        self.annual_rate / self.periods_per_year() as f64
    }

    /// Whole periods covered by the horizon (may be zero)
    pub fn period_count(&self) -> u32 {
        let years = horizon(self.horizon_years);
        (self.periods_per_year() as f64 * years).round().max(0.0) as u32
    }

    /// Period count used for charting and cash-flow schedules (at least one)
    pub fn schedule_periods(&self) -> u32 {
        self.period_count().max(1)
    }
}

impl Default for ContributionPlan {
    fn default() -> Self {
        Self::new(10_000.0, 0.07, 20.0, 500.0, Frequency::Monthly)
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn horizon(years: f64) -> f64 {
    non_negative(years).min(MAX_HORIZON_YEARS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_parse() {
        assert_eq!("Weekly".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert_eq!("12".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert!("daily".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_period_count_rounds() {
        let plan = ContributionPlan::new(0.0, 0.05, 2.49, 0.0, Frequency::Yearly);
        assert_eq!(plan.period_count(), 2);

        let plan = ContributionPlan::new(0.0, 0.05, 0.1, 0.0, Frequency::Yearly);
        assert_eq!(plan.period_count(), 0);
        assert_eq!(plan.schedule_periods(), 1);
    }

    #[test]
    fn test_normalized_clamps_negatives() {
        let plan = ContributionPlan::new(-50.0, -0.1, -3.0, f64::NAN, Frequency::Monthly).normalized();
        assert_eq!(plan.starting_balance, 0.0);
        assert_eq!(plan.horizon_years, 0.0);
        assert_eq!(plan.periodic_contribution, 0.0);
        // Negative returns are legitimate
        assert_eq!(plan.annual_rate, -0.1);
    }

    #[test]
    fn test_horizon_is_capped() {
        let plan = ContributionPlan::new(10_000.0, 0.07, 5.0e7, 0.0, Frequency::Weekly);
        assert_eq!(plan.period_count(), 52_000);
        assert_eq!(plan.normalized().horizon_years, MAX_HORIZON_YEARS);

        let plan = ContributionPlan::new(0.0, 0.0, f64::INFINITY, 0.0, Frequency::Yearly);
        assert_eq!(plan.period_count(), 0);
    }
}
