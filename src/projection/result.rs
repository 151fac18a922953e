//! Projection output structures

use super::engine::FutureValue;
use super::plan::ContributionPlan;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Plan the result was computed from (after clamping)
    pub plan: ContributionPlan,

    /// Balance at the end of the horizon
    pub final_value: f64,

    /// Whole periods covered by the horizon
    pub period_count: u32,

    /// Balance at each period boundary, index 0 = starting balance
    pub series: Vec<f64>,

    /// Annualized IRR, `None` if it could not be estimated
    pub implied_irr: Option<f64>,
}

impl ProjectionResult {
    pub fn new(
        plan: ContributionPlan,
        fv: FutureValue,
        series: Vec<f64>,
        implied_irr: Option<f64>,
    ) -> Self {
        Self {
            plan,
            final_value: fv.final_value,
            period_count: fv.period_count,
            series,
            implied_irr,
        }
    }

    /// Money paid in through periodic contributions
    pub fn total_contributions(&self) -> f64 {
        self.plan.periodic_contribution * self.period_count as f64
    }

    /// Growth on top of everything paid in
    pub fn total_growth(&self) -> f64 {
        self.final_value - self.plan.starting_balance - self.total_contributions()
    }

    pub fn summary(&self) -> ProjectionSummary {
        ProjectionSummary {
            period_count: self.period_count,
            starting_balance: self.plan.starting_balance,
            total_contributions: self.total_contributions(),
            total_growth: self.total_growth(),
            final_value: self.final_value,
            implied_irr: self.implied_irr,
        }
    }

    /// Write the chart series as `period,years,balance` CSV
    pub fn write_series_csv<W: Write>(&self, writer: W) -> Result<()> {
        let per_year = self.plan.periods_per_year() as f64;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["period", "years", "balance"])?;
        for (k, balance) in self.series.iter().enumerate() {
            csv_writer.write_record(&[
                k.to_string(),
                format!("{:.4}", k as f64 / per_year),
                format!("{:.2}", balance),
            ])?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// Headline figures for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub period_count: u32,
    pub starting_balance: f64,
    pub total_contributions: f64,
    pub total_growth: f64,
    pub final_value: f64,
    pub implied_irr: Option<f64>,
}

#[cfg(test)]
mod tests {
    use crate::projection::{project, ContributionPlan, Frequency};
    use approx::assert_relative_eq;

    #[test]
    fn test_summary_adds_up() {
        let result = project(&ContributionPlan::new(1_000.0, 0.05, 10.0, 100.0, Frequency::Yearly));
        let summary = result.summary();

        assert_eq!(summary.total_contributions, 1_000.0);
        assert_relative_eq!(
            summary.starting_balance + summary.total_contributions + summary.total_growth,
            summary.final_value,
            max_relative = 1e-12
        );
        assert!(summary.total_growth > 0.0);
    }

    #[test]
    fn test_series_csv() {
        let result = project(&ContributionPlan::new(100.0, 0.0, 1.0, 10.0, Frequency::Quarterly));
        let mut buffer = Vec::new();
        result.write_series_csv(&mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "period,years,balance");
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "0,0.0000,100.00");
        assert_eq!(lines[5], "4,1.0000,140.00");
    }
}
