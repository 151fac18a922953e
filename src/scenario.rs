//! Scenario runner for batch projections and ranking grids
//!
//! Loads the instrument catalog once, then evaluates many plans or every
//! horizon and risk profile combination in parallel.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::projection::{project, ContributionPlan, ProjectionResult};
use crate::ranking::{default_universe, load_catalog, rank_instruments, Horizon, Instrument, RankedInstrument, RiskProfile};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;

/// Rankings for one horizon and risk profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingGridCell<'a> {
    pub horizon: Horizon,
    pub risk: RiskProfile,
    pub ranked: Vec<RankedInstrument<'a>>,
}

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
///
/// let plans: Vec<_> = [0.04, 0.07, 0.10]
///     .iter()
///     .map(|&rate| ContributionPlan { annual_rate: rate, ..Default::default() })
///     .collect();
/// let results = runner.run_batch(&plans);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    catalog: Vec<Instrument>,
}

impl ScenarioRunner {
    /// Runner over the built-in catalog
    pub fn new() -> Self {
        Self {
            catalog: default_universe(),
        }
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            catalog: load_catalog(path)?,
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self {
            catalog: config.catalog()?,
        })
    }

    pub fn with_catalog(catalog: Vec<Instrument>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &[Instrument] {
        &self.catalog
    }

    pub fn run(&self, plan: &ContributionPlan) -> ProjectionResult {
        project(plan)
    }

    /// Project every plan; output order matches input order
    pub fn run_batch(&self, plans: &[ContributionPlan]) -> Vec<ProjectionResult> {
        plans.par_iter().map(project).collect()
    }

    /// Same plan at each of `rates`
    pub fn rate_sweep(&self, base: &ContributionPlan, rates: &[f64]) -> Vec<ProjectionResult> {
        let plans: Vec<ContributionPlan> = rates
            .iter()
            .map(|&annual_rate| ContributionPlan { annual_rate, ..*base })
            .collect();
        self.run_batch(&plans)
    }

    pub fn rank(&self, horizon: Horizon, risk: RiskProfile) -> Vec<RankedInstrument<'_>> {
        rank_instruments(&self.catalog, horizon, risk)
    }

    /// Rankings for every horizon and risk profile, horizon-major
    pub fn ranking_grid(&self) -> Vec<RankingGridCell<'_>> {
        let cells: Vec<(Horizon, RiskProfile)> = Horizon::ALL
            .iter()
            .flat_map(|&h| RiskProfile::ALL.iter().map(move |&r| (h, r)))
            .collect();

        cells
            .par_iter()
            .map(|&(horizon, risk)| RankingGridCell {
                horizon,
                risk,
                ranked: self.rank(horizon, risk),
            })
            .collect()
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_matches_sequential() {
        let runner = ScenarioRunner::new();
        let plans: Vec<_> = [0.0, 0.04, 0.07, 0.10]
            .iter()
            .map(|&rate| ContributionPlan {
                annual_rate: rate,
                ..Default::default()
            })
            .collect();

        let results = runner.run_batch(&plans);
        assert_eq!(results.len(), 4);
        for (plan, result) in plans.iter().zip(&results) {
            assert_eq!(result, &project(plan));
        }

        // Higher rate, higher final value
        assert!(results[3].final_value > results[0].final_value);
    }

    #[test]
    fn test_rate_sweep_keeps_other_fields() {
        let runner = ScenarioRunner::new();
        let base = ContributionPlan::default();
        let results = runner.rate_sweep(&base, &[0.05, 0.06]);
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].plan.annual_rate, 0.06);
        assert_eq!(results[1].plan.starting_balance, base.starting_balance);
    }

    #[test]
    fn test_ranking_grid() {
        let runner = ScenarioRunner::new();
        let grid = runner.ranking_grid();
        assert_eq!(grid.len(), 9);
        assert_eq!(grid[0].horizon, Horizon::ThreeYear);
        assert_eq!(grid[0].risk, RiskProfile::Conservative);
        assert_eq!(grid[8].horizon, Horizon::TenYear);
        assert_eq!(grid[8].risk, RiskProfile::Aggressive);

        for cell in &grid {
            assert_eq!(cell.ranked, runner.rank(cell.horizon, cell.risk));
        }
    }

    #[test]
    fn test_from_csv_path() {
        let runner = ScenarioRunner::from_csv_path("data/instruments.csv").unwrap();
        assert_eq!(runner.catalog().len(), 6);
    }
}
