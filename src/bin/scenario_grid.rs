//! Run the full ranking grid and a projection rate sweep
//!
//! Ranks the catalog for every horizon and risk profile, then projects one
//! contribution plan across a range of annual returns.
//! Supports JSON output via the --json flag.
//! Accepts config via environment variables:
//!   STARTING_BALANCE, PERIODIC_CONTRIBUTION, HORIZON_YEARS, FREQUENCY
//!   SWEEP_MIN_RATE, SWEEP_MAX_RATE, SWEEP_STEP
//!   INVESTED_CATALOG_PATH (see the config module)

use anyhow::{Context, Result};
use invested::projection::{ContributionPlan, Frequency, ProjectionSummary};
use invested::ranking::{Horizon, RiskProfile};
use invested::scenario::ScenarioRunner;
use invested::EngineConfig;
use serde::Serialize;
use std::env;
use std::time::Instant;

#[derive(Serialize)]
struct GridRow {
    horizon: String,
    risk: String,
    /// Tickers best first
    order: Vec<String>,
    stars: Vec<u8>,
}

#[derive(Serialize)]
struct SweepRow {
    annual_rate: f64,
    summary: ProjectionSummary,
}

#[derive(Serialize)]
struct GridResponse {
    instrument_count: usize,
    grid: Vec<GridRow>,
    sweep: Vec<SweepRow>,
    execution_time_ms: u64,
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn main() -> Result<()> {
    env_logger::init();

    let json_output = env::args().any(|arg| arg == "--json");
    let start = Instant::now();

    let config = EngineConfig::from_env();
    let runner = ScenarioRunner::from_config(&config).context("Failed to load instrument catalog")?;

    let base = ContributionPlan {
        starting_balance: env_or("STARTING_BALANCE", 10_000.0),
        periodic_contribution: env_or("PERIODIC_CONTRIBUTION", 500.0),
        horizon_years: env_or("HORIZON_YEARS", 20.0),
        frequency: env_or("FREQUENCY", Frequency::Monthly),
        ..Default::default()
    };

    let min_rate: f64 = env_or("SWEEP_MIN_RATE", 0.0);
    let max_rate: f64 = env_or("SWEEP_MAX_RATE", 0.12);
    let step: f64 = env_or("SWEEP_STEP", 0.01);
    if step <= 0.0 || max_rate < min_rate {
        anyhow::bail!("Invalid sweep: min {} max {} step {}", min_rate, max_rate, step);
    }

    // Count steps up front so float drift cannot add or drop a rate
    let steps = ((max_rate - min_rate) / step + 1e-9).floor() as usize;
    let rates: Vec<f64> = (0..=steps).map(|i| min_rate + step * i as f64).collect();

    if !json_output {
        println!(
            "Ranking {} instruments across {} scenarios...",
            runner.catalog().len(),
            Horizon::ALL.len() * RiskProfile::ALL.len()
        );
    }

    let grid: Vec<GridRow> = runner
        .ranking_grid()
        .into_iter()
        .map(|cell| GridRow {
            horizon: cell.horizon.to_string(),
            risk: cell.risk.to_string(),
            order: cell.ranked.iter().map(|r| r.instrument.ticker.clone()).collect(),
            stars: cell.ranked.iter().map(|r| r.stars).collect(),
        })
        .collect();

    let sweep: Vec<SweepRow> = runner
        .rate_sweep(&base, &rates)
        .iter()
        .map(|result| SweepRow {
            annual_rate: result.plan.annual_rate,
            summary: result.summary(),
        })
        .collect();

    let execution_time_ms = start.elapsed().as_millis() as u64;

    if json_output {
        let response = GridResponse {
            instrument_count: runner.catalog().len(),
            grid,
            sweep,
            execution_time_ms,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("\n{:<5} {:<13} {}", "Hzn", "Risk", "Order (stars)");
    println!("{}", "-".repeat(72));
    for row in &grid {
        let order: Vec<String> = row
            .order
            .iter()
            .zip(&row.stars)
            .map(|(t, s)| format!("{}({})", t, s))
            .collect();
        println!("{:<5} {:<13} {}", row.horizon, row.risk, order.join(" "));
    }

    println!(
        "\nProjection sweep: ${:.0} start, ${:.0} per {} period, {} years",
        base.starting_balance, base.periodic_contribution, base.frequency, base.horizon_years
    );
    println!("{:>7} {:>16} {:>16} {:>10}", "Rate", "Final value", "Growth", "IRR");
    println!("{}", "-".repeat(52));
    for row in &sweep {
        let irr = row
            .summary
            .implied_irr
            .map(|r| format!("{:.3}%", r * 100.0))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "{:>6.2}% {:>16.2} {:>16.2} {:>10}",
            row.annual_rate * 100.0,
            row.summary.final_value,
            row.summary.total_growth,
            irr
        );
    }

    println!("\nCompleted in {} ms", execution_time_ms);
    Ok(())
}
