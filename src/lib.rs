//! Invested - personal finance projections and instrument rankings
//!
//! This library provides:
//! - Future value of a lump sum plus periodic contributions, with a chart series
//! - Implied IRR of a contribution plan via bisection
//! - Retirement / Coast-FIRE targets
//! - Sharpe-like instrument rankings by horizon and risk profile
//! - High-yield savings account comparison
//! - 50/30/20 budget planning and a file-backed user profile
//! - An AI chat client for asking questions about the numbers

pub mod error;
pub mod config;
pub mod projection;
pub mod ranking;
pub mod savings;
pub mod budget;
pub mod profile;
pub mod chat;
pub mod scenario;

// Re-export commonly used types
pub use error::{InvestedError, Result};
pub use config::EngineConfig;
pub use projection::{build_series, project, project_future_value, solve_implied_irr, ContributionPlan, Frequency, ProjectionResult};
pub use ranking::{rank_instruments, Horizon, Instrument, RankedInstrument, RiskProfile};
pub use budget::{Bucket, BudgetPlanner};
pub use profile::{ProfileStore, UserStats};
pub use scenario::ScenarioRunner;
