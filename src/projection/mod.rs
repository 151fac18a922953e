//! Projection engine: compound growth, chart series and implied IRR

mod plan;
mod engine;
mod result;
pub mod irr;
pub mod retirement;

pub use plan::{ContributionPlan, Frequency, MAX_HORIZON_YEARS};
pub use engine::{balance_after, build_series, project, project_future_value, FutureValue, RATE_EPSILON};
pub use result::{ProjectionResult, ProjectionSummary};
pub use irr::{solve_implied_irr, solve_irr, Cashflow, CashflowSchedule};
pub use retirement::{retirement_outlook, RetirementInputs, RetirementOutlook};
