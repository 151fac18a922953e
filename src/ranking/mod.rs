//! Instrument ranking engine
//!
//! Scores a small catalog of funds, stocks and crypto by a Sharpe-like ratio
//! penalized for volatility according to the investor's risk profile, then
//! standardizes across the catalog and hands out 1-5 stars.

mod instrument;
mod rank;
pub mod loader;

pub use instrument::{default_universe, Category, Horizon, Instrument, InstrumentMetrics, RiskProfile};
pub use rank::{rank_instruments, raw_composite, sharpe_like, stars_for_fraction, RankedInstrument, RISK_FREE_RATE, SCORE_EPSILON};
pub use loader::{load_catalog, load_catalog_from_reader};
