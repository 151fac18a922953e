//! Risk-adjusted scoring and star rating of a catalog
//!
//! Scores are relative to the catalog passed in: every call recomputes the
//! population mean and standard deviation, so nothing here may be cached per
//! instrument across horizon or risk-profile changes.

use super::instrument::{Horizon, Instrument, RiskProfile};
use serde::Serialize;

/// Annual risk-free rate subtracted from CAGR
pub const RISK_FREE_RATE: f64 = 0.02;

/// Floor for volatility and standard deviation divisors
pub const SCORE_EPSILON: f64 = 1e-6;

pub const MIN_STARS: u8 = 1;
pub const MAX_STARS: u8 = 5;

/// An instrument scored for one horizon and risk profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedInstrument<'a> {
    pub instrument: &'a Instrument,
    /// CAGR at the selected horizon
    pub cagr: f64,
    /// Volatility at the selected horizon
    pub volatility: f64,
    /// Sharpe-like ratio minus the volatility penalty
    pub raw_composite: f64,
    /// Raw composite standardized across the catalog (z-score)
    pub composite: f64,
    pub stars: u8,
}

/// Sharpe-like ratio: excess CAGR per unit of volatility
pub fn sharpe_like(cagr: f64, volatility: f64) -> f64 {
    (cagr - RISK_FREE_RATE) / volatility.max(SCORE_EPSILON)
}

/// Composite before standardization
pub fn raw_composite(cagr: f64, volatility: f64, risk: RiskProfile) -> f64 {
    sharpe_like(cagr, volatility) - risk.volatility_penalty() * volatility
}

/// Mean and population standard deviation
fn population_stats(values: &[f64]) -> (f64, f64) {
    let count = values.len().max(1) as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
    (mean, variance.sqrt())
}

/// Star rating from a fractional rank in [0, 1]
///
/// Five equal-width bands; the bottom of the catalog always gets one star even
/// if its score is barely below average.
pub fn stars_for_fraction(fraction: f64) -> u8 {
    let band = (fraction * 100.0 / 20.0).ceil();
    band.clamp(MIN_STARS as f64, MAX_STARS as f64) as u8
}

/// Score, rate and order a catalog for a horizon and risk profile
///
/// Ordered by stars descending, ties broken by standardized composite
/// descending.
pub fn rank_instruments(catalog: &[Instrument], horizon: Horizon, risk: RiskProfile) -> Vec<RankedInstrument<'_>> {
    let mut rows: Vec<RankedInstrument<'_>> = catalog
        .iter()
        .map(|instrument| {
            let cagr = instrument.metrics.cagr(horizon);
            let volatility = instrument.metrics.volatility(horizon);
            RankedInstrument {
                instrument,
                cagr,
                volatility,
                raw_composite: raw_composite(cagr, volatility, risk),
                composite: 0.0,
                stars: MIN_STARS,
            }
        })
        .collect();

    let raws: Vec<f64> = rows.iter().map(|r| r.raw_composite).collect();
    let (mean, std_dev) = population_stats(&raws);
    let divisor = std_dev.max(SCORE_EPSILON);
    for row in &mut rows {
        row.composite = (row.raw_composite - mean) / divisor;
    }

    let mut sorted: Vec<f64> = rows.iter().map(|r| r.composite).collect();
    sorted.sort_by(f64::total_cmp);

    let last = sorted.len().saturating_sub(1);
    for row in &mut rows {
        // Ties share the lowest position of their value
        let position = sorted.iter().position(|&x| x == row.composite).unwrap_or(0);
        let fraction = if last > 0 { position as f64 / last as f64 } else { 1.0 };
        row.stars = stars_for_fraction(fraction);
    }

    rows.sort_by(|a, b| {
        b.stars
            .cmp(&a.stars)
            .then_with(|| b.composite.total_cmp(&a.composite))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::{default_universe, Category, InstrumentMetrics};
    use approx::assert_abs_diff_eq;

    fn tickers<'a>(ranked: &[RankedInstrument<'a>]) -> Vec<&'a str> {
        ranked.iter().map(|r| r.instrument.ticker.as_str()).collect()
    }

    fn flat(ticker: &str, cagr: f64, vol: f64) -> Instrument {
        Instrument::new(
            ticker,
            ticker,
            Category::Etf,
            InstrumentMetrics {
                cagr3: cagr,
                cagr5: cagr,
                cagr10: Some(cagr),
                vol3: vol,
                vol5: vol,
                vol10: Some(vol),
                max_drawdown: -0.2,
            },
        )
    }

    #[test]
    fn test_conservative_five_year_order() {
        let universe = default_universe();
        let ranked = rank_instruments(&universe, Horizon::FiveYear, RiskProfile::Conservative);

        assert_eq!(tickers(&ranked), vec!["NVDA", "QQQ", "SPY", "VTI", "BTC-USD", "BND"]);
        let stars: Vec<u8> = ranked.iter().map(|r| r.stars).collect();
        assert_eq!(stars, vec![5, 4, 3, 2, 1, 1]);
    }

    #[test]
    fn test_bond_does_not_outrank_spy_just_on_low_vol() {
        let universe = default_universe();
        let ranked = rank_instruments(&universe, Horizon::FiveYear, RiskProfile::Conservative);

        let spy = ranked.iter().position(|r| r.instrument.ticker == "SPY").unwrap();
        let bnd = ranked.iter().position(|r| r.instrument.ticker == "BND").unwrap();
        assert!(spy < bnd);
        assert_abs_diff_eq!(ranked[spy].raw_composite, 0.10 / 0.18 - 0.7 * 0.18, epsilon = 1e-12);
        assert_abs_diff_eq!(ranked[bnd].raw_composite, -0.01 / 0.06 - 0.7 * 0.06, epsilon = 1e-12);
    }

    #[test]
    fn test_composites_are_standardized() {
        let universe = default_universe();
        for horizon in Horizon::ALL {
            for risk in RiskProfile::ALL {
                let ranked = rank_instruments(&universe, horizon, risk);
                let n = ranked.len() as f64;
                let mean = ranked.iter().map(|r| r.composite).sum::<f64>() / n;
                let var = ranked.iter().map(|r| (r.composite - mean).powi(2)).sum::<f64>() / n;
                assert_abs_diff_eq!(mean, 0.0, epsilon = 1e-9);
                assert_abs_diff_eq!(var, 1.0, epsilon = 1e-9);
                assert!(ranked.iter().all(|r| (MIN_STARS..=MAX_STARS).contains(&r.stars)));
            }
        }
    }

    #[test]
    fn test_single_instrument_catalog() {
        let catalog = vec![flat("SOLO", 0.08, 0.15)];
        let ranked = rank_instruments(&catalog, Horizon::ThreeYear, RiskProfile::Balanced);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].composite, 0.0);
        assert_eq!(ranked[0].stars, 5);
    }

    #[test]
    fn test_zero_variance_catalog() {
        let catalog = vec![flat("A", 0.05, 0.1), flat("B", 0.05, 0.1), flat("C", 0.05, 0.1)];
        let ranked = rank_instruments(&catalog, Horizon::FiveYear, RiskProfile::Aggressive);

        // All tie at the lowest position
        assert!(ranked.iter().all(|r| r.composite.abs() < 1e-9 && r.stars == 1));
        assert_eq!(tickers(&ranked), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_zero_volatility_does_not_divide_by_zero() {
        let catalog = vec![flat("CASH", 0.03, 0.0), flat("EQ", 0.09, 0.2)];
        let ranked = rank_instruments(&catalog, Horizon::FiveYear, RiskProfile::Balanced);
        assert!(ranked.iter().all(|r| r.composite.is_finite()));
        assert_eq!(ranked[0].instrument.ticker, "CASH");
    }

    #[test]
    fn test_empty_catalog() {
        assert!(rank_instruments(&[], Horizon::TenYear, RiskProfile::Balanced).is_empty());
    }

    #[test]
    fn test_star_bands() {
        assert_eq!(stars_for_fraction(0.0), 1);
        assert_eq!(stars_for_fraction(0.2), 1);
        assert_eq!(stars_for_fraction(0.21), 2);
        assert_eq!(stars_for_fraction(0.6), 3);
        assert_eq!(stars_for_fraction(1.0), 5);
    }
}
