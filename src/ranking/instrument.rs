//! Instrument catalog entries and the selectors used to rank them

use crate::error::{InvestedError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Asset class of an instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Etf,
    Equity,
    Crypto,
    Index,
}

impl FromStr for Category {
    type Err = InvestedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "etf" => Ok(Category::Etf),
            "equity" => Ok(Category::Equity),
            "crypto" => Ok(Category::Crypto),
            "index" => Ok(Category::Index),
            other => Err(InvestedError::unknown("category", other)),
        }
    }
}

/// Trailing window the metrics are sampled over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Horizon {
    ThreeYear,
    FiveYear,
    TenYear,
}

impl Horizon {
    pub const ALL: [Horizon; 3] = [Horizon::ThreeYear, Horizon::FiveYear, Horizon::TenYear];

    pub fn years(&self) -> u32 {
        match self {
            Horizon::ThreeYear => 3,
            Horizon::FiveYear => 5,
            Horizon::TenYear => 10,
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}y", self.years())
    }
}

impl FromStr for Horizon {
    type Err = InvestedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().trim_end_matches('y') {
            "3" => Ok(Horizon::ThreeYear),
            "5" => Ok(Horizon::FiveYear),
            "10" => Ok(Horizon::TenYear),
            _ => Err(InvestedError::unknown("horizon", s)),
        }
    }
}

/// Investor risk appetite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Conservative,
    Balanced,
    Aggressive,
}

impl RiskProfile {
    pub const ALL: [RiskProfile; 3] = [
        RiskProfile::Conservative,
        RiskProfile::Balanced,
        RiskProfile::Aggressive,
    ];

    /// Volatility penalty coefficient (higher = more volatility-averse)
    pub fn volatility_penalty(&self) -> f64 {
        match self {
            RiskProfile::Conservative => 0.70,
            RiskProfile::Balanced => 0.45,
            RiskProfile::Aggressive => 0.25,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskProfile::Conservative => "conservative",
            RiskProfile::Balanced => "balanced",
            RiskProfile::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskProfile {
    type Err = InvestedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(RiskProfile::Conservative),
            "balanced" => Ok(RiskProfile::Balanced),
            "aggressive" => Ok(RiskProfile::Aggressive),
            other => Err(InvestedError::unknown("risk profile", other)),
        }
    }
}

/// Historical performance figures, all decimal fractions
///
/// Ten-year figures are optional; instruments without that much history fall
/// back to their five-year figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstrumentMetrics {
    pub cagr3: f64,
    pub cagr5: f64,
    pub cagr10: Option<f64>,
    pub vol3: f64,
    pub vol5: f64,
    pub vol10: Option<f64>,
    /// Peak-to-trough decline, stored negative (-0.34 = -34%)
    pub max_drawdown: f64,
}

impl InstrumentMetrics {
    /// CAGR for the horizon
    pub fn cagr(&self, horizon: Horizon) -> f64 {
        match horizon {
            Horizon::ThreeYear => self.cagr3,
            Horizon::FiveYear => self.cagr5,
            Horizon::TenYear => self.cagr10.unwrap_or(self.cagr5),
        }
    }

    /// Volatility for the horizon
    pub fn volatility(&self, horizon: Horizon) -> f64 {
        match horizon {
            Horizon::ThreeYear => self.vol3,
            Horizon::FiveYear => self.vol5,
            Horizon::TenYear => self.vol10.unwrap_or(self.vol5),
        }
    }
}

/// A read-only catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub ticker: String,
    pub name: String,
    pub category: Category,
    pub metrics: InstrumentMetrics,
    pub quote_url: Option<String>,
    pub learn_url: Option<String>,
}

impl Instrument {
    pub fn new(ticker: &str, name: &str, category: Category, metrics: InstrumentMetrics) -> Self {
        Self {
            ticker: ticker.to_string(),
            name: name.to_string(),
            category,
            metrics,
            quote_url: Some(format!("https://finance.yahoo.com/quote/{}", ticker)),
            learn_url: None,
        }
    }

    fn with_learn_url(mut self, url: &str) -> Self {
        self.learn_url = Some(url.to_string());
        self
    }
}

#[allow(clippy::too_many_arguments)]
fn metrics(cagr3: f64, cagr5: f64, cagr10: f64, vol3: f64, vol5: f64, vol10: f64, max_drawdown: f64) -> InstrumentMetrics {
    InstrumentMetrics {
        cagr3,
        cagr5,
        cagr10: Some(cagr10),
        vol3,
        vol5,
        vol10: Some(vol10),
        max_drawdown,
    }
}

/// Built-in demo catalog
pub fn default_universe() -> Vec<Instrument> {
    vec![
        Instrument::new("SPY", "S&P 500 ETF", Category::Etf, metrics(0.11, 0.12, 0.11, 0.19, 0.18, 0.17, -0.34))
            .with_learn_url("https://www.ssga.com/us/en/individual/etfs/funds/spdr-sp-500-etf-trust-spy"),
        Instrument::new("VTI", "Total US Market", Category::Etf, metrics(0.11, 0.11, 0.10, 0.18, 0.17, 0.16, -0.35))
            .with_learn_url("https://investor.vanguard.com/investment-products/etfs/profile/vti"),
        Instrument::new("QQQ", "NASDAQ 100 ETF", Category::Etf, metrics(0.15, 0.17, 0.18, 0.25, 0.24, 0.23, -0.36))
            .with_learn_url("https://www.invesco.com/us/financial-products/etfs/product-detail?audienceType=Investor&ticker=QQQ"),
        Instrument::new("BND", "US Total Bond", Category::Etf, metrics(0.0, 0.01, 0.02, 0.06, 0.06, 0.05, -0.18))
            .with_learn_url("https://investor.vanguard.com/investment-products/etfs/profile/bnd"),
        Instrument::new("BTC-USD", "Bitcoin", Category::Crypto, metrics(0.30, 0.35, 0.85, 0.75, 0.80, 0.85, -0.83))
            .with_learn_url("https://bitcoin.org"),
        Instrument::new("NVDA", "NVIDIA", Category::Equity, metrics(0.75, 0.60, 0.55, 0.65, 0.55, 0.50, -0.57))
            .with_learn_url("https://www.nvidia.com/en-us/about-nvidia/investor-relations/"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_year_falls_back_to_five() {
        let m = InstrumentMetrics {
            cagr3: 0.2,
            cagr5: 0.15,
            cagr10: None,
            vol3: 0.3,
            vol5: 0.25,
            vol10: None,
            max_drawdown: -0.4,
        };
        assert_eq!(m.cagr(Horizon::TenYear), 0.15);
        assert_eq!(m.volatility(Horizon::TenYear), 0.25);
        assert_eq!(m.cagr(Horizon::ThreeYear), 0.2);
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!("10y".parse::<Horizon>().unwrap(), Horizon::TenYear);
        assert_eq!("5".parse::<Horizon>().unwrap(), Horizon::FiveYear);
        assert!("7".parse::<Horizon>().is_err());
        assert_eq!("Aggressive".parse::<RiskProfile>().unwrap(), RiskProfile::Aggressive);
        assert_eq!("crypto".parse::<Category>().unwrap(), Category::Crypto);
    }

    #[test]
    fn test_default_universe_is_well_formed() {
        let universe = default_universe();
        assert_eq!(universe.len(), 6);
        for ins in &universe {
            for h in Horizon::ALL {
                assert!(ins.metrics.volatility(h) >= 0.0, "{} has negative vol", ins.ticker);
            }
            assert!(ins.quote_url.is_some());
        }
    }
}
