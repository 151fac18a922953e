//! Load an instrument catalog from CSV
//!
//! Columns: ticker,name,category,cagr3,cagr5,cagr10,vol3,vol5,vol10,max_drawdown
//! plus optional quote_url,learn_url. Empty ten-year cells mean "no
//! ten-year history".

use super::instrument::{Instrument, InstrumentMetrics};
use crate::error::{InvestedError, Result};
use csv::Reader;
use log::info;
use std::path::Path;

/// Raw CSV row matching the catalog columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    ticker: String,
    name: String,
    category: String,
    cagr3: f64,
    cagr5: f64,
    cagr10: Option<f64>,
    vol3: f64,
    vol5: f64,
    vol10: Option<f64>,
    max_drawdown: f64,
    #[serde(default)]
    quote_url: Option<String>,
    #[serde(default)]
    learn_url: Option<String>,
}

impl CsvRow {
    fn into_instrument(self) -> Result<Instrument> {
        let category = self.category.parse()?;

        for (field, value) in [
            ("cagr3", Some(self.cagr3)),
            ("cagr5", Some(self.cagr5)),
            ("cagr10", self.cagr10),
            ("max_drawdown", Some(self.max_drawdown)),
        ] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(InvestedError::InvalidValue {
                        record: self.ticker.clone(),
                        field,
                        value: v,
                    });
                }
            }
        }

        for (field, value) in [
            ("vol3", Some(self.vol3)),
            ("vol5", Some(self.vol5)),
            ("vol10", self.vol10),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(InvestedError::InvalidValue {
                        record: self.ticker.clone(),
                        field,
                        value: v,
                    });
                }
            }
        }

        Ok(Instrument {
            ticker: self.ticker,
            name: self.name,
            category,
            metrics: InstrumentMetrics {
                cagr3: self.cagr3,
                cagr5: self.cagr5,
                cagr10: self.cagr10,
                vol3: self.vol3,
                vol5: self.vol5,
                vol10: self.vol10,
                max_drawdown: self.max_drawdown,
            },
            quote_url: self.quote_url.filter(|s| !s.is_empty()),
            learn_url: self.learn_url.filter(|s| !s.is_empty()),
        })
    }
}

/// Load a catalog from a CSV file
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<Instrument>> {
    let path = path.as_ref();
    let catalog = load_catalog_from_reader(std::fs::File::open(path)?)?;
    info!("Loaded {} instruments from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Load a catalog from any reader (e.g., string buffer, network stream)
pub fn load_catalog_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Instrument>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut catalog = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        catalog.push(row.into_instrument()?);
    }

    Ok(catalog)
}
