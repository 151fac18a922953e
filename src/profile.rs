//! User financial profile and its file-backed store
//!
//! The store keeps a single JSON document: whether the user has uploaded
//! their figures, the figures themselves and when they were last saved.

use crate::error::{InvestedError, Result};
use crate::ranking::RiskProfile;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default store location, relative to the working directory
pub const DEFAULT_PROFILE_PATH: &str = "invested-stats-storage.json";

/// Monthly figures entered by the user; any may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub income: Option<f64>,
    pub expenses: Option<f64>,
    pub savings: Option<f64>,
    pub invested: Option<f64>,
    pub debt: Option<f64>,
}

impl UserStats {
    /// Savings plus investments minus debt
    pub fn net_worth(&self) -> f64 {
        self.savings.unwrap_or(0.0) + self.invested.unwrap_or(0.0) - self.debt.unwrap_or(0.0)
    }

    /// Income left after expenses
    pub fn monthly_surplus(&self) -> f64 {
        self.income.unwrap_or(0.0) - self.expenses.unwrap_or(0.0)
    }

    /// Months of expenses covered by savings
    pub fn emergency_months(&self) -> f64 {
        ratio(self.savings.unwrap_or(0.0), self.expenses.unwrap_or(0.0))
    }

    pub fn debt_to_income(&self) -> f64 {
        ratio(self.debt.unwrap_or(0.0), self.income.unwrap_or(0.0))
    }

    pub fn posture(&self) -> InvestingPosture {
        let emergency = self.emergency_months();
        let dti = self.debt_to_income();
        if emergency < 3.0 || dti > 0.5 {
            InvestingPosture::Safety
        } else if emergency > 6.0 && dti < 0.3 {
            InvestingPosture::Aggressive
        } else {
            InvestingPosture::Moderate
        }
    }
}

/// x / y where a zero or negative denominator means "unbounded" unless x is 0 too
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else if numerator > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

/// How hard the user should lean into investing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestingPosture {
    /// Build an emergency fund or pay down debt first
    Safety,
    Moderate,
    Aggressive,
}

impl InvestingPosture {
    pub fn suggested_risk(&self) -> RiskProfile {
        match self {
            InvestingPosture::Safety => RiskProfile::Conservative,
            InvestingPosture::Moderate => RiskProfile::Balanced,
            InvestingPosture::Aggressive => RiskProfile::Aggressive,
        }
    }
}

/// Persisted document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProfile {
    pub has_uploaded_stats: bool,
    pub stats: Option<UserStats>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// JSON file-backed profile store
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current state; a missing file is the empty state
    pub fn load(&self) -> Result<StoredProfile> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(StoredProfile::default()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&text).map_err(|e| {
            warn!("Profile store {} is corrupt: {}", self.path.display(), e);
            InvestedError::ProfileStore {
                path: self.path.clone(),
                reason: e.to_string(),
            }
        })
    }

    /// Save the stats and mark them as uploaded
    pub fn set_stats_uploaded(&self, stats: UserStats) -> Result<StoredProfile> {
        let profile = StoredProfile {
            has_uploaded_stats: true,
            stats: Some(stats),
            updated_at: Some(Utc::now()),
        };
        self.write(&profile)?;
        info!("Saved profile to {}", self.path.display());
        Ok(profile)
    }

    /// Forget the stats
    pub fn reset_stats(&self) -> Result<StoredProfile> {
        let profile = StoredProfile::default();
        self.write(&profile)?;
        info!("Reset profile at {}", self.path.display());
        Ok(profile)
    }

    fn write(&self, profile: &StoredProfile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(profile)?)?;
        Ok(())
    }
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new(DEFAULT_PROFILE_PATH)
    }
}
