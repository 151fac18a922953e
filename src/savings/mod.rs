//! High-yield savings account (HYSA) comparison
//!
//! Accounts are scored on APY relative to the best on offer, monthly fee,
//! minimum deposit and whether transfers are instant.

mod catalog;

pub use catalog::{default_accounts, load_accounts, load_accounts_from_reader};

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

const APY_WEIGHT: f64 = 0.6;
const FEE_WEIGHT: f64 = 0.25;
const MIN_DEPOSIT_WEIGHT: f64 = 0.15;
const INSTANT_BONUS: f64 = 0.1;

/// Fee at which the fee score reaches zero ($/month)
const FEE_CEILING: f64 = 10.0;
/// Minimum deposit at which the deposit score reaches zero
const MIN_DEPOSIT_CEILING: f64 = 1_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsAccount {
    pub id: String,
    pub bank: String,
    pub product: String,
    /// Annual percentage yield as a decimal
    pub apy: f64,
    pub min_deposit: f64,
    pub monthly_fee: f64,
    pub instant_transfers: bool,
    pub notes: String,
    pub url: String,
}

impl SavingsAccount {
    /// Interest earned in a year on `balance`, ignoring fees and taxes
    pub fn annual_interest(&self, balance: f64) -> f64 {
        annual_interest(balance, self.apy)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedAccount<'a> {
    pub account: &'a SavingsAccount,
    /// Weighted score in [0, 1]
    pub score: f64,
    /// 0-5 stars
    pub stars: u8,
}

pub fn annual_interest(balance: f64, apy: f64) -> f64 {
    balance.max(0.0) * apy
}

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Score and order accounts, best first
///
/// Ties on score are broken by higher APY.
pub fn rank_accounts(accounts: &[SavingsAccount]) -> Vec<RankedAccount<'_>> {
    let max_apy = accounts.iter().fold(0.0_f64, |m, a| m.max(a.apy));

    let mut ranked: Vec<RankedAccount<'_>> = accounts
        .iter()
        .map(|account| {
            let apy_score = if max_apy > 0.0 { account.apy / max_apy } else { 0.0 };
            let fee_score = clamp01(1.0 - account.monthly_fee / FEE_CEILING);
            let min_score = clamp01(1.0 - account.min_deposit / MIN_DEPOSIT_CEILING);
            let bonus = if account.instant_transfers { INSTANT_BONUS } else { 0.0 };

            let score = clamp01(
                APY_WEIGHT * apy_score + FEE_WEIGHT * fee_score + MIN_DEPOSIT_WEIGHT * min_score + bonus,
            );
            RankedAccount {
                account,
                score,
                stars: (score * 5.0).round() as u8,
            }
        })
        .collect();

    ranked.sort_by(|a, b| match b.score.total_cmp(&a.score) {
        Ordering::Equal => b.account.apy.total_cmp(&a.account.apy),
        other => other,
    });
    ranked
}
